use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{BASE_TEMPERATURE, DEFAULT_APPEND_MOTIF, RNA_ALPHABET, TARGET_TEMPERATURES};
use crate::scoring::parse_numeric;
use crate::types::ThermoError;

// =============================================================================
// Thresholds
// =============================================================================

/// Closed numeric interval `[min, max]` used to accept or reject one metric.
///
/// Construction enforces `min < max` with finite bounds, including when the
/// value is read from a settings file.
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::config::RangeSetting;
///
/// let range = RangeSetting::new(-17.0, -10.0).unwrap();
/// assert!(range.contains(-12.5));
/// assert!(range.contains_str("(-12.34)"));
/// assert!(!range.contains_str("abc"));
///
/// assert!(RangeSetting::new(5.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct RangeSetting {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawRange> for RangeSetting {
    type Error = ThermoError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl RangeSetting {
    /// # Errors
    ///
    /// Returns [`ThermoError::InvalidRange`] unless both bounds are finite and `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, ThermoError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ThermoError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    // Only for compile-time defaults that are known to be valid.
    const fn fixed(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive bounds check.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Bounds check on a textual value such as `"(-12.34)"`.
    ///
    /// Unparseable text is reported as out of range.
    #[must_use]
    pub fn contains_str(&self, value: &str) -> bool {
        parse_numeric(value).is_some_and(|v| self.contains(v))
    }
}

impl fmt::Display for RangeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Acceptance ranges for the six metrics scored in one scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRanges {
    /// AU share in percent.
    pub au: RangeSetting,
    /// GC share in percent.
    pub gc: RangeSetting,
    /// GU share in percent.
    pub gu: RangeSetting,
    /// Free energy at 25 °C in kcal/mol.
    pub mfe_25: RangeSetting,
    /// Free energy at 37 °C in kcal/mol.
    pub mfe_37: RangeSetting,
    /// Free energy at 42 °C in kcal/mol.
    pub mfe_42: RangeSetting,
}

impl MetricRanges {
    /// Defaults for the terminal hairpin.
    #[must_use]
    pub const fn hairpin_defaults() -> Self {
        Self {
            au: RangeSetting::fixed(50.0, 60.0),
            gc: RangeSetting::fixed(0.0, 30.0),
            gu: RangeSetting::fixed(15.0, 25.0),
            mfe_25: RangeSetting::fixed(-17.0, -10.0),
            mfe_37: RangeSetting::fixed(-13.0, -6.0),
            mfe_42: RangeSetting::fixed(-7.0, -2.0),
        }
    }

    /// Defaults for the full input sequence.
    #[must_use]
    pub const fn original_defaults() -> Self {
        Self {
            au: RangeSetting::fixed(0.0, 100.0),
            gc: RangeSetting::fixed(0.0, 100.0),
            gu: RangeSetting::fixed(0.0, 100.0),
            mfe_25: RangeSetting::fixed(-30.0, -10.0),
            mfe_37: RangeSetting::fixed(-25.0, -5.0),
            mfe_42: RangeSetting::fixed(-20.0, -2.0),
        }
    }

    /// Energy ranges in the order of [`TARGET_TEMPERATURES`].
    #[must_use]
    pub const fn mfe(&self) -> [RangeSetting; 3] {
        [self.mfe_25, self.mfe_37, self.mfe_42]
    }
}

/// Settings-file form of [`MetricRanges`] where every entry may be missing.
#[derive(Debug, Default, Deserialize)]
struct PartialMetricRanges {
    au: Option<RangeSetting>,
    gc: Option<RangeSetting>,
    gu: Option<RangeSetting>,
    mfe_25: Option<RangeSetting>,
    mfe_37: Option<RangeSetting>,
    mfe_42: Option<RangeSetting>,
}

impl PartialMetricRanges {
    fn or(self, defaults: MetricRanges) -> MetricRanges {
        MetricRanges {
            au: self.au.unwrap_or(defaults.au),
            gc: self.gc.unwrap_or(defaults.gc),
            gu: self.gu.unwrap_or(defaults.gu),
            mfe_25: self.mfe_25.unwrap_or(defaults.mfe_25),
            mfe_37: self.mfe_37.unwrap_or(defaults.mfe_37),
            mfe_42: self.mfe_42.unwrap_or(defaults.mfe_42),
        }
    }
}

fn hairpin_ranges<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MetricRanges, D::Error> {
    Ok(PartialMetricRanges::deserialize(deserializer)?.or(MetricRanges::hairpin_defaults()))
}

fn original_ranges<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MetricRanges, D::Error> {
    Ok(PartialMetricRanges::deserialize(deserializer)?.or(MetricRanges::original_defaults()))
}

/// Ranges for both scored scopes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRanges {
    #[serde(
        default = "MetricRanges::hairpin_defaults",
        deserialize_with = "hairpin_ranges"
    )]
    pub hairpin: MetricRanges,
    #[serde(
        default = "MetricRanges::original_defaults",
        deserialize_with = "original_ranges"
    )]
    pub original: MetricRanges,
}

impl Default for AnalysisRanges {
    fn default() -> Self {
        Self {
            hairpin: MetricRanges::hairpin_defaults(),
            original: MetricRanges::original_defaults(),
        }
    }
}

// =============================================================================
// Calculation toggles and preprocessing
// =============================================================================

/// Optional calculations on the full input sequence.
///
/// Hairpin composition and the hairpin temperature sweep are always run
/// because the hairpin score depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationToggles {
    /// Fold the full sequence at 37 °C and 42 °C as well.
    ///
    /// **Default**: `false`
    #[serde(rename = "calculate_original_mfe_temps")]
    pub original_mfe_sweep: bool,

    /// Compute raw nucleotide composition of the full sequence.
    ///
    /// **Default**: `false`
    #[serde(rename = "calculate_original_composition")]
    pub original_composition: bool,

    /// Search hairpins for a Shine-Dalgarno-like motif.
    ///
    /// **Default**: `true`
    #[serde(rename = "calculate_rbs")]
    pub rbs: bool,
}

impl Default for CalculationToggles {
    fn default() -> Self {
        Self {
            original_mfe_sweep: false,
            original_composition: false,
            rbs: true,
        }
    }
}

/// End of the sequence that receives the preprocessing motif.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppendPosition {
    /// Prepend at the 5' end.
    Start,
    /// Append at the 3' end.
    #[default]
    End,
}

impl FromStr for AppendPosition {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" | "5" | "5'" => Ok(Self::Start),
            "end" | "3" | "3'" => Ok(Self::End),
            other => Err(ThermoError::InvalidConfig(format!(
                "unknown append position '{other}', expected 'start' or 'end'"
            ))),
        }
    }
}

/// Optional motif attached to every sequence before folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencePreprocessing {
    #[serde(rename = "append_sequence_enabled")]
    pub enabled: bool,
    #[serde(rename = "append_sequence")]
    pub motif: String,
    #[serde(rename = "append_position")]
    pub position: AppendPosition,
}

impl Default for SequencePreprocessing {
    fn default() -> Self {
        Self {
            enabled: false,
            motif: DEFAULT_APPEND_MOTIF.to_string(),
            position: AppendPosition::End,
        }
    }
}

impl SequencePreprocessing {
    /// Enabled preprocessing with a validated, upper-cased motif.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::InvalidConfig`] for an empty motif or one with
    /// characters outside `ACGU`.
    pub fn new(motif: &str, position: AppendPosition) -> Result<Self, ThermoError> {
        let preprocessing = Self {
            enabled: true,
            motif: motif.trim().to_ascii_uppercase(),
            position,
        };
        preprocessing.validate()?;
        Ok(preprocessing)
    }

    /// # Errors
    ///
    /// Returns [`ThermoError::InvalidConfig`] when enabled with an unusable motif.
    pub fn validate(&self) -> Result<(), ThermoError> {
        if !self.enabled {
            return Ok(());
        }
        if self.motif.is_empty() {
            return Err(ThermoError::InvalidConfig(
                "append motif must not be empty".to_string(),
            ));
        }
        if let Some(c) = self
            .motif
            .bytes()
            .find(|b| !RNA_ALPHABET.contains(&b.to_ascii_uppercase()))
        {
            return Err(ThermoError::InvalidConfig(format!(
                "append motif contains '{}', only A, C, G and U are allowed",
                c as char
            )));
        }
        Ok(())
    }

    /// Returns `sequence` with the motif attached, or unchanged when disabled.
    #[must_use]
    pub fn apply(&self, sequence: &str) -> String {
        if !self.enabled {
            return sequence.to_string();
        }
        let motif = self.motif.to_ascii_uppercase();
        match self.position {
            AppendPosition::Start => format!("{motif}{sequence}"),
            AppendPosition::End => format!("{sequence}{motif}"),
        }
    }
}

// =============================================================================
// Thermodynamic model
// =============================================================================

/// Treatment of dangling ends by the energy model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DangleMode {
    /// No dangle contributions.
    Ignore,
    /// Dangles only on unpaired neighbours.
    Single,
    /// Dangles on both sides of every helix.
    #[default]
    Double,
    /// Coaxial stacking in addition to single dangles.
    Coaxial,
}

impl DangleMode {
    /// Numeric flag understood by ViennaRNA's `--dangles`.
    #[must_use]
    pub const fn as_flag(self) -> u8 {
        match self {
            Self::Ignore => 0,
            Self::Single => 1,
            Self::Double => 2,
            Self::Coaxial => 3,
        }
    }
}

/// Parameters handed to the structure predictor for one fold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Folding temperature in °C.
    pub temperature: f64,
    pub dangles: DangleMode,
    /// Forbid helices of a single base pair.
    pub no_lonely_pairs: bool,
    /// Allow G-U wobble pairs.
    pub allow_gu_pairs: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: BASE_TEMPERATURE,
            dangles: DangleMode::Double,
            no_lonely_pairs: true,
            allow_gu_pairs: true,
        }
    }
}

impl ModelConfig {
    /// Same model at another temperature.
    #[must_use]
    pub const fn at(self, temperature: f64) -> Self {
        Self {
            temperature,
            ..self
        }
    }
}

// =============================================================================
// Output columns
// =============================================================================

/// Output columns in canonical emission order.
///
/// The declaration order is the column order of every written table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Name,
    OriginalSequence,
    OriginalStructure,
    OriginalMfe25,
    OriginalMfe37,
    OriginalMfe42,
    OriginalAuPercent,
    OriginalGcPercent,
    OriginalGuPercent,
    OriginalMfe25InRange,
    OriginalMfe37InRange,
    OriginalMfe42InRange,
    OriginalAuInRange,
    OriginalGcInRange,
    OriginalGuInRange,
    HairpinSequence,
    HairpinStructure,
    HairpinAuPercent,
    HairpinGcPercent,
    HairpinGuPercent,
    HairpinMfe25,
    HairpinMfe37,
    HairpinMfe42,
    HairpinMfe25InRange,
    HairpinMfe37InRange,
    HairpinMfe42InRange,
    HairpinAuInRange,
    HairpinGcInRange,
    HairpinGuInRange,
    RbsSequence,
    RbsStructure,
    RbsPairedPercent,
    QualityScoreHairpin,
    QualityScoreOriginal,
}

impl Column {
    pub const ALL: [Self; 34] = [
        Self::Name,
        Self::OriginalSequence,
        Self::OriginalStructure,
        Self::OriginalMfe25,
        Self::OriginalMfe37,
        Self::OriginalMfe42,
        Self::OriginalAuPercent,
        Self::OriginalGcPercent,
        Self::OriginalGuPercent,
        Self::OriginalMfe25InRange,
        Self::OriginalMfe37InRange,
        Self::OriginalMfe42InRange,
        Self::OriginalAuInRange,
        Self::OriginalGcInRange,
        Self::OriginalGuInRange,
        Self::HairpinSequence,
        Self::HairpinStructure,
        Self::HairpinAuPercent,
        Self::HairpinGcPercent,
        Self::HairpinGuPercent,
        Self::HairpinMfe25,
        Self::HairpinMfe37,
        Self::HairpinMfe42,
        Self::HairpinMfe25InRange,
        Self::HairpinMfe37InRange,
        Self::HairpinMfe42InRange,
        Self::HairpinAuInRange,
        Self::HairpinGcInRange,
        Self::HairpinGuInRange,
        Self::RbsSequence,
        Self::RbsStructure,
        Self::RbsPairedPercent,
        Self::QualityScoreHairpin,
        Self::QualityScoreOriginal,
    ];

    /// Key used in the settings file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::OriginalSequence => "original_sequence",
            Self::OriginalStructure => "original_structure",
            Self::OriginalMfe25 => "original_mfe_25",
            Self::OriginalMfe37 => "original_mfe_37",
            Self::OriginalMfe42 => "original_mfe_42",
            Self::OriginalAuPercent => "original_au_percent",
            Self::OriginalGcPercent => "original_gc_percent",
            Self::OriginalGuPercent => "original_gu_percent",
            Self::OriginalMfe25InRange => "original_mfe_25_in_range",
            Self::OriginalMfe37InRange => "original_mfe_37_in_range",
            Self::OriginalMfe42InRange => "original_mfe_42_in_range",
            Self::OriginalAuInRange => "original_au_in_range",
            Self::OriginalGcInRange => "original_gc_in_range",
            Self::OriginalGuInRange => "original_gu_in_range",
            Self::HairpinSequence => "hairpin_sequence",
            Self::HairpinStructure => "hairpin_structure",
            Self::HairpinAuPercent => "hairpin_au_percent",
            Self::HairpinGcPercent => "hairpin_gc_percent",
            Self::HairpinGuPercent => "hairpin_gu_percent",
            Self::HairpinMfe25 => "mfe_25c_hairpin",
            Self::HairpinMfe37 => "mfe_37c_hairpin",
            Self::HairpinMfe42 => "mfe_42c_hairpin",
            Self::HairpinMfe25InRange => "mfe_25_in_range_hairpin",
            Self::HairpinMfe37InRange => "mfe_37_in_range_hairpin",
            Self::HairpinMfe42InRange => "mfe_42_in_range_hairpin",
            Self::HairpinAuInRange => "au_in_range_hairpin",
            Self::HairpinGcInRange => "gc_in_range_hairpin",
            Self::HairpinGuInRange => "gu_in_range_hairpin",
            Self::RbsSequence => "rbs_sequence",
            Self::RbsStructure => "rbs_structure",
            Self::RbsPairedPercent => "rbs_paired_percent",
            Self::QualityScoreHairpin => "quality_score_hairpin",
            Self::QualityScoreOriginal => "quality_score_original",
        }
    }

    /// Header written to the output table.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::OriginalSequence => "Sequence",
            Self::OriginalStructure => "Structure",
            Self::OriginalMfe25 => "Original_MFE_25C",
            Self::OriginalMfe37 => "Original_MFE_37C",
            Self::OriginalMfe42 => "Original_MFE_42C",
            Self::OriginalAuPercent => "Original_AU%",
            Self::OriginalGcPercent => "Original_GC%",
            Self::OriginalGuPercent => "Original_GU%",
            Self::OriginalMfe25InRange => "Original_MFE_25C_InRange",
            Self::OriginalMfe37InRange => "Original_MFE_37C_InRange",
            Self::OriginalMfe42InRange => "Original_MFE_42C_InRange",
            Self::OriginalAuInRange => "Original_AU%_InRange",
            Self::OriginalGcInRange => "Original_GC%_InRange",
            Self::OriginalGuInRange => "Original_GU%_InRange",
            Self::HairpinSequence => "Hairpin_Sequence",
            Self::HairpinStructure => "Hairpin_Structure",
            Self::HairpinAuPercent => "Hairpin_AU%",
            Self::HairpinGcPercent => "Hairpin_GC%",
            Self::HairpinGuPercent => "Hairpin_GU%",
            Self::HairpinMfe25 => "Hairpin_MFE_25C",
            Self::HairpinMfe37 => "Hairpin_MFE_37C",
            Self::HairpinMfe42 => "Hairpin_MFE_42C",
            Self::HairpinMfe25InRange => "Hairpin_MFE_25C_InRange",
            Self::HairpinMfe37InRange => "Hairpin_MFE_37C_InRange",
            Self::HairpinMfe42InRange => "Hairpin_MFE_42C_InRange",
            Self::HairpinAuInRange => "Hairpin_AU%_InRange",
            Self::HairpinGcInRange => "Hairpin_GC%_InRange",
            Self::HairpinGuInRange => "Hairpin_GU%_InRange",
            Self::RbsSequence => "RBS_Sequence",
            Self::RbsStructure => "RBS_Structure",
            Self::RbsPairedPercent => "RBS_Paired%",
            Self::QualityScoreHairpin => "Quality_Score_Hairpin",
            Self::QualityScoreOriginal => "Quality_Score_Original",
        }
    }

    /// Whether the column is written with default settings.
    ///
    /// Everything computed on the full sequence beyond its name, sequence
    /// and structure is off by default.
    #[must_use]
    pub const fn enabled_by_default(self) -> bool {
        !matches!(
            self,
            Self::OriginalMfe25
                | Self::OriginalMfe37
                | Self::OriginalMfe42
                | Self::OriginalAuPercent
                | Self::OriginalGcPercent
                | Self::OriginalGuPercent
                | Self::OriginalMfe25InRange
                | Self::OriginalMfe37InRange
                | Self::OriginalMfe42InRange
                | Self::OriginalAuInRange
                | Self::OriginalGcInRange
                | Self::OriginalGuInRange
                | Self::QualityScoreOriginal
        )
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Set of columns written to the output table.
///
/// Stored as a `key -> bool` map in the settings file. Keys missing from the
/// file keep their default; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, bool>")]
pub struct ColumnSelection {
    enabled: BTreeSet<Column>,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self {
            enabled: Column::ALL
                .into_iter()
                .filter(|c| c.enabled_by_default())
                .collect(),
        }
    }
}

impl From<BTreeMap<String, bool>> for ColumnSelection {
    fn from(flags: BTreeMap<String, bool>) -> Self {
        let mut selection = Self::default();
        for (key, enabled) in flags {
            if let Some(column) = Column::from_key(&key) {
                selection.set(column, enabled);
            }
        }
        selection
    }
}

impl Serialize for ColumnSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Column::ALL.len()))?;
        for column in Column::ALL {
            map.serialize_entry(column.key(), &self.is_enabled(column))?;
        }
        map.end()
    }
}

impl ColumnSelection {
    /// Selection with every column enabled.
    #[must_use]
    pub fn all() -> Self {
        Self {
            enabled: Column::ALL.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, column: Column) -> bool {
        self.enabled.contains(&column)
    }

    pub fn set(&mut self, column: Column, enabled: bool) {
        if enabled {
            self.enabled.insert(column);
        } else {
            self.enabled.remove(&column);
        }
    }

    /// Enabled columns in canonical order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.enabled.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

// =============================================================================
// Settings file
// =============================================================================

/// Persisted user settings.
///
/// Sections or keys absent from the file fall back to their defaults, so
/// settings written by older versions keep loading.
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::config::ScreenSettings;
///
/// let settings: ScreenSettings =
///     serde_json::from_str(r#"{ "calculation_settings": { "calculate_rbs": false } }"#).unwrap();
/// assert!(!settings.calculation_settings.rbs);
/// assert_eq!(settings.analysis_ranges.hairpin.au.min(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub csv_output_columns: ColumnSelection,
    pub calculation_settings: CalculationToggles,
    pub sequence_processing: SequencePreprocessing,
    pub analysis_ranges: AnalysisRanges,
}

impl ScreenSettings {
    /// Reads and validates a settings file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for an unreadable file, [`ThermoError::Json`] for
    /// malformed JSON or an invalid range, and [`ThermoError::InvalidConfig`]
    /// for an unusable append motif.
    pub fn load(path: &Path) -> Result<Self, ThermoError> {
        let text = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads `path`, writing the defaults there first if it does not exist.
    ///
    /// # Errors
    ///
    /// See [`ScreenSettings::load`] and [`ScreenSettings::save`].
    pub fn load_or_create(path: &Path) -> Result<Self, ThermoError> {
        if path.exists() {
            return Self::load(path);
        }
        let settings = Self::default();
        settings.save(path)?;
        tracing::info!(path = %path.display(), "Created default settings file");
        Ok(settings)
    }

    /// Writes the settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an I/O or serialization error.
    pub fn save(&self, path: &Path) -> Result<(), ThermoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ThermoError::InvalidConfig`] for an unusable append motif.
    pub fn validate(&self) -> Result<(), ThermoError> {
        self.sequence_processing.validate()
    }
}

// =============================================================================
// Runtime configuration
// =============================================================================

/// Configuration consumed by [`ThermometerScreen`](crate::engine::ThermometerScreen).
///
/// # Examples
///
/// ```rust
/// use thermofinder_core::config::{CalculationToggles, ScreenConfig};
///
/// let config = ScreenConfig {
///     toggles: CalculationToggles {
///         original_mfe_sweep: true,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// assert_eq!(config.temperatures, [25.0, 37.0, 42.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    /// Acceptance ranges for hairpin and full-sequence scoring.
    pub ranges: AnalysisRanges,

    /// Optional full-sequence calculations and the RBS search.
    pub toggles: CalculationToggles,

    /// Motif attached to each sequence before folding.
    ///
    /// **Default**: disabled
    pub preprocessing: SequencePreprocessing,

    /// Model for the full-sequence fold used to find the terminal hairpin.
    ///
    /// **Default**: 25 °C, double dangles, no lonely pairs, GU allowed
    pub base_model: ModelConfig,

    /// Model for the per-temperature folds. Its temperature is replaced by
    /// each entry of `temperatures`.
    ///
    /// **Default**: same as `base_model`
    pub sweep_model: ModelConfig,

    /// Folding temperatures in °C, matching the three energy ranges.
    ///
    /// **Default**: `[25.0, 37.0, 42.0]`
    pub temperatures: [f64; 3],
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            ranges: AnalysisRanges::default(),
            toggles: CalculationToggles::default(),
            preprocessing: SequencePreprocessing::default(),
            base_model: ModelConfig::default(),
            sweep_model: ModelConfig::default(),
            temperatures: TARGET_TEMPERATURES,
        }
    }
}

impl From<&ScreenSettings> for ScreenConfig {
    fn from(settings: &ScreenSettings) -> Self {
        Self {
            ranges: settings.analysis_ranges,
            toggles: settings.calculation_settings,
            preprocessing: settings.sequence_processing.clone(),
            ..Default::default()
        }
    }
}
