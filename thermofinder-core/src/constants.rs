// =============================================================================
// Folding temperatures
// =============================================================================

/// Temperatures (°C) at which every hairpin is refolded.
///
/// The first entry doubles as the base temperature used to fold the full
/// sequence for hairpin detection.
pub const TARGET_TEMPERATURES: [f64; 3] = [25.0, 37.0, 42.0];

/// Temperature of the mandatory full-sequence fold.
pub const BASE_TEMPERATURE: f64 = TARGET_TEMPERATURES[0];

// =============================================================================
// Sequence handling
// =============================================================================

/// Sequences of this length or shorter cannot hold a hairpin and are skipped.
pub const MAX_SKIPPED_LENGTH: usize = 4;

/// Motif appended or prepended during preprocessing when none is configured.
pub const DEFAULT_APPEND_MOTIF: &str = "AUG";

/// Nucleotide alphabet accepted by the screen.
pub const RNA_ALPHABET: &[u8] = b"ACGU";

// =============================================================================
// Ribosome binding site search
// =============================================================================

/// Start codon anchoring the RBS search.
pub const START_CODON: &str = "AUG";

/// Farthest upstream distance (nt) from the start codon that is scanned.
pub const RBS_UPSTREAM_DISTANCE: usize = 13;

/// Nearest upstream distance (nt) from the start codon that is scanned.
pub const RBS_DOWNSTREAM_DISTANCE: usize = 5;

/// Width of the sliding Shine-Dalgarno window.
pub const RBS_WINDOW: usize = 6;

/// Minimum number of guanines for a window to count as Shine-Dalgarno-like.
pub const RBS_MIN_GUANINES: usize = 3;

// =============================================================================
// Scoring
// =============================================================================

/// Number of independent range checks per scope (three energies, three percentages).
pub const MAX_QUALITY_SCORE: u8 = 6;

/// Hairpin score at or above which a record is a top candidate.
pub const TOP_CANDIDATE_SCORE: u8 = 4;

/// Label written for metrics inside their configured range.
pub const IN_RANGE_LABEL: &str = "In Range";

/// Label written for metrics outside their configured range.
pub const NOT_IN_RANGE_LABEL: &str = "Not in Range";

// =============================================================================
// Input defaults
// =============================================================================

/// Metadata rows preceding the table in delimited sequence exports.
pub const DEFAULT_SKIP_ROWS: usize = 30;

/// Column holding the sequence name in delimited exports.
pub const DEFAULT_NAME_COLUMN: usize = 0;

/// Column holding the nucleotide sequence in delimited exports.
pub const DEFAULT_SEQUENCE_COLUMN: usize = 10;

/// Executable name of the ViennaRNA folding program.
pub const DEFAULT_RNAFOLD_PROGRAM: &str = "RNAfold";
