#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Stand-in for `RNAfold`: pairs the outer four bases with the last four.
/// Sequences starting with `A` get energies inside the default hairpin
/// ranges (-12 / -8 / -4 kcal/mol at 25 / 37 / 42 °C), all others -1.
const FAKE_RNAFOLD: &str = r#"#!/bin/sh
temp=25
for arg in "$@"; do
    case "$arg" in
        --version) echo "RNAfold 2.6.4"; exit 0 ;;
        --temp=*) temp="${arg#--temp=}" ;;
    esac
done
read -r seq
awk -v seq="$seq" -v temp="$temp" 'BEGIN {
    n = length(seq)
    s = ""
    if (n >= 10) {
        s = "(((("
        for (i = 0; i < n - 8; i++) s = s "."
        s = s "))))"
    } else {
        for (i = 0; i < n; i++) s = s "."
    }
    e = -1.0
    if (substr(seq, 1, 1) == "A") {
        if (temp < 30) e = -12.0
        else if (temp < 40) e = -8.0
        else e = -4.0
    }
    printf "%s\n%s (%6.2f)\n", seq, s, e
}'
"#;

/// Writes the fake `RNAfold` into `dir` and returns its path.
#[cfg(unix)]
pub fn install_fake_rnafold(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("RNAfold");
    fs::write(&path, FAKE_RNAFOLD).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// The `thermofinder` binary with quiet logging.
pub fn thermofinder() -> Command {
    let mut cmd = Command::cargo_bin("thermofinder").unwrap();
    cmd.env_remove("RUST_LOG").arg("-q");
    cmd
}

/// Whether the real ViennaRNA `RNAfold` is on `PATH`.
pub fn rnafold_available() -> bool {
    std::process::Command::new("RNAfold")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}
