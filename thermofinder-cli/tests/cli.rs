#![cfg(unix)]

mod common;

use std::fs;

use common::{install_fake_rnafold, rnafold_available, thermofinder, write_input};
use tempfile::TempDir;

const UTRS: &str = ">low1\nCCGGAAAACCGG\n>hot lacZ\nAAGGGAAACTTT\n>tiny\nACG\n";

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_fasta_screen_writes_ranked_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    let rnafold = install_fake_rnafold(dir.path());
    let input = write_input(dir.path(), "utrs.fasta", UTRS);

    let output = thermofinder()
        .arg("-i")
        .arg(&input)
        .arg("--rnafold")
        .arg(&rnafold)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Name,Sequence,Structure,Hairpin_Sequence"));
    assert!(lines[0].ends_with("RBS_Paired%,Quality_Score_Hairpin"));
    assert!(lines[1].starts_with("hot lacZ,AAGGGAAACUUU,((((....)))),"));
    assert!(lines[1].ends_with(",6"));
    assert!(lines[2].starts_with("low1,"));
    assert!(lines[2].ends_with(",0"));
}

#[test]
fn test_output_file_and_settings_file_are_written() {
    let dir = TempDir::new().unwrap();
    let rnafold = install_fake_rnafold(dir.path());
    let input = write_input(dir.path(), "utrs.fasta", UTRS);
    let output_csv = dir.path().join("out").join("candidates.csv");
    let settings = dir.path().join("config").join("thermofinder.json");
    fs::create_dir_all(output_csv.parent().unwrap()).unwrap();

    thermofinder()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output_csv)
        .arg("-s")
        .arg(&settings)
        .arg("--rnafold")
        .arg(&rnafold)
        .assert()
        .success();

    let csv = fs::read_to_string(&output_csv).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let json = fs::read_to_string(&settings).unwrap();
    assert!(json.contains("\"csv_output_columns\""));
    assert!(json.contains("\"analysis_ranges\""));
}

#[test]
fn test_settings_select_columns_and_original_metrics() {
    let dir = TempDir::new().unwrap();
    let rnafold = install_fake_rnafold(dir.path());
    let input = write_input(dir.path(), "utrs.fasta", ">hot\nAAGGGAAACUUU\n");
    let settings = write_input(
        dir.path(),
        "settings.json",
        r#"{
            "csv_output_columns": {
                "name": true,
                "original_sequence": false,
                "original_structure": false,
                "hairpin_sequence": false,
                "hairpin_structure": false,
                "hairpin_au_percent": false,
                "hairpin_gc_percent": false,
                "hairpin_gu_percent": false,
                "mfe_25c_hairpin": false,
                "mfe_37c_hairpin": false,
                "mfe_42c_hairpin": false,
                "mfe_25_in_range_hairpin": false,
                "mfe_37_in_range_hairpin": false,
                "mfe_42_in_range_hairpin": false,
                "au_in_range_hairpin": false,
                "gc_in_range_hairpin": false,
                "gu_in_range_hairpin": false,
                "rbs_sequence": false,
                "rbs_structure": false,
                "rbs_paired_percent": false,
                "quality_score_hairpin": false,
                "original_mfe_37": true
            },
            "calculation_settings": { "calculate_original_mfe_temps": true }
        }"#,
    );

    let output = thermofinder()
        .arg("-i")
        .arg(&input)
        .arg("-s")
        .arg(&settings)
        .arg("--rnafold")
        .arg(&rnafold)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_lines(&output), vec!["Name,Original_MFE_37C", "hot,-8.00"]);
}

#[test]
fn test_csv_input_with_layout_and_appended_motif() {
    let dir = TempDir::new().unwrap();
    let rnafold = install_fake_rnafold(dir.path());
    let input = write_input(
        dir.path(),
        "export.csv",
        "exported by tool\nid,notes,sequence\nhot,x,aagggaaacuuu\nbroken\n",
    );

    let output = thermofinder()
        .arg("-i")
        .arg(&input)
        .args(["--skip-rows", "2", "--name-column", "0", "--sequence-column", "2"])
        .args(["--append", "aug", "--append-position", "end"])
        .arg("--rnafold")
        .arg(&rnafold)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("hot,AAGGGAAACUUUAUG,((((.......)))),"));
}

#[test]
fn test_missing_rnafold_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "utrs.fasta", UTRS);

    let output = thermofinder()
        .arg("-i")
        .arg(&input)
        .arg("--rnafold")
        .arg(dir.path().join("no-such-rnafold"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_empty_input_fails() {
    let dir = TempDir::new().unwrap();
    let rnafold = install_fake_rnafold(dir.path());
    let input = write_input(dir.path(), "empty.fasta", "");

    thermofinder()
        .arg("-i")
        .arg(&input)
        .arg("--rnafold")
        .arg(&rnafold)
        .assert()
        .failure();
}

#[test]
fn test_invalid_append_position_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "utrs.fasta", UTRS);

    thermofinder()
        .arg("-i")
        .arg(&input)
        .args(["--append-position", "middle"])
        .assert()
        .failure();
}

#[test]
fn test_real_rnafold_screen() {
    if !rnafold_available() {
        eprintln!("Skipping: RNAfold not in PATH");
        return;
    }
    let dir = TempDir::new().unwrap();
    let input = write_input(
        dir.path(),
        "utrs.fasta",
        ">rose\nGGCCGCAAGGCCGUCAAAAGGAGAGGGGCCUUUUGGCCAUGAAACGUAAG\n",
    );

    let output = thermofinder().arg("-i").arg(&input).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let lines = stdout_lines(&output);
    assert!(!lines.is_empty());
    assert!(lines[0].starts_with("Name,"));
}
