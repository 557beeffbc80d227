use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn seed(path: &str, contents: &str) {
    let path = Path::new(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn segsweep() -> Command {
    Command::cargo_bin("segsweep").unwrap()
}

#[test]
fn test_help() {
    segsweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_run_requires_template_flags() {
    segsweep()
        .args(["run", "--tasks", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input-template"));
}

#[test]
fn test_run_rejects_plan_combined_with_field_flags() {
    segsweep()
        .args(["run", "--plan", "plan.json", "--tasks", "A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be combined"));
}

#[test]
fn test_run_rejects_template_without_placeholder() {
    segsweep()
        .args([
            "run",
            "--tasks",
            "A",
            "--input-template",
            "corpus/imagesTr",
            "--output-find",
            "corpus",
            "--output-replace",
            "corpus_out",
            "--program",
            "cp",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_run_rejects_missing_plan_file() {
    segsweep()
        .args(["run", "--plan", "TEST_CLI_NO_SUCH_PLAN.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PlanReadError"));
}

#[test]
fn test_run_sweeps_and_resumes() {
    let root = "TEST_CLI_SWEEP";
    seed(&format!("{}/corpus/A/imagesTr/x.nii.gz", root), "volume-x");
    seed(&format!("{}/corpus/A/imagesTr/y.txt", root), "notes");

    let args = [
        "run",
        "--tasks",
        "A",
        "--input-template",
        "TEST_CLI_SWEEP/corpus/###/imagesTr",
        "--output-find",
        "corpus",
        "--output-replace",
        "corpus_out",
        "--program",
        "cp",
        "--input-flag",
        "",
        "--output-flag",
        "",
        "--verbose",
    ];

    segsweep().args(args).assert().success();

    let output_dir = format!("{}/corpus_out/A/imagesTr", root);
    assert_eq!(
        std::fs::read_to_string(format!("{}/x.nii.gz", output_dir)).unwrap(),
        "volume-x"
    );
    assert!(!Path::new(&format!("{}/y.txt", output_dir)).exists());

    segsweep()
        .args(args)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Skipping x.nii.gz because it already exists",
        ));

    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn test_run_with_plan_file_and_report() {
    let root = "TEST_CLI_PLAN";
    seed(&format!("{}/corpus/A/imagesTr/x.nii.gz", root), "volume-x");
    seed(
        &format!("{}/plan.json", root),
        r#"{
            "tasks": ["A"],
            "template": "TEST_CLI_PLAN/corpus/###/imagesTr",
            "output": { "find": "corpus", "replace": "corpus_out" },
            "tool": { "program": "cp", "input_flag": "", "output_flag": "" }
        }"#,
    );

    segsweep()
        .args([
            "run",
            "--plan",
            &format!("{}/plan.json", root),
            "--report",
            &format!("{}/report.tsv", root),
        ])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(format!("{}/corpus_out/A/imagesTr/x.nii.gz", root)).unwrap(),
        "volume-x"
    );

    let report = std::fs::read_to_string(format!("{}/report.tsv", root)).unwrap();
    assert!(report.contains("A\tx.nii.gz\tdone"));

    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn test_run_dry_run_prints_commands() {
    let root = "TEST_CLI_DRYRUN";
    seed(&format!("{}/corpus/A/imagesTr/x.nii.gz", root), "volume-x");

    segsweep()
        .args([
            "run",
            "--tasks",
            "A",
            "--input-template",
            "TEST_CLI_DRYRUN/corpus/###/imagesTr",
            "--output-find",
            "corpus",
            "--output-replace",
            "corpus_out",
            "--program",
            "TotalSegmentator",
            "--tool-arg",
            "-ml",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "TotalSegmentator -i TEST_CLI_DRYRUN/corpus/A/imagesTr/x.nii.gz -o TEST_CLI_DRYRUN/corpus_out/A/imagesTr/x.nii.gz -ml",
        ));

    assert!(!Path::new(&format!("{}/corpus_out", root)).exists());

    std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn test_status_reports_counts() {
    let root = "TEST_CLI_STATUS";
    seed(&format!("{}/corpus/A/imagesTr/a.nii.gz", root), "volume-a");
    seed(&format!("{}/corpus/A/imagesTr/b.nii.gz", root), "volume-b");
    seed(&format!("{}/corpus_out/A/imagesTr/a.nii.gz", root), "done");

    segsweep()
        .args([
            "status",
            "--tasks",
            "A,B",
            "--input-template",
            "TEST_CLI_STATUS/corpus/###/imagesTr",
            "--output-find",
            "corpus",
            "--output-replace",
            "corpus_out",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"))
        .stdout(predicate::str::contains("missing"));

    std::fs::remove_dir_all(root).unwrap();
}
