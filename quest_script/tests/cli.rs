mod common;

use std::fs;
use std::process::Command;

use common::{NECKLACE, TABLES};

fn quest_script() -> Command {
    Command::new(env!("CARGO_BIN_EXE_quest_script"))
}

#[test]
fn clean_directory_passes() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("S0000011.txt"), NECKLACE).unwrap();
    fs::write(dir.path().join("notes.md"), "not a quest").unwrap();

    let output = quest_script()
        .args(["lint", "--tables", TABLES])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());
}

#[test]
fn errors_fail_the_run_with_caret_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("S0000020.txt");
    fs::write(&path, "Quest: S0000020\nQRC:\nQBN:\n_a_ task:\n  frobnicate\n  end quest\nstart task _a_").unwrap();

    let output = quest_script()
        .env("NO_COLOR", "1")
        .args(["lint", "--tables", TABLES])
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("S0000020.txt:5:3: error[UndefinedExpression]"), "{stdout}");
    assert!(stdout.contains("  ^^^^^^^^^^"), "{stdout}");
}

#[test]
fn warnings_fail_only_when_denied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("S0000021.txt");
    fs::write(&path, "Quest: S0000021\nQRC:\nQBN:\nItem _unused_").unwrap();

    let lenient = quest_script()
        .args(["lint", "--tables", TABLES])
        .arg(&path)
        .output()
        .unwrap();
    assert!(lenient.status.success());

    let strict = quest_script()
        .args(["lint", "--deny-warnings", "--tables", TABLES])
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn json_output_lists_every_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("S0000011.txt"), NECKLACE).unwrap();
    fs::write(dir.path().join("S0000022.txt"), "Quest: S0000011\nQRC:\nQBN:").unwrap();

    let output = quest_script()
        .args(["lint", "--format", "json", "--tables", TABLES])
        .arg(dir.path())
        .output()
        .unwrap();
    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports[0]["diagnostics"].as_array().unwrap().is_empty());
    let codes: Vec<&str> = reports[1]["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"QuestNameMismatch"));
    assert!(codes.contains(&"QuestNameInUse"));
}
