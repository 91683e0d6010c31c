use assert_cmd::Command;
use predicates::str::contains;

const SHEET: &str = "\
작업지시서
STYLE NO: TH2F7ASZ501ME
BK (SN)
100 20 20 20 20 20
WT (SN)
61 12 12 12 12 12
";

/// Runs outside the crate root so a developer's `.env` is not picked up
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("ordersheet-extract").unwrap();
    cmd.current_dir(std::env::temp_dir());
    for key in [
        "SIZE_LABELS",
        "STRICT_COLOR_CONTEXT",
        "QUANTITY_LINE_GATE",
        "OCR_PSM",
        "OCR_OEM",
        "PREPROCESS_SCALE",
        "PREPROCESS_CONTRAST",
        "EXTRACT_TIMEOUT_SECS",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

fn sheet_file() -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), SHEET).unwrap();
    file
}

#[test]
fn text_file_summary() {
    let file = sheet_file();
    cmd()
        .arg("--text-file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("Style no: TH2F7ASZ501ME"))
        .stdout(contains("Color: BK (SN)"))
        .stdout(contains("230=20"));
}

#[test]
fn text_file_json() {
    let file = sheet_file();
    let output = cmd()
        .arg("--json")
        .arg("--text-file")
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["style_no"], "TH2F7ASZ501ME");
    assert_eq!(value["order_details"].as_array().unwrap().len(), 2);
    assert_eq!(value["order_details"][0]["size_matrix"]["250"], 20);
    assert_eq!(value["raw_text"], SHEET);
}

#[test]
fn check_totals_warns_on_stderr() {
    let file = sheet_file();
    cmd()
        .args(["--check-totals", "--text-file"])
        .arg(file.path())
        .assert()
        .success()
        .stderr(contains("printed total 61 but sizes add up to 60"));
}

#[test]
fn strict_color_context_from_env() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "BK (SN)\n100 20 20 20 20 20\n100 20 20 20 20 20\n").unwrap();
    let output = cmd()
        .env("STRICT_COLOR_CONTEXT", "true")
        .args(["--json", "--text-file"])
        .arg(file.path())
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["order_details"].as_array().unwrap().len(), 1);
}

#[test]
fn unreadable_image_fails() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not an image").unwrap();
    cmd()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(contains("could not read image"));
}

#[test]
fn invalid_config_fails() {
    let file = sheet_file();
    cmd()
        .env("OCR_PSM", "auto")
        .arg("--text-file")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(contains("invalid configuration"));
}

#[test]
fn dotenv_in_working_directory_is_ignored_when_env_is_set() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "SIZE_LABELS=220,225\n").unwrap();
    let file = sheet_file();
    let output = cmd()
        .current_dir(dir.path())
        .env("SIZE_LABELS", "230,235,240,245,250")
        .args(["--json", "--text-file"])
        .arg(file.path())
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["order_details"][0]["size_matrix"]["250"], 20);
}

#[test]
fn missing_input_is_usage_error() {
    cmd().assert().failure();
}
