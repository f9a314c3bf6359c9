use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn convert_markdown_to_json_via_cli() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "# Title\n\n- [ ] open\n- [x] done\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("convert").arg(&input).arg("--to").arg("json");

    let output_pred = predicate::str::contains("\"type\": \"doc\"")
        .and(predicate::str::contains("\"type\": \"heading\""))
        .and(predicate::str::contains("\"type\": \"todoList\""))
        .and(predicate::str::contains("\"checked\": true"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn convert_is_the_default_command() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "one\n\ntwo\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg(&input).arg("--to").arg("treeviz");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("⧉ doc (2 blocks)"));
}

#[test]
fn convert_json_back_to_markdown_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(
        &input,
        r#"{"type":"doc","content":[{"type":"paragraph","content":[
            {"type":"text","text":"bold","marks":[{"type":"bold"}]},
            {"type":"text","text":" words"}]}]}"#,
    )
    .unwrap();
    let output = dir.path().join("doc.md");

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("convert")
        .arg(&input)
        .arg("--to")
        .arg("markdown")
        .arg("-o")
        .arg(&output);
    cmd.assert().success().stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&output).unwrap(), "**bold** words");
}

#[test]
fn convert_rejects_unknown_target() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "text\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("convert").arg(&input).arg("--to").arg("docx");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("docx"));
}

#[test]
fn convert_needs_from_for_unknown_extension() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "text\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("convert").arg(&input).arg("--to").arg("json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Please specify --from"));

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("convert")
        .arg(&input)
        .arg("--from")
        .arg("markdown")
        .arg("--to")
        .arg("json");
    cmd.assert().success();
}

#[test]
fn inspect_lists_transforms() {
    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("--list-transforms");

    cmd.assert().success().stdout(
        predicate::str::contains("markup-treeviz")
            .and(predicate::str::contains("tokens-json"))
            .and(predicate::str::contains("markdown")),
    );
}

#[test]
fn inspect_shows_marks_on_request() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "**loud**\n").unwrap();

    let mut cmd = cargo_bin_cmd!("markup");
    cmd.arg("inspect")
        .arg(&input)
        .arg("--extra-show-marks")
        .arg("true");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[bold]"));
}
