use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn hireform() -> Command {
    let mut cmd = Command::cargo_bin("hireform").expect("binary exists");
    cmd.env_remove("HIREFORM_VALIDATION")
        .env_remove("HIREFORM_ACCEPTED_TYPES")
        .env("HIREFORM_LOG", "off");
    cmd
}

#[test]
fn help_displays_usage() {
    hireform()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn submit_prints_json_receipt() {
    let temp = tempfile::tempdir().unwrap();
    let cv = temp.path().join("cv.pdf");
    fs::write(&cv, b"%PDF-1.7").unwrap();

    hireform()
        .current_dir(temp.path())
        .args(["submit", "--name", "Grace Hopper", "--phone", "+1 202 555 0143"])
        .args(["--email", "grace@example.com", "--skill", "senior", "--agree"])
        .arg("--resume")
        .arg(&cv)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Grace Hopper\""))
        .stdout(predicate::str::contains("\"skill\": \"Senior\""))
        .stdout(predicate::str::contains("\"size\": 8"));
}

#[test]
fn submit_prints_text_receipt_for_directory() {
    let temp = tempfile::tempdir().unwrap();
    let docs = temp.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("cv.pdf"), b"pdf").unwrap();
    fs::write(docs.join("notes.txt"), b"txt").unwrap();

    hireform()
        .current_dir(temp.path())
        .args(["submit", "--name", "Grace", "--phone", "+49 30 1234567"])
        .args(["--email", "grace@example.com", "--skill", "cto", "--agree"])
        .args(["--resume", "docs", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resume (1 files, 3 B):"))
        .stdout(predicate::str::contains("1. cv.pdf [application/pdf]"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn invalid_submission_lists_field_errors() {
    let temp = tempfile::tempdir().unwrap();
    let photo = temp.path().join("photo.jpg");
    fs::write(&photo, b"jpeg").unwrap();

    hireform()
        .current_dir(temp.path())
        .args(["submit", "--name", "Grace", "--phone", "12"])
        .args(["--email", "grace@", "--skill", "junior"])
        .arg("--resume")
        .arg(&photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("phone: Please enter a valid phone number"))
        .stderr(predicate::str::contains("email: Please enter a valid email"))
        .stderr(predicate::str::contains("resume: Unsupported file format"))
        .stderr(predicate::str::contains(
            "agreement: Please agree to our data collection",
        ));
}

#[test]
fn missing_resume_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    hireform()
        .current_dir(temp.path())
        .args(["submit", "--name", "Grace", "--phone", "+1 202 555 0143"])
        .args(["--email", "grace@example.com", "--skill", "lead", "--agree"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resume: Please select your files"));
}

#[test]
fn missing_explicit_config_fails() {
    let temp = tempfile::tempdir().unwrap();
    hireform()
        .current_dir(temp.path())
        .args(["--config", "absent.toml", "submit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn completions_are_generated() {
    hireform()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hireform"));
}
