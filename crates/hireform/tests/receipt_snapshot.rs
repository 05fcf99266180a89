use std::path::PathBuf;

use hireform::app::form::FormState;
use hireform::app::receipt::{Application, ReceiptFormat, ReceiptRenderer};
use hireform::app::selection::{FileSelectionManager, SequentialIdentities};
use hireform::domain::model::{FilePayload, SkillLevel};
use insta::assert_snapshot;
use time::macros::datetime;

fn payload(name: &str, mime_type: &str, size: u64) -> FilePayload {
    FilePayload {
        name: name.into(),
        mime_type: mime_type.into(),
        size,
        handle: PathBuf::from(name),
    }
}

fn application(files: Vec<FilePayload>) -> Application {
    let mut form = FormState::default();
    let mut manager = FileSelectionManager::with_identities(SequentialIdentities::default());
    form.set_name("Ada Lovelace");
    form.set_phone("+44 20 7183 8750");
    form.set_email("ada@example.org");
    form.set_skill(Some(SkillLevel::Lead));
    form.set_agreement(true);
    manager.add_files(&mut form, files);
    form.submit(datetime!(2024-05-01 09:30 UTC))
        .expect("valid application")
}

#[test]
fn json_receipt_lists_files_with_identities() {
    let application = application(vec![payload("cv.pdf", "application/pdf", 2048)]);
    let rendered = ReceiptRenderer::new()
        .unwrap()
        .render(&application, ReceiptFormat::Json)
        .unwrap();

    assert_snapshot!(rendered, @r#"
    {
      "name": "Ada Lovelace",
      "phone": "+44 20 7183 8750",
      "email": "ada@example.org",
      "skill": "Lead",
      "resume": [
        {
          "id": "file-1",
          "name": "cv.pdf",
          "mime_type": "application/pdf",
          "size": 2048
        }
      ],
      "agreement": true,
      "submitted_at": "2024-05-01T09:30:00Z"
    }
    "#);
}

#[test]
fn text_receipt_numbers_files_in_selection_order() {
    let application = application(vec![
        payload("cv.pdf", "application/pdf", 2048),
        payload("scan.png", "image/png", 1024),
    ]);
    let rendered = ReceiptRenderer::new()
        .unwrap()
        .render(&application, ReceiptFormat::Text)
        .unwrap();

    assert!(rendered.starts_with("Application received 2024-05-01T09:30:00Z"));
    assert!(rendered.contains("Skill: Lead"));
    assert!(rendered.contains("Resume (2 files, 3.0 KiB):"));
    let first = rendered
        .find("1. cv.pdf [application/pdf] 2.0 KiB")
        .expect("first file listed");
    let second = rendered
        .find("2. scan.png [image/png] 1.0 KiB")
        .expect("second file listed");
    assert!(first < second);
}

#[test]
fn cto_serializes_in_upper_case() {
    let mut application = application(vec![payload("cv.pdf", "application/pdf", 10)]);
    application.skill = SkillLevel::Cto;
    let rendered = ReceiptRenderer::new()
        .unwrap()
        .render(&application, ReceiptFormat::Text)
        .unwrap();
    assert!(rendered.contains("Skill: CTO"));
}
