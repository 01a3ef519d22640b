//! The facade is enough to drive a page end to end.

use chrono::NaiveDate;
use hxsync::prelude::*;
use hxsync::{ModalEvent, Profile, SwapError};
use pretty_assertions::assert_eq;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn page() -> Vec<ElementSpec> {
    vec![
        ElementSpec::new("div")
            .id("modal-form")
            .class("modal")
            .child(ElementSpec::new("div").id("modal-form-dialog")),
        ElementSpec::new("input").id("id_phone").attr("data-cell-input", "true"),
    ]
}

#[test]
fn prelude_drives_a_modal_round_trip() -> Result<()> {
    let doc = Document::from_fragment(page());
    let mut prog = SyncProgram::new(doc, SyncConfig::default(), HeadlessProvider::new(), today())?;
    prog.push_event(HostEvent::Loaded);
    prog.push_event(HostEvent::Update {
        target: "modal-form-dialog".to_string(),
        status: ResponseStatus::OK,
        style: SwapStyle::InnerHtml,
        fragment: vec![ElementSpec::new("form")],
        trigger: None,
    });
    prog.push_event(HostEvent::Update {
        target: "modal-form-dialog".to_string(),
        status: ResponseStatus::NO_CONTENT,
        style: SwapStyle::InnerHtml,
        fragment: Vec::new(),
        trigger: Some("ObjectEdited".to_string()),
    });
    prog.step();
    let out = prog.take_outputs();
    assert_eq!(out.modal_events, vec![ModalEvent::Shown, ModalEvent::Hidden]);
    assert_eq!(out.notices[0].notice.profile, Profile::Success);
    Ok(())
}

#[test]
fn masked_input_arrives_as_json() -> Result<()> {
    let doc = Document::from_fragment(page());
    let mut prog = SyncProgram::new(doc, SyncConfig::default(), HeadlessProvider::new(), today())?;
    prog.push_json(r#"{"type": "loaded"}"#)?;
    prog.step();
    let phone = prog
        .document()
        .get_element_by_id("id_phone")
        .ok_or(SwapError::UnknownTarget("id_phone".to_string()))?;
    prog.push_json(&format!(r#"{{"type": "input", "node": {}, "value": "812"}}"#, phone.index()))?;
    prog.step();
    assert_eq!(prog.take_outputs().values, vec![(phone, "9".to_string())]);
    Ok(())
}

#[test]
fn logging_installs_once() {
    assert!(hxsync::init_logging("hxsync_runtime=debug,warn"));
    assert!(!hxsync::init_logging("info"));
}
