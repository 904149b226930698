// harsan-core/tests/roundtrip_tests.rs
//! Round-trip fidelity checks against a realistic browser export.

use anyhow::Result;
use serde_json::{json, Value};
use test_log::test;

use harsan_core::{
    compare, decode_entry, decode_har, encode_entry, encode_har, parse_value, verify_round_trip,
    HarError, MismatchKind,
};

const FIXTURE: &[u8] = include_bytes!("fixtures/session.har");

#[test]
fn fixture_round_trip_loses_nothing() -> Result<()> {
    let mismatches = verify_round_trip(FIXTURE)?;
    assert!(mismatches.is_empty(), "unexpected mismatches: {:#?}", mismatches);
    Ok(())
}

#[test]
fn round_trip_reports_no_missing_keys_or_changed_values() -> Result<()> {
    let original = parse_value(FIXTURE)?;
    let encoded = encode_har(&decode_har(FIXTURE)?)?;
    let reparsed = parse_value(&encoded)?;

    for mismatch in compare(&original, &reparsed, "") {
        assert!(
            !matches!(
                mismatch.kind,
                MismatchKind::MissingInRight | MismatchKind::ValueMismatch { .. }
            ),
            "round trip changed content: {}",
            mismatch
        );
    }
    Ok(())
}

#[test]
fn entry_order_is_preserved() -> Result<()> {
    let har = decode_har(FIXTURE)?;
    let urls: Vec<_> = har.entries().map(|e| e.request.url.as_str()).collect();
    assert_eq!(
        urls,
        [
            "https://app.example.com/dashboard",
            "https://app.example.com/api/events"
        ]
    );
    Ok(())
}

#[test]
fn vendor_fields_land_in_the_unknown_bag() -> Result<()> {
    let har = decode_har(FIXTURE)?;
    let first = &har.log.entries[0];
    assert_eq!(first.unknown_fields.len(), 2);
    assert_eq!(first.unknown_fields["_myVendorField"], json!({ "x": 1 }));
    assert_eq!(first.unknown_fields["_fromCache"], json!("disk"));
    assert_eq!(first.priority, "VeryHigh");
    assert_eq!(first.initiator.as_ref().map(|i| i["type"].clone()), Some(json!("other")));

    let second = &har.log.entries[1];
    assert_eq!(second.unknown_fields["_webSocketMessages"], json!([]));
    Ok(())
}

#[test]
fn unknown_entry_key_survives_single_entry_round_trip() -> Result<()> {
    let input = json!({
        "startedDateTime": "2024-03-01T10:00:00Z",
        "time": 5,
        "_myVendorField": { "x": 1 }
    });
    let entry = decode_entry(&serde_json::to_vec(&input)?)?;
    let output: Value = serde_json::from_slice(&encode_entry(&entry)?)?;

    assert_eq!(output["_myVendorField"], json!({ "x": 1 }));
    assert!(compare(&input, &output, "").is_empty());
    Ok(())
}

#[test]
fn log_level_extra_fields_are_kept() -> Result<()> {
    let har = decode_har(FIXTURE)?;
    assert_eq!(
        har.log.extra.get("comment"),
        Some(&json!("exported for support ticket"))
    );
    let out = parse_value(&encode_har(&har)?)?;
    assert_eq!(out["log"]["comment"], json!("exported for support ticket"));
    Ok(())
}

#[test]
fn malformed_document_fails_to_decode() {
    let err = decode_har(b"{\"log\": [").unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn mis_shaped_entry_field_fails_the_document() {
    let input = br#"{"log": {"version": "1.2", "creator": {"name": "x", "version": "1"},
        "entries": [{"response": {"status": "two hundred"}}]}}"#;
    match decode_har(input).unwrap_err() {
        HarError::FieldDecode { field, .. } => assert_eq!(field, "response"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn null_and_empty_source_values_are_written_back() -> Result<()> {
    let out = parse_value(&encode_har(&decode_har(FIXTURE)?)?)?;
    let second = &out["log"]["entries"][1];
    assert_eq!(second["serverIPAddress"], json!(""));
    assert_eq!(second["pageref"], json!(""));
    assert_eq!(second["_initiator"], Value::Null);
    assert_eq!(second["connection"], Value::Null);
    assert_eq!(second["timings"]["ssl"], json!(0));
    assert_eq!(second["request"]["cookies"][1]["expires"], Value::Null);
    assert_eq!(second["response"]["_transferSize"], Value::Null);
    assert_eq!(second["response"]["content"]["text"], json!(""));
    assert_eq!(second["cache"], json!({}));
    Ok(())
}

#[test]
fn null_scalar_fields_decode_to_zero() -> Result<()> {
    let input = br#"{"log": {"version": null, "entries": [
        {"response": {"status": null, "_transferSize": null}, "timings": {"wait": null}}]}}"#;
    let har = decode_har(input)?;
    assert_eq!(har.log.version, "");
    assert_eq!(har.log.entries[0].response.status, 0);
    assert_eq!(har.log.entries[0].response.transfer_size, 0);
    assert!(verify_round_trip(input)?.is_empty());
    Ok(())
}

#[test]
fn encoded_output_is_pretty_printed() -> Result<()> {
    let encoded = String::from_utf8(encode_har(&decode_har(FIXTURE)?)?)?;
    assert!(encoded.starts_with("{\n  \"log\": {"));
    assert!(encoded.ends_with("}\n"));
    Ok(())
}
