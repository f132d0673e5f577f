//! Integration tests for log redaction and input fingerprints.

use sentinel_app::{input_fingerprint, redact_sensitive};

#[test]
fn log_redaction_tests_removes_obvious_secret_markers() {
    let raw = "upstream said: authorization=Bearer abc123";
    let redacted = redact_sensitive(raw);

    assert_eq!(redacted, "upstream said: authorization=<redacted>");
    assert!(!redacted.contains("abc123"));
}

#[test]
fn log_redaction_tests_strips_audio_payloads_and_keeps_clean_text() {
    let redacted = redact_sensitive(r#"bad request {"audioData":"UklGRg=="}"#);
    assert!(!redacted.contains("UklGRg"));

    assert_eq!(redact_sensitive("remote analysis timed out"), "remote analysis timed out");
}

#[test]
fn log_redaction_tests_fingerprint_is_stable_and_opaque() {
    let first = input_fingerprint("Zadajte heslo");
    assert_eq!(first, input_fingerprint("Zadajte heslo"));
    assert_ne!(first, input_fingerprint("Zadajte heslo!"));
    assert_eq!(first.len(), 16);
    assert!(!first.contains("heslo"));
}
