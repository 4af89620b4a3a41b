//! Pre-transmission payload validation.
//!
//! [`check_valid`] is pure and performs no I/O. Callers must not hand a
//! payload to a transmitter when it returns `false`; how the rejection is
//! surfaced is the caller's concern.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::payload::Payload;

// Allowed characters in additional field names per the GELF spec: word
// characters, dots and dashes.
static ADDITIONAL_FIELD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]*$").expect("additional field name pattern"));

/// Check that a payload satisfies the GELF protocol invariants.
///
/// Returns `true` iff `host` and `version` are non-empty, the short message
/// (or its pre-encoded buffer) is non-empty, and every additional field key
/// matches `^[\w.-]*$`.
pub fn check_valid(payload: &Payload) -> bool {
    !payload.host().is_empty()
        && !payload.version().is_empty()
        && has_short_message(payload)
        && valid_field_names(payload)
}

fn has_short_message(payload: &Payload) -> bool {
    !payload.short_message().is_empty() || !payload.short_message_buffer().is_empty()
}

fn valid_field_names(payload: &Payload) -> bool {
    payload
        .additional_fields()
        .keys()
        .all(|name| ADDITIONAL_FIELD_NAME.is_match(name))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::check_valid;
    use crate::payload::Payload;

    fn minimal() -> Payload {
        let mut payload = Payload::new();
        payload.set_version("1.1");
        payload.set_host("localhost");
        payload.set_short_message("hello");
        payload
    }

    #[test]
    fn accepts_minimal_payload() {
        assert!(check_valid(&minimal()));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(!check_valid(&Payload::new()));
    }

    #[test]
    fn rejects_missing_host() {
        let mut payload = minimal();
        payload.set_host("");
        assert!(!check_valid(&payload));
    }

    #[test]
    fn rejects_missing_version() {
        let mut payload = minimal();
        payload.set_version("");
        assert!(!check_valid(&payload));
    }

    #[test]
    fn rejects_missing_short_message() {
        let mut payload = minimal();
        payload.set_short_message("");
        assert!(!check_valid(&payload));
    }

    #[test]
    fn buffered_short_message_satisfies_requirement() {
        let mut payload = minimal();
        payload.set_short_message("");
        payload.set_short_message_buffer(b"buffered message");
        assert!(check_valid(&payload));
    }

    #[rstest]
    #[case("thread")]
    #[case("user_id")]
    #[case("some.env.var")]
    #[case("request-id")]
    #[case("")]
    fn accepts_allowed_field_names(#[case] name: &str) {
        let mut payload = minimal();
        payload.add_additional_field(name, "value");
        assert!(check_valid(&payload));
    }

    #[rstest]
    #[case("~bad")]
    #[case("has space")]
    #[case("quo\"te")]
    #[case("sla/sh")]
    fn rejects_illegal_field_names(#[case] name: &str) {
        let mut payload = minimal();
        payload.add_additional_field(name, "value");
        assert!(!check_valid(&payload));
    }

    #[test]
    fn one_bad_key_rejects_otherwise_valid_payload() {
        let mut payload = minimal();
        payload.add_additional_field("fine", "value");
        payload.add_additional_field("~bad", "value");
        assert!(!check_valid(&payload));
    }
}
