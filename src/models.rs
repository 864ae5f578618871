use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::MessageError;

/// Message body: a flat JSON object of string values.
pub type MessageFields = HashMap<String, String>;

pub fn decode_message(body: &[u8]) -> Result<MessageFields, MessageError> {
    Ok(serde_json::from_slice(body)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    pub id: String,
    pub title: String,
    pub text: String,
    /// Stored as received, not hashed.
    pub password: String,
    /// `None` means the paste never expires.
    pub expiration: Option<DateTime<Utc>>,
    pub creation: DateTime<Utc>,
}

impl Paste {
    /// Build a paste created at `now` from decoded message fields.
    ///
    /// `id` and `text` are required, `title` and `password` default to empty,
    /// and `expiration` must be an RFC 3339 timestamp when present. Unknown
    /// keys are ignored.
    pub fn from_fields(
        mut fields: MessageFields,
        now: DateTime<Utc>,
    ) -> Result<Self, MessageError> {
        let id = fields
            .remove("id")
            .filter(|id| !id.is_empty())
            .ok_or(MessageError::MissingField("id"))?;
        let text = fields
            .remove("text")
            .ok_or(MessageError::MissingField("text"))?;

        let expiration = fields
            .remove("expiration")
            .map(|exp| DateTime::parse_from_rfc3339(&exp))
            .transpose()?
            .map(|exp| exp.with_timezone(&Utc));

        Ok(Paste {
            id,
            title: fields.remove("title").unwrap_or_default(),
            text,
            password: fields.remove("password").unwrap_or_default(),
            expiration,
            creation: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{SecondsFormat, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn parse(body: &[u8]) -> Result<Paste, MessageError> {
        Paste::from_fields(decode_message(body)?, now())
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let body = br#"{"id":"abc123","text":"hello world","title":"Test"}"#;
        let paste = parse(body).unwrap();

        assert_eq!(
            paste,
            Paste {
                id: "abc123".into(),
                title: "Test".into(),
                text: "hello world".into(),
                password: String::new(),
                expiration: None,
                creation: now(),
            }
        );
    }

    #[test]
    fn password_is_kept_verbatim() {
        let body = br#"{"id":"p","text":"t","password":"hunter2"}"#;
        let paste = parse(body).unwrap();
        assert_eq!(paste.password, "hunter2");
        assert_eq!(paste.title, "");
    }

    #[test]
    fn expiration_round_trips() {
        let body = br#"{"id":"xyz","text":"secret","expiration":"2030-01-01T00:00:00Z"}"#;
        let paste = parse(body).unwrap();

        let expiration = paste.expiration.unwrap();
        assert_eq!(expiration, Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(
            expiration.to_rfc3339_opts(SecondsFormat::Secs, true),
            "2030-01-01T00:00:00Z"
        );
    }

    #[test]
    fn expiration_offset_is_normalized_to_same_instant() {
        let body = br#"{"id":"o","text":"t","expiration":"2030-01-01T02:30:00+02:30"}"#;
        let paste = parse(body).unwrap();
        assert_eq!(
            paste.expiration,
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn bad_expiration_is_rejected() {
        let body = br#"{"id":"bad","text":"x","expiration":"not-a-date"}"#;
        assert!(matches!(
            parse(body),
            Err(MessageError::Expiration { .. })
        ));
    }

    #[test]
    fn date_without_offset_is_rejected() {
        let body = br#"{"id":"bad","text":"x","expiration":"2030-01-01T00:00:00"}"#;
        assert!(parse(body).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse(b"{not json"),
            Err(MessageError::Decode { .. })
        ));
        // values must all be strings
        assert!(matches!(
            parse(br#"{"id":"a","text":"b","title":1}"#),
            Err(MessageError::Decode { .. })
        ));
    }

    #[test]
    fn id_and_text_are_required() {
        assert!(matches!(
            parse(br#"{"text":"b"}"#),
            Err(MessageError::MissingField("id"))
        ));
        assert!(matches!(
            parse(br#"{"id":"","text":"b"}"#),
            Err(MessageError::MissingField("id"))
        ));
        assert!(matches!(
            parse(br#"{"id":"a"}"#),
            Err(MessageError::MissingField("text"))
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let body = br#"{"id":"a","text":"b","language":"rust"}"#;
        assert!(parse(body).is_ok());
    }
}
