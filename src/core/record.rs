use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest TTL the API accepts, in seconds.
pub const MIN_TTL: u32 = 600;
pub const DEFAULT_TTL: u32 = MIN_TTL;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsRecordType {
    A,
    MX,
    CNAME,
    ALIAS,
    TXT,
    NS,
    AAAA,
    SRV,
    TLSA,
    CAA,
}

impl DnsRecordType {
    pub const ALL: [DnsRecordType; 10] = [
        DnsRecordType::A,
        DnsRecordType::MX,
        DnsRecordType::CNAME,
        DnsRecordType::ALIAS,
        DnsRecordType::TXT,
        DnsRecordType::NS,
        DnsRecordType::AAAA,
        DnsRecordType::SRV,
        DnsRecordType::TLSA,
        DnsRecordType::CAA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::MX => "MX",
            DnsRecordType::CNAME => "CNAME",
            DnsRecordType::ALIAS => "ALIAS",
            DnsRecordType::TXT => "TXT",
            DnsRecordType::NS => "NS",
            DnsRecordType::AAAA => "AAAA",
            DnsRecordType::SRV => "SRV",
            DnsRecordType::TLSA => "TLSA",
            DnsRecordType::CAA => "CAA",
        }
    }

    /// Whether the `prio` field means anything for this type.
    pub fn supports_priority(&self) -> bool {
        matches!(self, DnsRecordType::MX | DnsRecordType::SRV)
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown DNS record type: {0}")]
pub struct ParseRecordTypeError(String);

impl FromStr for DnsRecordType {
    type Err = ParseRecordTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DnsRecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseRecordTypeError(s.to_string()))
    }
}

/// A DNS record as the API sends and receives it.
///
/// Every field is a string and an empty string means "unset": empty fields
/// are left out of the JSON body, so the same shape works as create input,
/// partial edit input and retrieve output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub name: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub record_type: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub content: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub ttl: String,
    #[serde(
        rename = "prio",
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub priority: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "lenient_string"
    )]
    pub notes: String,
}

impl DnsRecord {
    pub fn new(record_type: DnsRecordType, content: impl Into<String>) -> Self {
        Self {
            record_type: record_type.to_string(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Subdomain label; empty targets the root of the domain.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl.max(MIN_TTL).to_string();
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority.to_string();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// `None` when the type is empty or not one the crate knows about.
    pub fn record_type(&self) -> Option<DnsRecordType> {
        self.record_type.parse().ok()
    }

    pub fn ttl_seconds(&self) -> Option<u32> {
        self.ttl.parse().ok()
    }

    /// Field-wise overwrite: every non-empty field of `update` replaces the
    /// matching field of `self`, empty fields keep the current value.
    ///
    /// A field can't be cleared through a merge.
    pub fn merge(&self, update: &DnsRecord) -> DnsRecord {
        fn pick(current: &str, incoming: &str) -> String {
            if incoming.is_empty() {
                current.to_string()
            } else {
                incoming.to_string()
            }
        }

        DnsRecord {
            id: pick(&self.id, &update.id),
            name: pick(&self.name, &update.name),
            record_type: pick(&self.record_type, &update.record_type),
            content: pick(&self.content, &update.content),
            ttl: pick(&self.ttl, &update.ttl),
            priority: pick(&self.priority, &update.priority),
            notes: pick(&self.notes, &update.notes),
        }
    }
}

/// Accepts a string, a number or `null`. The API is not consistent about
/// which one it sends for `id`, `ttl` and `prio`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or a number, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn full_record() -> DnsRecord {
        DnsRecord {
            id: "106926659".into(),
            name: "www".into(),
            record_type: "MX".into(),
            content: "mail.example.com".into(),
            ttl: "3600".into(),
            priority: "10".into(),
            notes: "primary mx".into(),
        }
    }

    #[test]
    fn test_merge_with_empty_update_is_identity() {
        let record = full_record();
        assert_eq!(record.merge(&DnsRecord::default()), record);
    }

    #[test]
    fn test_merge_with_full_update_replaces_everything() {
        let update = DnsRecord {
            id: "1".into(),
            name: "api".into(),
            record_type: "A".into(),
            content: "1.2.3.4".into(),
            ttl: "600".into(),
            priority: "0".into(),
            notes: "replaced".into(),
        };
        assert_eq!(full_record().merge(&update), update);
    }

    #[test]
    fn test_merge_single_field_only_changes_that_field() {
        let fields: [(&str, fn(&mut DnsRecord) -> &mut String); 7] = [
            ("id", |r| &mut r.id),
            ("name", |r| &mut r.name),
            ("type", |r| &mut r.record_type),
            ("content", |r| &mut r.content),
            ("ttl", |r| &mut r.ttl),
            ("prio", |r| &mut r.priority),
            ("notes", |r| &mut r.notes),
        ];

        let record = full_record();
        for (field, slot) in fields {
            let mut update = DnsRecord::default();
            *slot(&mut update) = "changed".to_string();

            let mut expected = record.clone();
            *slot(&mut expected) = "changed".to_string();

            assert_eq!(record.merge(&update), expected, "merging only {field}");
        }
    }

    #[test]
    fn test_merge_cannot_clear_a_field() {
        let record = full_record();
        let update = DnsRecord {
            notes: String::new(),
            ttl: "1200".into(),
            ..Default::default()
        };
        let merged = record.merge(&update);
        assert_eq!(merged.notes, "primary mx");
        assert_eq!(merged.ttl, "1200");
    }

    #[test]
    fn test_empty_fields_are_omitted_from_json() {
        let record = DnsRecord::new(DnsRecordType::A, "1.2.3.4");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "A", "content": "1.2.3.4" })
        );
    }

    #[test]
    fn test_decodes_numbers_and_nulls() {
        let record: DnsRecord = serde_json::from_str(
            r#"{"id":106926659,"name":"example.com","type":"A","content":"1.2.3.4","ttl":600,"prio":null,"notes":null}"#,
        )
        .unwrap();
        assert_eq!(record.id, "106926659");
        assert_eq!(record.ttl, "600");
        assert_eq!(record.ttl_seconds(), Some(600));
        assert!(record.priority.is_empty());
        assert!(record.notes.is_empty());
        assert_eq!(record.record_type(), Some(DnsRecordType::A));
    }

    #[test]
    fn test_rejects_non_scalar_field_values() {
        for body in [
            r#"{"content":{"a":1}}"#,
            r#"{"content":["1.2.3.4"]}"#,
            r#"{"ttl":true}"#,
        ] {
            let err = serde_json::from_str::<DnsRecord>(body).unwrap_err();
            assert!(
                err.to_string().contains("expected a string or a number"),
                "{body}: {err}"
            );
        }
    }

    #[test]
    fn test_decodes_missing_fields_as_empty() {
        let record: DnsRecord = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert_eq!(
            record,
            DnsRecord {
                content: "hello".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_builder_clamps_ttl() {
        let record = DnsRecord::new(DnsRecordType::TXT, "v=spf1 -all")
            .with_name("mail")
            .with_ttl(60)
            .with_notes("spf");
        assert_eq!(record.ttl, "600");
        assert_eq!(record.name, "mail");

        let record = record.with_ttl(86400);
        assert_eq!(record.ttl_seconds(), Some(86400));
    }

    #[test]
    fn test_record_type_parsing() {
        for t in DnsRecordType::ALL {
            assert_eq!(assert_ok!(t.as_str().parse::<DnsRecordType>()), t);
        }
        assert_err!("a".parse::<DnsRecordType>());
        assert_err!("HTTPS".parse::<DnsRecordType>());
        assert_eq!(DnsRecord::default().record_type(), None);
    }

    #[test]
    fn test_priority_support() {
        assert!(DnsRecordType::MX.supports_priority());
        assert!(DnsRecordType::SRV.supports_priority());
        assert!(!DnsRecordType::A.supports_priority());
        assert!(!DnsRecordType::CAA.supports_priority());
    }
}
