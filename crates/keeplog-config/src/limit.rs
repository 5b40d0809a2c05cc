//! Conversions between the in-memory `Option<u32>` limit and its external forms:
//! the `-1` sentinel, form-field strings and the persisted string encoding.

use crate::constants::UNLIMITED;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serializer};

/// Parses a form field into a limit. Empty, malformed and negative input all
/// mean "no limit".
pub fn parse_limit(value: &str) -> Option<u32> {
    value.parse::<i32>().ok().and_then(|v| from_sentinel(v.into()))
}

/// Absent booleans are treated as unset.
pub fn parse_flag(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

pub fn from_sentinel(value: i64) -> Option<u32> {
    if value < 0 {
        return None;
    }
    u32::try_from(value).ok()
}

pub fn as_sentinel(limit: Option<u32>) -> i64 {
    limit.map_or(UNLIMITED, i64::from)
}

pub(crate) fn to_form_string(limit: Option<u32>) -> String {
    limit.map(|v| v.to_string()).unwrap_or_default()
}

/// Every shape a stored limit has been written in.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLimit {
    Int(i64),
    Text(String),
    Other(IgnoredAny),
}

impl StoredLimit {
    fn into_limit(self) -> Option<u32> {
        match self {
            StoredLimit::Int(v) => from_sentinel(v),
            StoredLimit::Text(s) => parse_limit(&s),
            StoredLimit::Other(_) => None,
        }
    }
}

/// Limits that have existed since the first schema: always written, `"-1"` when unlimited.
pub(crate) mod mandatory {
    use super::*;

    pub fn serialize<S: Serializer>(limit: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&as_sentinel(*limit).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(StoredLimit::deserialize(deserializer)?.into_limit())
    }
}

/// Limits added later: omitted when unlimited so older readers see the same record.
pub(crate) mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(limit: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match limit {
            Some(v) => serializer.serialize_some(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(Option::<StoredLimit>::deserialize(deserializer)?.and_then(StoredLimit::into_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("5"), Some(5));
        assert_eq!(parse_limit("0"), Some(0));
        assert_eq!(parse_limit(""), None);
        assert_eq!(parse_limit("-1"), None);
        assert_eq!(parse_limit("ten"), None);
        assert_eq!(parse_limit(" 5"), None);
        assert_eq!(parse_limit("99999999999"), None);
    }

    #[test]
    fn test_sentinel_conversions() {
        assert_eq!(from_sentinel(-1), None);
        assert_eq!(from_sentinel(-7), None);
        assert_eq!(from_sentinel(3), Some(3));
        assert_eq!(as_sentinel(None), -1);
        assert_eq!(as_sentinel(Some(12)), 12);
        assert_eq!(to_form_string(None), "");
        assert_eq!(to_form_string(Some(4)), "4");
    }

    #[test]
    fn test_parse_flag() {
        assert!(!parse_flag(None));
        assert!(!parse_flag(Some(false)));
        assert!(parse_flag(Some(true)));
    }
}
