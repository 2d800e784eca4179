//! Stream identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::InvalidStreamId;

/// Opaque name of one aggregate instance's event stream.
///
/// The capability never interprets the contents; naming schemes belong to the
/// event store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    /// Wrap a stream name without validation.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Wrap a stream name, rejecting empty (or whitespace-only) names.
    pub fn parse(name: impl Into<String>) -> Result<Self, InvalidStreamId> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidStreamId("stream identifier must not be empty".to_string()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for StreamId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StreamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StreamId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&StreamId> for StreamId {
    fn from(value: &StreamId) -> Self {
        value.clone()
    }
}

impl From<String> for StreamId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<StreamId> for String {
    fn from(value: StreamId) -> Self {
        value.into_inner()
    }
}

impl FromStr for StreamId {
    type Err = InvalidStreamId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_blank_names() {
        assert!(StreamId::parse("").is_err());
        assert!("   ".parse::<StreamId>().is_err());
    }

    #[test]
    fn display_is_the_raw_name() {
        let id: StreamId = "orders-1".parse().unwrap();
        assert_eq!(id.to_string(), "orders-1");
        assert_eq!(id, StreamId::from("orders-1"));
    }

    #[test]
    fn unwraps_to_the_owned_name() {
        let id = StreamId::new("orders-3");
        assert_eq!(id.clone().into_inner(), "orders-3");
        assert_eq!(String::from(id), "orders-3");
    }

    #[test]
    fn serializes_transparently() {
        let id = StreamId::new("orders-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"orders-7\"");
        let back: StreamId = serde_json::from_str("\"orders-7\"").unwrap();
        assert_eq!(back, id);
    }
}
