//! Document identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when parsing a malformed document identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid document id: {input}")]
pub struct InvalidDocumentId {
    input: String,
}

/// Opaque identity of a stored station or route.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its hyphenated string form.
    pub fn parse(s: &str) -> Result<Self, InvalidDocumentId> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| InvalidDocumentId {
                input: s.to_string(),
            })
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        let id = DocumentId::new();
        let parsed = DocumentId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn reject_malformed() {
        assert!(DocumentId::parse("").is_err());
        assert!(DocumentId::parse("not-an-id").is_err());
        assert!(DocumentId::parse("65f1c0ffee").is_err());
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(DocumentId::new(), DocumentId::new());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = DocumentId::parse("0b6f7c1e-2f57-4c1a-9a43-5d3e2b1f0a99").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0b6f7c1e-2f57-4c1a-9a43-5d3e2b1f0a99\"");
    }
}
