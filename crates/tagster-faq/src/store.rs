//! FAQ store — ordered question/answer pairs loaded from a JSON file.
//!
//! The source is a single JSON object mapping canonical questions to
//! canonical answers. Key order is preserved: it decides tie-breaks in the
//! matcher and the layout of the fallback context. The store is immutable
//! after load.

use sha2::{Digest, Sha256};
use std::path::Path;

use tagster_core::error::{Result, TagsterError};
use tagster_core::types::FaqEntry;

pub struct FaqStore;

impl FaqStore {
    /// Load all entries from the given JSON file.
    pub fn load(path: &Path) -> Result<Vec<FaqEntry>> {
        Self::load_with_digest(path).map(|(entries, _)| entries)
    }

    /// Load all entries plus a SHA-256 digest of the raw source bytes.
    ///
    /// The digest changes iff the file content changes, which is what gates
    /// embedding-cache invalidation in the matcher.
    pub fn load_with_digest(path: &Path) -> Result<(Vec<FaqEntry>, [u8; 32])> {
        let raw = std::fs::read(path).map_err(|e| {
            TagsterError::StoreUnavailable(format!("failed to read {}: {e}", path.display()))
        })?;
        let digest: [u8; 32] = Sha256::digest(&raw).into();

        let mapping: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&raw)
            .map_err(|e| {
                TagsterError::StoreUnavailable(format!(
                    "{} is not a JSON object of question/answer pairs: {e}",
                    path.display()
                ))
            })?;

        let mut entries = Vec::with_capacity(mapping.len());
        for (question, answer) in mapping {
            let answer = answer.as_str().ok_or_else(|| {
                TagsterError::StoreUnavailable(format!(
                    "answer for '{question}' is not a string"
                ))
            })?;
            entries.push(FaqEntry {
                question,
                answer: answer.to_string(),
            });
        }

        if entries.is_empty() {
            return Err(TagsterError::StoreUnavailable(
                "FAQ source contains no entries".into(),
            ));
        }

        tracing::debug!("loaded {} FAQ entries from {}", entries.len(), path.display());
        Ok((entries, digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn faq_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_preserves_file_order() {
        let file = faq_file(
            r#"{
                "What are your hours?": "9-5 Mon-Fri",
                "Do you ship abroad?": "Yes, worldwide",
                "Are returns free?": "Within 30 days"
            }"#,
        );
        let entries = FaqStore::load(file.path()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].question, "What are your hours?");
        assert_eq!(entries[0].answer, "9-5 Mon-Fri");
        assert_eq!(entries[1].question, "Do you ship abroad?");
        assert_eq!(entries[2].question, "Are returns free?");
    }

    #[test]
    fn test_missing_file() {
        let err = FaqStore::load(Path::new("/no/such/faq.json")).unwrap_err();
        assert!(matches!(err, TagsterError::StoreUnavailable(_)));
    }

    #[test]
    fn test_malformed_json() {
        let file = faq_file("not json at all");
        let err = FaqStore::load(file.path()).unwrap_err();
        assert!(matches!(err, TagsterError::StoreUnavailable(_)));
    }

    #[test]
    fn test_non_string_answer() {
        let file = faq_file(r#"{"How many?": 42}"#);
        let err = FaqStore::load(file.path()).unwrap_err();
        assert!(matches!(err, TagsterError::StoreUnavailable(_)));
    }

    #[test]
    fn test_empty_mapping() {
        let file = faq_file("{}");
        let err = FaqStore::load(file.path()).unwrap_err();
        assert!(matches!(err, TagsterError::StoreUnavailable(_)));
    }

    #[test]
    fn test_digest_tracks_content() {
        let file_a = faq_file(r#"{"Q1": "A1"}"#);
        let file_b = faq_file(r#"{"Q1": "A1 changed"}"#);

        let (_, digest_a) = FaqStore::load_with_digest(file_a.path()).unwrap();
        let (_, digest_a2) = FaqStore::load_with_digest(file_a.path()).unwrap();
        let (_, digest_b) = FaqStore::load_with_digest(file_b.path()).unwrap();

        assert_eq!(digest_a, digest_a2);
        assert_ne!(digest_a, digest_b);
    }
}
