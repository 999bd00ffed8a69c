//! Record identifiers.
//!
//! Ids are v4 UUIDs stored in their lowercase hyphenated form. Anything that
//! does not parse as a UUID is treated as "no such record" by the stores, so
//! a malformed id never reaches a query.

use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the canonical stored form of `raw`, or `None` if it is not a UUID.
pub fn normalize(raw: &str) -> Option<String> {
    Uuid::parse_str(raw.trim())
        .ok()
        .map(|id| id.hyphenated().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_ids() {
        assert_eq!(normalize("not-a-valid-id"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("507f1f77bcf86cd799439011"), None);
    }

    #[test]
    fn canonicalizes_accepted_forms() {
        let id = new_id();
        assert_eq!(normalize(&id).as_deref(), Some(id.as_str()));
        assert_eq!(normalize(&id.to_uppercase()).as_deref(), Some(id.as_str()));
        assert_eq!(normalize(&id.replace('-', "")).as_deref(), Some(id.as_str()));
    }
}
