use serde::{Deserialize, Deserializer, Serialize};

/// Authenticated account, as returned under `user` by `POST /login`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub content: String,

    /// Service timestamps (ISO 8601). Absent for notes added in this session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
}

impl Note {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            created_on: None,
            last_update: None,
        }
    }
}

/// The service issues UUID strings, but older deployments used integer ids.
/// Both are normalized to a string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Str(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_accepts_numeric_id() {
        let note: Note = serde_json::from_str(r#"{"id": 1, "title": "A", "content": "x"}"#)
            .expect("note should parse");
        assert_eq!(note, Note::new("1", "A", "x"));
    }

    #[test]
    fn test_note_contract_with_service_fields() {
        // Shape served by `GET /notes`; `user_id` is ignored.
        let json = r#"{
            "id": "5f0c2c1e-8a55-4c1e-9d2e-0d4b7c1f1a10",
            "user_id": "u-1",
            "title": "Groceries",
            "content": "milk",
            "created_on": "2024-01-01T10:00:00",
            "last_update": "2024-01-02T11:30:00"
        }"#;
        let note: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(note.id, "5f0c2c1e-8a55-4c1e-9d2e-0d4b7c1f1a10");
        assert_eq!(note.last_update.as_deref(), Some("2024-01-02T11:30:00"));
    }

    #[test]
    fn test_local_note_serializes_without_timestamps() {
        let v = serde_json::to_value(Note::new("2", "B", "y")).expect("should serialize");
        assert!(v.get("created_on").is_none());
        assert!(v.get("last_update").is_none());
    }

    #[test]
    fn test_user_rejects_missing_username() {
        let parsed = serde_json::from_str::<User>(r#"{"id": "1", "email": "a@b.c"}"#);
        assert!(parsed.is_err());
    }
}
