//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Checks that a key is usable.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for the batch lookup (POST /mget)
#[derive(Debug, Clone, Deserialize)]
pub struct MGetRequest {
    /// Keys to look up; duplicates are allowed
    #[serde(default)]
    pub keys: Vec<String>,
}

impl MGetRequest {
    /// Validates every key, reporting the first offender.
    pub fn validate(&self) -> Option<String> {
        self.keys
            .iter()
            .find_map(|key| validate_key(key).map(|msg| format!("{msg}: '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mget_request_deserialize() {
        let json = r#"{"keys": ["a", "b", "a"]}"#;
        let req: MGetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.keys, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_mget_request_missing_keys_is_empty() {
        let req: MGetRequest = serde_json::from_str("{}").unwrap();
        assert!(req.keys.is_empty());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("").is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH + 1)).is_some());
        assert!(validate_key(&"x".repeat(MAX_KEY_LENGTH)).is_none());
        assert!(validate_key("valid_key").is_none());
    }

    #[test]
    fn test_mget_validate_reports_bad_key() {
        let req = MGetRequest {
            keys: vec!["ok".to_string(), String::new()],
        };
        assert!(req.validate().unwrap().contains("empty"));
    }
}
