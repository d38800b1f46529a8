//! Account profile model.

use serde::{Deserialize, Serialize};

/// An Imgur account profile, as returned by `/3/account/{username}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Numeric account id.
    pub id: i64,
    /// Account username. The wire field is named `url`.
    #[serde(rename = "url")]
    pub username: String,
    /// Self-description, if set.
    #[serde(default)]
    pub bio: Option<String>,
    /// Community reputation score.
    #[serde(default)]
    pub reputation: f64,
    /// Unix timestamp of account creation.
    #[serde(default)]
    pub created: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserializes_from_wire_shape() {
        let json = r#"{
            "id": 42,
            "url": "alice",
            "bio": null,
            "reputation": 1500.5,
            "created": 1632934409,
            "pro_expiration": false
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.id, 42);
        assert_eq!(account.username, "alice");
        assert_eq!(account.bio, None);
        assert_eq!(account.created, 1632934409);
    }
}
