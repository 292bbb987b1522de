use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// An account as stored in the database and resolved as the authenticated
/// principal for a request.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// Stable integer identity, assigned at creation.
    pub id: i32,
    /// Unique, case-sensitive, immutable once created.
    pub username: String,
    /// Opaque hasher output. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Defaults to true at creation; inactive accounts cannot resolve.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "testuser".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "testuser");
        assert_eq!(json["is_active"], true);
    }
}
