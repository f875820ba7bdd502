use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for users table
///
/// Not `Serialize`: the password hash never leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub mobile_number: String,
    pub created_at: DateTime<Utc>,
}

/// A user row that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub mobile_number: String,
}

impl NewUser {
    /// Materializes the row with the id handed out by the store
    pub fn into_model(self, id: i64) -> UserModel {
        UserModel {
            id,
            username: self.username,
            password_hash: self.password_hash,
            mobile_number: self.mobile_number,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_model_keeps_fields() {
        let new_user = NewUser {
            username: "alice".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            mobile_number: "5551234".to_string(),
        };

        let before = Utc::now();
        let user = new_user.into_model(7);

        assert_eq!(user.id, 7);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "$2b$04$hash");
        assert_eq!(user.mobile_number, "5551234");
        assert!(user.created_at >= before);
    }
}
