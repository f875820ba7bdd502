use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::UserModel;

/// Public projection of a user for the diagnostic listing
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub mobile_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for UserSummary {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            mobile_number: user.mobile_number,
            created_at: user.created_at,
        }
    }
}
