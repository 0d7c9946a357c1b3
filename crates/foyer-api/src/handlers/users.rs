//! Roster contracts.  The directory itself is curated externally; the board
//! only ever reads it.

use serde::Serialize;

use foyer_store::{Database, User};

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub display_name: String,
    pub color: String,
    pub initial: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            display_name: user.display_name,
            color: user.color,
            initial: user.initial,
        }
    }
}

pub fn list_users(db: &Database) -> Result<Vec<UserDto>, ApiError> {
    let users = db.list_users()?;
    Ok(users.into_iter().map(UserDto::from).collect())
}
