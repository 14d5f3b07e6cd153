use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::Email;
use crate::users::model::User;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String, // salt:hash, hex
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub timezone: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User::load(
            r.id.into(),
            Email::from_trusted(r.email),
            r.username,
            r.password_hash,
            r.first_name,
            r.last_name,
            r.timezone,
            r.created_at,
            r.updated_at,
        )
    }
}
