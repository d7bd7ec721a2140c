use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

pub fn create_session(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    lifetime_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(lifetime_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Returns whether a live session was removed.
pub fn revoke_session(conn: &mut PgConnection, token: &str) -> Result<bool, diesel::result::Error> {
    let deleted = diesel::delete(sessions::table.filter(sessions::token_hash.eq(hash_token(token))))
        .execute(conn)?;
    Ok(deleted > 0)
}

pub fn get_user_from_token(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<User>, diesel::result::Error> {
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(conn)
        .optional()
}
