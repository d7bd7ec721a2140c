use crate::email_matches;
use crate::models::{NewUser, User};
use crate::schema::users;
use chrono::Utc;
use diesel::prelude::*;
use larder_core::PageRequest;
use uuid::Uuid;

pub const EMAIL_CONSTRAINT: &str = "unique_user_email";
pub const USERNAME_CONSTRAINT: &str = "unique_user_username";

pub fn insert_user(conn: &mut PgConnection, new_user: &NewUser<'_>) -> QueryResult<User> {
    diesel::insert_into(users::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
}

pub fn find_user(conn: &mut PgConnection, id: Uuid) -> QueryResult<User> {
    users::table.find(id).select(User::as_select()).first(conn)
}

pub fn find_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(email_matches!(email))
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub fn email_taken(conn: &mut PgConnection, email: &str) -> QueryResult<bool> {
    find_by_email(conn, email).map(|user| user.is_some())
}

pub fn username_taken(conn: &mut PgConnection, username: &str) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        users::table.filter(users::username.eq(username)),
    ))
    .get_result(conn)
}

/// One page of users in sign-up order, plus the total count.
pub fn list_users(conn: &mut PgConnection, page: &PageRequest) -> QueryResult<(Vec<User>, i64)> {
    let total = users::table.count().get_result(conn)?;
    let rows = users::table
        .order((users::created_at.asc(), users::id.asc()))
        .limit(page.limit)
        .offset(page.offset())
        .select(User::as_select())
        .load(conn)?;
    Ok((rows, total))
}

/// Point the user at a new avatar image and return the one it replaced.
pub fn set_avatar(
    conn: &mut PgConnection,
    user_id: Uuid,
    avatar_id: Option<Uuid>,
) -> QueryResult<Option<Uuid>> {
    let previous: Option<Uuid> = users::table
        .find(user_id)
        .select(users::avatar_id)
        .for_update()
        .first(conn)?;

    diesel::update(users::table.find(user_id))
        .set((
            users::avatar_id.eq(avatar_id),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?;

    Ok(previous)
}

pub fn set_password_hash(
    conn: &mut PgConnection,
    user_id: Uuid,
    password_hash: &str,
) -> QueryResult<usize> {
    diesel::update(users::table.find(user_id))
        .set((
            users::password_hash.eq(password_hash),
            users::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
}
