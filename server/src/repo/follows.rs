use std::collections::HashSet;

use crate::models::User;
use crate::schema::{follows, users};
use diesel::prelude::*;
use larder_core::PageRequest;
use uuid::Uuid;

/// Insert the edge. Returns `false` when it already existed.
pub fn follow(conn: &mut PgConnection, follower_id: Uuid, followee_id: Uuid) -> QueryResult<bool> {
    let inserted = diesel::insert_into(follows::table)
        .values((
            follows::follower_id.eq(follower_id),
            follows::followee_id.eq(followee_id),
        ))
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(inserted > 0)
}

/// Remove the edge. Returns `false` when there was none.
pub fn unfollow(
    conn: &mut PgConnection,
    follower_id: Uuid,
    followee_id: Uuid,
) -> QueryResult<bool> {
    let deleted = diesel::delete(
        follows::table
            .filter(follows::follower_id.eq(follower_id))
            .filter(follows::followee_id.eq(followee_id)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}

/// Which of `candidates` the follower is subscribed to.
pub fn followed_among(
    conn: &mut PgConnection,
    follower_id: Uuid,
    candidates: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    let found: Vec<Uuid> = follows::table
        .filter(follows::follower_id.eq(follower_id))
        .filter(follows::followee_id.eq_any(candidates))
        .select(follows::followee_id)
        .load(conn)?;
    Ok(found.into_iter().collect())
}

/// One page of the users `follower_id` follows, most recent subscription
/// first, plus the total count.
pub fn list_followees(
    conn: &mut PgConnection,
    follower_id: Uuid,
    page: &PageRequest,
) -> QueryResult<(Vec<User>, i64)> {
    let total = follows::table
        .filter(follows::follower_id.eq(follower_id))
        .count()
        .get_result(conn)?;

    let rows = follows::table
        .inner_join(users::table.on(users::id.eq(follows::followee_id)))
        .filter(follows::follower_id.eq(follower_id))
        .order((follows::created_at.desc(), users::id.asc()))
        .limit(page.limit)
        .offset(page.offset())
        .select(User::as_select())
        .load(conn)?;

    Ok((rows, total))
}
