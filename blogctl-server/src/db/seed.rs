//! Demo data loaded at startup
//!
//! Two users, 56 posts alternating between them and 10 comments per post,
//! each comment written alternately by either user. The whole dataset goes
//! in one transaction; seeding is skipped entirely when any user already
//! exists.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::{SqliteConnection, SqlitePool};

use super::repos::users::count_users;
use super::repos::DbError;
use crate::models::{CommentDraft, CommentStatus, PostDraft, UserDraft};

pub const SEED_POSTS: usize = 56;
pub const COMMENTS_PER_POST: usize = 10;
const MAX_SEED_VOTES: i32 = 20;

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
}

/// Seed demo data with an entropy-seeded generator.
///
/// Returns `None` when the database already holds users.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<Option<SeedSummary>, DbError> {
    seed_with(pool, StdRng::from_entropy()).await
}

/// Seed demo data drawing votes and statuses from `rng`.
///
/// Nothing is kept when any insert fails.
pub async fn seed_with<R: Rng + Send>(
    pool: &SqlitePool,
    mut rng: R,
) -> Result<Option<SeedSummary>, DbError> {
    let mut tx = pool.begin().await?;

    if count_users(&mut *tx).await? > 0 {
        tracing::info!("Users already present, skipping demo seed");
        return Ok(None);
    }

    let john = insert_user(&mut tx, 1, &UserDraft::new("John", "Snow", "j_snow@email.com", 76)?).await?;
    let mario =
        insert_user(&mut tx, 2, &UserDraft::new("Mario", "Pizza", "m_pizza@email.com", 12)?).await?;
    let authors = [john, mario];

    let now = Utc::now();
    let mut summary = SeedSummary {
        users: authors.len(),
        posts: 0,
        comments: 0,
    };

    for i in 0..SEED_POSTS {
        let created_at = now + Duration::seconds(i as i64);
        let post_id = insert_post(
            &mut tx,
            &PostDraft::new(
                &format!("Post title {i}"),
                &format!("Post Content {i}"),
                created_at,
                authors[i % authors.len()],
            )?,
        )
        .await?;
        summary.posts += 1;

        for j in 0..COMMENTS_PER_POST {
            let code = rng.gen_range(0..CommentStatus::all().count() as i64);
            insert_comment(
                &mut tx,
                &CommentDraft {
                    review: format!("Review {j} of post {i}"),
                    votes: rng.gen_range(0..=MAX_SEED_VOTES),
                    status: CommentStatus::from_code(code)?,
                    created_at: created_at + Duration::seconds(j as i64),
                    post_id,
                    user_id: authors[j % authors.len()],
                },
            )
            .await?;
            summary.comments += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(
        users = summary.users,
        posts = summary.posts,
        comments = summary.comments,
        "Seeded demo data"
    );
    Ok(Some(summary))
}

async fn insert_user(conn: &mut SqliteConnection, id: i64, draft: &UserDraft) -> Result<i64, DbError> {
    sqlx::query_scalar(
        "INSERT INTO users (id, first_name, last_name, email, age) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(id)
    .bind(&draft.first_name)
    .bind(&draft.last_name)
    .bind(draft.email.as_str())
    .bind(draft.age)
    .fetch_one(conn)
    .await
    .map_err(|e| DbError::on_write(e, "user"))
}

async fn insert_post(conn: &mut SqliteConnection, draft: &PostDraft) -> Result<i64, DbError> {
    sqlx::query_scalar(
        "INSERT INTO posts (title, content, created_at, user_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&draft.title)
    .bind(&draft.content)
    .bind(draft.created_at)
    .bind(draft.user_id)
    .fetch_one(conn)
    .await
    .map_err(|e| DbError::on_write(e, "post"))
}

async fn insert_comment(conn: &mut SqliteConnection, draft: &CommentDraft) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO post_comments (review, votes, status, created_at, post_id, user_id)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&draft.review)
    .bind(draft.votes)
    .bind(draft.status.code())
    .bind(draft.created_at)
    .bind(draft.post_id)
    .bind(draft.user_id)
    .execute(conn)
    .await
    .map_err(|e| DbError::on_write(e, "postComment"))?;
    Ok(())
}
