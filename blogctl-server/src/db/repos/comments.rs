//! Post comment repository
//!
//! Status is stored as its integer code and decoded on every read; a row
//! holding an unknown code surfaces as `DbError::InvalidStatus`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::{push_page, Conditions, DbError, Lister, Reader, Writer};
use crate::models::{
    CommentDraft, CommentFilter, CommentStatus, InvalidStatusCode, Page, PageRequest,
    COMMENT_SORTABLE,
};

const COLUMNS: &str = "id, review, votes, status, created_at, post_id, user_id";

/// Post comment with decoded status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostComment {
    pub id: i64,
    pub review: String,
    pub votes: i32,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
    pub post_id: i64,
    pub user_id: i64,
}

/// Raw row; `status` is still an integer code
#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    review: String,
    votes: i32,
    status: i64,
    created_at: DateTime<Utc>,
    post_id: i64,
    user_id: i64,
}

impl TryFrom<CommentRow> for PostComment {
    type Error = InvalidStatusCode;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            review: row.review,
            votes: row.votes,
            status: CommentStatus::from_code(row.status)?,
            created_at: row.created_at,
            post_id: row.post_id,
            user_id: row.user_id,
        })
    }
}

/// Post comment repository
pub struct CommentRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

/// Filter values already validated; `status` is the decoded filter status.
fn push_filter(
    qb: &mut QueryBuilder<'_, Sqlite>,
    filter: &CommentFilter,
    status: Option<CommentStatus>,
) {
    let mut conditions = Conditions::default();

    if let Some(post_id) = filter.post_id {
        conditions.and(qb).push("post_id = ").push_bind(post_id);
    }
    if let Some(user_id) = filter.user_id {
        conditions.and(qb).push("user_id = ").push_bind(user_id);
    }
    if let Some(status) = status {
        conditions.and(qb).push("status = ").push_bind(status.code());
    }
    if let Some(min_votes) = filter.min_votes {
        conditions.and(qb).push("votes >= ").push_bind(min_votes);
    }
}

fn decode(row: Option<CommentRow>) -> Result<Option<PostComment>, DbError> {
    Ok(row.map(PostComment::try_from).transpose()?)
}

#[async_trait]
impl Reader for CommentRepo<'_> {
    type Entity = PostComment;

    const RESOURCE: &'static str = "postComment";

    async fn find_by_id(&self, id: i64) -> Result<Option<PostComment>, DbError> {
        let row = sqlx::query_as(&format!("SELECT {COLUMNS} FROM post_comments WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        decode(row)
    }
}

#[async_trait]
impl Lister for CommentRepo<'_> {
    type Filter = CommentFilter;

    /// An undecodable status filter is a `DbError::Validation`.
    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_all(
        &self,
        filter: &CommentFilter,
        page: &PageRequest,
    ) -> Result<Page<PostComment>, DbError> {
        let status = filter.status()?;

        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM post_comments");
        push_filter(&mut count, filter, status);
        let total = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut select = QueryBuilder::new(format!("SELECT {COLUMNS} FROM post_comments"));
        push_filter(&mut select, filter, status);
        push_page(&mut select, page, COMMENT_SORTABLE);
        let rows = select.build_query_as::<CommentRow>().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        let items = rows
            .into_iter()
            .map(PostComment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }
}

#[async_trait]
impl Writer for CommentRepo<'_> {
    type Draft = CommentDraft;

    async fn create(&self, draft: &CommentDraft) -> Result<PostComment, DbError> {
        let row: CommentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO post_comments (review, votes, status, created_at, post_id, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&draft.review)
        .bind(draft.votes)
        .bind(draft.status.code())
        .bind(draft.created_at)
        .bind(draft.post_id)
        .bind(draft.user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))?;

        Ok(PostComment::try_from(row)?)
    }

    async fn replace(&self, id: i64, draft: &CommentDraft) -> Result<PostComment, DbError> {
        let row = sqlx::query_as(&format!(
            r#"
            UPDATE post_comments
            SET review = ?, votes = ?, status = ?, created_at = ?, post_id = ?, user_id = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&draft.review)
        .bind(draft.votes)
        .bind(draft.status.code())
        .bind(draft.created_at)
        .bind(draft.post_id)
        .bind(draft.user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))?;

        decode(row)?.ok_or_else(|| DbError::not_found(Self::RESOURCE, id))
    }

    async fn save(&self, id: Option<i64>, draft: &CommentDraft) -> Result<PostComment, DbError> {
        let row: CommentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO post_comments (id, review, votes, status, created_at, post_id, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                review = excluded.review,
                votes = excluded.votes,
                status = excluded.status,
                created_at = excluded.created_at,
                post_id = excluded.post_id,
                user_id = excluded.user_id
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.review)
        .bind(draft.votes)
        .bind(draft.status.code())
        .bind(draft.created_at)
        .bind(draft.post_id)
        .bind(draft.user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))?;

        Ok(PostComment::try_from(row)?)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| DbError::on_delete(e, Self::RESOURCE, id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Self::RESOURCE, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::{test_support, PostRepo, UserRepo};
    use crate::models::{PostDraft, Sort, UserDraft, ValidationError};

    struct Fixture {
        pool: SqlitePool,
        user_id: i64,
        post_id: i64,
    }

    async fn fixture() -> Fixture {
        let pool = test_support::pool().await;
        let user_id = UserRepo::new(&pool)
            .create(&UserDraft::new("Mario", "Pizza", "m_pizza@email.com", 12).unwrap())
            .await
            .unwrap()
            .id;
        let post_id = PostRepo::new(&pool)
            .create(&PostDraft::new("Post title 0", "Post Content 0", Utc::now(), user_id).unwrap())
            .await
            .unwrap()
            .id;
        Fixture {
            pool,
            user_id,
            post_id,
        }
    }

    fn draft(f: &Fixture, review: &str, votes: i32, status: CommentStatus) -> CommentDraft {
        CommentDraft {
            review: review.to_owned(),
            votes,
            status,
            created_at: Utc::now(),
            post_id: f.post_id,
            user_id: f.user_id,
        }
    }

    #[tokio::test]
    async fn create_decodes_status() {
        let f = fixture().await;
        let repo = CommentRepo::new(&f.pool);

        let created = repo
            .create(&draft(&f, "Review 0", 3, CommentStatus::Approved))
            .await
            .unwrap();

        assert_eq!(created.status, CommentStatus::Approved);
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn stored_unknown_code_fails_to_decode() {
        let f = fixture().await;
        let repo = CommentRepo::new(&f.pool);
        let created = repo
            .create(&draft(&f, "Review 0", 0, CommentStatus::Pending))
            .await
            .unwrap();

        sqlx::query("UPDATE post_comments SET status = 99 WHERE id = ?")
            .bind(created.id)
            .execute(&f.pool)
            .await
            .unwrap();

        let err = repo.find_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidStatus(InvalidStatusCode(99))));
    }

    #[tokio::test]
    async fn filters_by_status_and_votes() {
        let f = fixture().await;
        let repo = CommentRepo::new(&f.pool);
        for (votes, status) in [
            (1, CommentStatus::Pending),
            (5, CommentStatus::Spam),
            (9, CommentStatus::Spam),
            (12, CommentStatus::Approved),
        ] {
            repo.create(&draft(&f, "r", votes, status)).await.unwrap();
        }

        let spam = CommentFilter {
            status: Some("SPAM".into()),
            ..Default::default()
        };
        assert_eq!(repo.find_all(&spam, &PageRequest::default()).await.unwrap().total, 2);

        let popular = CommentFilter {
            min_votes: Some(9),
            ..Default::default()
        };
        let page = PageRequest::default().with_sort(Sort::parse("votes,desc").unwrap());
        let result = repo.find_all(&popular, &page).await.unwrap();
        let votes: Vec<_> = result.items.iter().map(|c| c.votes).collect();
        assert_eq!(votes, [12, 9]);
    }

    #[tokio::test]
    async fn undecodable_status_filter_is_rejected() {
        let f = fixture().await;
        let repo = CommentRepo::new(&f.pool);
        repo.create(&draft(&f, "r", 1, CommentStatus::Pending)).await.unwrap();

        let filter = CommentFilter {
            status: Some("99".into()),
            ..Default::default()
        };
        let err = repo.find_all(&filter, &PageRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidVariant { field: "status", .. })
        ));
    }

    #[tokio::test]
    async fn post_with_comments_cannot_be_deleted() {
        let f = fixture().await;
        CommentRepo::new(&f.pool)
            .create(&draft(&f, "r", 1, CommentStatus::Pending))
            .await
            .unwrap();

        let err = PostRepo::new(&f.pool).delete_by_id(f.post_id).await.unwrap_err();
        assert!(matches!(err, DbError::InUse { resource: "post", .. }));
    }

    #[tokio::test]
    async fn replace_and_delete() {
        let f = fixture().await;
        let repo = CommentRepo::new(&f.pool);
        let created = repo
            .create(&draft(&f, "before", 1, CommentStatus::Pending))
            .await
            .unwrap();

        let replaced = repo
            .replace(created.id, &draft(&f, "after", 2, CommentStatus::Rejected))
            .await
            .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.review, "after");
        assert_eq!(replaced.status, CommentStatus::Rejected);

        repo.delete_by_id(created.id).await.unwrap();
        assert_eq!(repo.find_by_id(created.id).await.unwrap(), None);
    }
}
