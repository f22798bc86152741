//! Post repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::{push_page, Conditions, DbError, Lister, Reader, Writer};
use crate::models::{Page, PageRequest, PostDraft, PostFilter, POST_SORTABLE};

const COLUMNS: &str = "id, title, content, created_at, user_id";

/// Post record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PostFilter) {
    let mut conditions = Conditions::default();

    if let Some(user_id) = filter.user_id {
        conditions.and(qb).push("user_id = ").push_bind(user_id);
    }
    if let Some(title) = &filter.title {
        conditions
            .and(qb)
            .push("instr(lower(title), lower(")
            .push_bind(title.clone())
            .push(")) > 0");
    }
}

#[async_trait]
impl Reader for PostRepo<'_> {
    type Entity = Post;

    const RESOURCE: &'static str = "post";

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DbError> {
        let post = sqlx::query_as(&format!("SELECT {COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(post)
    }
}

#[async_trait]
impl Lister for PostRepo<'_> {
    type Filter = PostFilter;

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_all(&self, filter: &PostFilter, page: &PageRequest) -> Result<Page<Post>, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM posts");
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut select = QueryBuilder::new(format!("SELECT {COLUMNS} FROM posts"));
        push_filter(&mut select, filter);
        push_page(&mut select, page, POST_SORTABLE);
        let items = select.build_query_as::<Post>().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }
}

#[async_trait]
impl Writer for PostRepo<'_> {
    type Draft = PostDraft;

    async fn create(&self, draft: &PostDraft) -> Result<Post, DbError> {
        sqlx::query_as(&format!(
            "INSERT INTO posts (title, content, created_at, user_id) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.created_at)
        .bind(draft.user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))
    }

    async fn replace(&self, id: i64, draft: &PostDraft) -> Result<Post, DbError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE posts
            SET title = ?, content = ?, created_at = ?, user_id = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.created_at)
        .bind(draft.user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))?
        .ok_or_else(|| DbError::not_found(Self::RESOURCE, id))
    }

    async fn save(&self, id: Option<i64>, draft: &PostDraft) -> Result<Post, DbError> {
        sqlx::query_as(&format!(
            r#"
            INSERT INTO posts (id, title, content, created_at, user_id)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                created_at = excluded.created_at,
                user_id = excluded.user_id
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.content)
        .bind(draft.created_at)
        .bind(draft.user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
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
