//! User repository

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::{push_page, Conditions, DbError, Lister, Reader, Writer};
use crate::models::{Page, PageRequest, UserDraft, UserFilter, USER_SORTABLE};

const COLUMNS: &str = "id, first_name, last_name, email, age";

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored users.
    pub async fn count(&self) -> Result<i64, DbError> {
        count_users(self.pool).await
    }
}

/// Number of stored users, on any executor (pool, connection or transaction).
pub(crate) async fn count_users<'e, E>(executor: E) -> Result<i64, DbError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &UserFilter) {
    let mut conditions = Conditions::default();

    if let Some(email) = &filter.email {
        conditions.and(qb).push("email = ").push_bind(email.clone());
    }
    if let Some(last_name) = &filter.last_name {
        conditions.and(qb).push("last_name = ").push_bind(last_name.clone());
    }
    if let Some(min_age) = filter.min_age {
        conditions.and(qb).push("age >= ").push_bind(min_age);
    }
    if let Some(max_age) = filter.max_age {
        conditions.and(qb).push("age <= ").push_bind(max_age);
    }
}

#[async_trait]
impl Reader for UserRepo<'_> {
    type Entity = User;

    const RESOURCE: &'static str = "user";

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl Lister for UserRepo<'_> {
    type Filter = UserFilter;

    /// Count and page fetch share one transaction so totals match the page.
    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_all(&self, filter: &UserFilter, page: &PageRequest) -> Result<Page<User>, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filter(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&mut *tx).await?;

        let mut select = QueryBuilder::new(format!("SELECT {COLUMNS} FROM users"));
        push_filter(&mut select, filter);
        push_page(&mut select, page, USER_SORTABLE);
        let items = select.build_query_as::<User>().fetch_all(&mut *tx).await?;

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
impl Writer for UserRepo<'_> {
    type Draft = UserDraft;

    async fn create(&self, draft: &UserDraft) -> Result<User, DbError> {
        sqlx::query_as(&format!(
            "INSERT INTO users (first_name, last_name, email, age) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.email.as_str())
        .bind(draft.age)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))
    }

    async fn replace(&self, id: i64, draft: &UserDraft) -> Result<User, DbError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, age = ?
            WHERE id = ?
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.email.as_str())
        .bind(draft.age)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))?
        .ok_or_else(|| DbError::not_found(Self::RESOURCE, id))
    }

    async fn save(&self, id: Option<i64>, draft: &UserDraft) -> Result<User, DbError> {
        sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, age)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                age = excluded.age
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.email.as_str())
        .bind(draft.age)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_write(e, Self::RESOURCE))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
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
