//! Repository implementations for database access
//!
//! Each repository implements three capabilities:
//! - `Reader`: fetch by id
//! - `Lister`: paginated, sorted, filtered listing
//! - `Writer`: create, full replace, upsert, delete
//!
//! Every operation is one statement or one transaction.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use crate::models::{InvalidStatusCode, Page, PageRequest, ValidationError};

pub mod comments;
pub mod posts;
pub mod users;

pub use comments::{CommentRepo, PostComment};
pub use posts::{Post, PostRepo};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} references a resource that does not exist")]
    InvalidReference { resource: &'static str },

    #[error("{resource} '{id}' is still referenced by other resources")]
    InUse { resource: &'static str, id: String },

    #[error("duplicate {resource}: {detail}")]
    Duplicate { resource: &'static str, detail: String },

    #[error("stored data is invalid: {0}")]
    InvalidStatus(#[from] InvalidStatusCode),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Classify a failed insert/update.
    pub(crate) fn on_write(err: sqlx::Error, resource: &'static str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_foreign_key_violation() {
                return Self::InvalidReference { resource };
            }
            if db.is_unique_violation() {
                return Self::Duplicate {
                    resource,
                    detail: db.message().to_owned(),
                };
            }
        }
        Self::Sqlx(err)
    }

    /// Classify a failed delete.
    pub(crate) fn on_delete(err: sqlx::Error, resource: &'static str, id: i64) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_foreign_key_violation() {
                return Self::InUse {
                    resource,
                    id: id.to_string(),
                };
            }
        }
        Self::Sqlx(err)
    }
}

/// Fetch-by-id capability
#[async_trait]
pub trait Reader: Send + Sync {
    type Entity: Send;

    /// Resource name used in NotFound errors
    const RESOURCE: &'static str;

    /// Fetch a single record; `None` when no row matches.
    async fn find_by_id(&self, id: i64) -> Result<Option<Self::Entity>, DbError>;

    /// Fetch a single record; NotFound when no row matches.
    async fn get(&self, id: i64) -> Result<Self::Entity, DbError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(Self::RESOURCE, id))
    }
}

/// Paginated listing with dynamic filtering
#[async_trait]
pub trait Lister: Reader {
    type Filter: Send + Sync;

    async fn find_all(
        &self,
        filter: &Self::Filter,
        page: &PageRequest,
    ) -> Result<Page<Self::Entity>, DbError>;
}

/// Write capability with full-replace semantics
#[async_trait]
pub trait Writer: Reader {
    type Draft: Send + Sync;

    /// Insert with a generated id.
    async fn create(&self, draft: &Self::Draft) -> Result<Self::Entity, DbError>;

    /// Replace every replaceable field; NotFound when the id is absent.
    async fn replace(&self, id: i64, draft: &Self::Draft) -> Result<Self::Entity, DbError>;

    /// Upsert: insert when `id` is `None` or unknown (keeping the given id),
    /// otherwise full replace.
    async fn save(&self, id: Option<i64>, draft: &Self::Draft) -> Result<Self::Entity, DbError>;

    /// Delete by id; NotFound when the id is absent.
    async fn delete_by_id(&self, id: i64) -> Result<(), DbError>;
}

/// Appends `WHERE`/`AND` between dynamic filter conditions.
#[derive(Default)]
pub(crate) struct Conditions {
    started: bool,
}

impl Conditions {
    pub(crate) fn and<'q, 'args>(
        &mut self,
        qb: &'q mut QueryBuilder<'args, Sqlite>,
    ) -> &'q mut QueryBuilder<'args, Sqlite> {
        qb.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
        qb
    }
}

/// Append ORDER BY / LIMIT / OFFSET for a page request.
pub(crate) fn push_page(
    qb: &mut QueryBuilder<'_, Sqlite>,
    page: &PageRequest,
    sortable: crate::models::SortableColumns,
) {
    qb.push(" ORDER BY ")
        .push(page.order_by(sortable))
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_join_with_where_then_and() {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT * FROM users");
        let mut conditions = Conditions::default();
        conditions.and(&mut qb).push("age > ").push_bind(3_i32);
        conditions.and(&mut qb).push("email = ").push_bind("a@b.com".to_owned());

        assert_eq!(
            qb.sql(),
            "SELECT * FROM users WHERE age > ? AND email = ?"
        );
    }

    #[test]
    fn page_clause() {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT * FROM users");
        push_page(&mut qb, &PageRequest::new(2, 10), crate::models::USER_SORTABLE);
        assert_eq!(qb.sql(), "SELECT * FROM users ORDER BY id ASC LIMIT ? OFFSET ?");
    }
}
