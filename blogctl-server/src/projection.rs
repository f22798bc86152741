//! Named projections: reduced views selected with `?projection=<name>`
//!
//! Unknown names select the full representation.

use serde::{Deserialize, Serialize};

use crate::db::repos::{PostComment, User};
use crate::models::CommentStatus;

/// `projection` query parameter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectionParams {
    pub projection: Option<String>,
}

/// `usersResume`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResume {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub age: i32,
}

impl From<&User> for UserResume {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: format!("{} {}", user.first_name, user.last_name),
            email: user.email.clone(),
            age: user.age,
        }
    }
}

/// `postCommentResume`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCommentResume {
    pub id: i64,
    pub review: String,
    pub votes: i32,
    pub status: CommentStatus,
}

impl From<&PostComment> for PostCommentResume {
    fn from(comment: &PostComment) -> Self {
        Self {
            id: comment.id,
            review: comment.review.clone(),
            votes: comment.votes,
            status: comment.status,
        }
    }
}

/// A user in the selected shape
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UserView {
    Full(User),
    Resume(UserResume),
}

/// A comment in the selected shape
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommentView {
    Full(PostComment),
    Resume(PostCommentResume),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserProjection {
    #[default]
    Full,
    Resume,
}

impl UserProjection {
    pub const RESUME: &'static str = "usersResume";

    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some(Self::RESUME) => Self::Resume,
            _ => Self::Full,
        }
    }

    pub fn apply(self, user: User) -> UserView {
        match self {
            Self::Full => UserView::Full(user),
            Self::Resume => UserView::Resume(UserResume::from(&user)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentProjection {
    #[default]
    Full,
    Resume,
}

impl CommentProjection {
    pub const RESUME: &'static str = "postCommentResume";

    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some(Self::RESUME) => Self::Resume,
            _ => Self::Full,
        }
    }

    pub fn apply(self, comment: PostComment) -> CommentView {
        match self {
            Self::Full => CommentView::Full(comment),
            Self::Resume => CommentView::Resume(PostCommentResume::from(&comment)),
        }
    }
}
