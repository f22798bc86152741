//! Route handlers organized by resource

pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

use crate::db::repos::{Post, PostComment, User};
use crate::http::hal::{Collection, Resource};
use crate::http::server::AppState;
use crate::models::{Page, PageRequest};
use crate::projection::{CommentProjection, CommentView, UserProjection, UserView};

pub(crate) fn user_resource(
    state: &AppState,
    user: User,
    projection: UserProjection,
) -> Resource<UserView> {
    Resource {
        links: state.links.user(user.id),
        body: projection.apply(user),
    }
}

pub(crate) fn post_resource(state: &AppState, post: Post) -> Resource<Post> {
    Resource {
        links: state.links.post(post.id),
        body: post,
    }
}

pub(crate) fn comment_resource(
    state: &AppState,
    comment: PostComment,
    projection: CommentProjection,
) -> Resource<CommentView> {
    Resource {
        links: state.links.comment(comment.id),
        body: projection.apply(comment),
    }
}

pub(crate) fn user_collection(
    state: &AppState,
    path: &str,
    page: Page<User>,
    request: &PageRequest,
    projection: UserProjection,
) -> Collection<UserView> {
    let page = page.map(|user| user_resource(state, user, projection));
    state.links.collection("users", path, page, request)
}

pub(crate) fn post_collection(
    state: &AppState,
    path: &str,
    page: Page<Post>,
    request: &PageRequest,
) -> Collection<Post> {
    let page = page.map(|post| post_resource(state, post));
    state.links.collection("posts", path, page, request)
}

pub(crate) fn comment_collection(
    state: &AppState,
    path: &str,
    page: Page<PostComment>,
    request: &PageRequest,
    projection: CommentProjection,
) -> Collection<CommentView> {
    let page = page.map(|comment| comment_resource(state, comment, projection));
    state.links.collection("postComments", path, page, request)
}
