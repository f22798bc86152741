//! Post endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{comment_collection, post_collection, post_resource, user_resource};
use crate::db::repos::{CommentRepo, Lister, Post, PostRepo, Reader, UserRepo, Writer};
use crate::http::auth::Principal;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ResourceId};
use crate::http::hal::{Collection, Resource};
use crate::http::server::AppState;
use crate::models::{
    CommentFilter, PageParams, PageRequest, PostDraft, PostFilter, PostPayload, COMMENT_SORTABLE,
    POST_SORTABLE,
};
use crate::projection::{CommentProjection, CommentView, ProjectionParams, UserProjection, UserView};

/// GET /posts
#[instrument(skip_all)]
async fn list_posts(
    State(state): State<Arc<AppState>>,
    principal: Option<Principal>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiQuery(filter): ApiQuery<PostFilter>,
) -> Result<Json<Collection<Post>>, ApiError> {
    tracing::debug!(?principal, ?filter, "Listing posts");
    let request = PageRequest::from_params(params, POST_SORTABLE)?;
    let page = PostRepo::new(&state.pool).find_all(&filter, &request).await?;
    Ok(Json(post_collection(&state, "/posts", page, &request)))
}

/// GET /posts/{id}
#[instrument(skip_all)]
async fn get_post(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Resource<Post>>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    Ok(Json(post_resource(&state, post)))
}

/// POST /posts
#[instrument(skip_all)]
async fn create_post(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<PostPayload>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Resource<Post>>), ApiError> {
    let draft = PostDraft::try_from(payload)?;
    let post = PostRepo::new(&state.pool).create(&draft).await?;
    tracing::info!(id = post.id, user_id = post.user_id, "Created post");

    let location = state.links.href(&format!("/posts/{}", post.id));
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(post_resource(&state, post)),
    ))
}

/// PUT /posts/{id} - full replace
#[instrument(skip_all)]
async fn replace_post(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<PostPayload>,
) -> Result<Json<Resource<Post>>, ApiError> {
    let draft = PostDraft::try_from(payload)?;
    let post = PostRepo::new(&state.pool).replace(id, &draft).await?;
    tracing::info!(id, "Replaced post");
    Ok(Json(post_resource(&state, post)))
}

/// DELETE /posts/{id} - 409 while comments still reference the post
#[instrument(skip_all)]
async fn delete_post(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    PostRepo::new(&state.pool).delete_by_id(id).await?;
    tracing::info!(id, "Deleted post");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /posts/{id}/user - the author
#[instrument(skip_all)]
async fn post_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Resource<UserView>>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    let user = UserRepo::new(&state.pool).get(post.user_id).await?;
    let projection = UserProjection::parse(projection.projection.as_deref());
    Ok(Json(user_resource(&state, user, projection)))
}

/// GET /posts/{id}/comments
#[instrument(skip_all)]
async fn post_comments(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Collection<CommentView>>, ApiError> {
    PostRepo::new(&state.pool).get(id).await?;
    let request = PageRequest::from_params(params, COMMENT_SORTABLE)?;
    let projection = CommentProjection::parse(projection.projection.as_deref());
    let filter = CommentFilter {
        post_id: Some(id),
        ..Default::default()
    };

    let page = CommentRepo::new(&state.pool).find_all(&filter, &request).await?;
    let path = format!("/posts/{id}/comments");
    Ok(Json(comment_collection(&state, &path, page, &request, projection)))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(replace_post).delete(delete_post),
        )
        .route("/posts/{id}/user", get(post_user))
        .route("/posts/{id}/comments", get(post_comments))
}
