//! Post comment endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::LOCATION, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{comment_collection, comment_resource, post_resource, user_resource};
use crate::db::repos::{CommentRepo, Lister, Post, PostRepo, Reader, UserRepo, Writer};
use crate::http::auth::Principal;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ResourceId};
use crate::http::hal::{Collection, Resource};
use crate::http::server::AppState;
use crate::models::{CommentDraft, CommentFilter, CommentPayload, PageParams, PageRequest, COMMENT_SORTABLE};
use crate::projection::{CommentProjection, CommentView, ProjectionParams, UserProjection, UserView};

/// GET /postComments
#[instrument(skip_all)]
async fn list_comments(
    State(state): State<Arc<AppState>>,
    principal: Option<Principal>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiQuery(filter): ApiQuery<CommentFilter>,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Collection<CommentView>>, ApiError> {
    tracing::debug!(?principal, ?filter, "Listing comments");
    let request = PageRequest::from_params(params, COMMENT_SORTABLE)?;
    let projection = CommentProjection::parse(projection.projection.as_deref());

    let page = CommentRepo::new(&state.pool).find_all(&filter, &request).await?;
    Ok(Json(comment_collection(&state, "/postComments", page, &request, projection)))
}

/// GET /postComments/{id}
#[instrument(skip_all)]
async fn get_comment(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Resource<CommentView>>, ApiError> {
    let comment = CommentRepo::new(&state.pool).get(id).await?;
    let projection = CommentProjection::parse(projection.projection.as_deref());
    Ok(Json(comment_resource(&state, comment, projection)))
}

/// POST /postComments
#[instrument(skip_all)]
async fn create_comment(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CommentPayload>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Resource<CommentView>>), ApiError> {
    let draft = CommentDraft::try_from(payload)?;
    let comment = CommentRepo::new(&state.pool).create(&draft).await?;
    tracing::info!(
        id = comment.id,
        post_id = comment.post_id,
        status = %comment.status,
        "Created comment"
    );

    let location = state.links.href(&format!("/postComments/{}", comment.id));
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(comment_resource(&state, comment, CommentProjection::Full)),
    ))
}

/// PUT /postComments/{id} - full replace
#[instrument(skip_all)]
async fn replace_comment(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<CommentPayload>,
) -> Result<Json<Resource<CommentView>>, ApiError> {
    let draft = CommentDraft::try_from(payload)?;
    let comment = CommentRepo::new(&state.pool).replace(id, &draft).await?;
    tracing::info!(id, status = %comment.status, "Replaced comment");
    Ok(Json(comment_resource(&state, comment, CommentProjection::Full)))
}

/// DELETE /postComments/{id}
#[instrument(skip_all)]
async fn delete_comment(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    CommentRepo::new(&state.pool).delete_by_id(id).await?;
    tracing::info!(id, "Deleted comment");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /postComments/{id}/post
#[instrument(skip_all)]
async fn comment_post(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<Json<Resource<Post>>, ApiError> {
    let comment = CommentRepo::new(&state.pool).get(id).await?;
    let post = PostRepo::new(&state.pool).get(comment.post_id).await?;
    Ok(Json(post_resource(&state, post)))
}

/// GET /postComments/{id}/user
#[instrument(skip_all)]
async fn comment_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Resource<UserView>>, ApiError> {
    let comment = CommentRepo::new(&state.pool).get(id).await?;
    let user = UserRepo::new(&state.pool).get(comment.user_id).await?;
    let projection = UserProjection::parse(projection.projection.as_deref());
    Ok(Json(user_resource(&state, user, projection)))
}

/// Post comment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/postComments", get(list_comments).post(create_comment))
        .route(
            "/postComments/{id}",
            get(get_comment).put(replace_comment).delete(delete_comment),
        )
        .route("/postComments/{id}/post", get(comment_post))
        .route("/postComments/{id}/user", get(comment_user))
}
