//! User endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{comment_collection, post_collection, user_collection, user_resource};
use crate::db::repos::{CommentRepo, Lister, Post, PostRepo, Reader, User, UserRepo, Writer};
use crate::http::auth::Principal;
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ApiQuery, ResourceId};
use crate::http::hal::{Collection, Resource};
use crate::http::server::AppState;
use crate::models::{
    CommentFilter, PageParams, PageRequest, PostFilter, UserDraft, UserFilter, UserPayload,
    COMMENT_SORTABLE, POST_SORTABLE, USER_SORTABLE,
};
use crate::projection::{CommentProjection, CommentView, ProjectionParams, UserProjection, UserView};

type Created = (StatusCode, [(axum::http::HeaderName, String); 1], Json<Resource<UserView>>);

/// GET /users - filtered, sorted page of users
#[instrument(skip_all)]
async fn list_users(
    State(state): State<Arc<AppState>>,
    principal: Option<Principal>,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiQuery(filter): ApiQuery<UserFilter>,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Collection<UserView>>, ApiError> {
    tracing::debug!(?principal, ?filter, "Listing users");
    let request = PageRequest::from_params(params, USER_SORTABLE)?;
    let projection = UserProjection::parse(projection.projection.as_deref());

    let page = UserRepo::new(&state.pool).find_all(&filter, &request).await?;
    Ok(Json(user_collection(&state, "/users", page, &request, projection)))
}

/// GET /users/{id}
#[instrument(skip_all)]
async fn get_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Resource<UserView>>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    let projection = UserProjection::parse(projection.projection.as_deref());
    Ok(Json(user_resource(&state, user, projection)))
}

fn created(state: &AppState, user: User) -> Created {
    let location = state.links.href(&format!("/users/{}", user.id));
    (
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(user_resource(state, user, UserProjection::Full)),
    )
}

/// POST /users
#[instrument(skip_all)]
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> Result<Created, ApiError> {
    let draft = UserDraft::try_from(payload)?;
    let user = UserRepo::new(&state.pool).create(&draft).await?;
    tracing::info!(id = user.id, "Created user");
    Ok(created(&state, user))
}

/// PUT /users/{id} - full replace
#[instrument(skip_all)]
async fn replace_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<UserPayload>,
) -> Result<Json<Resource<UserView>>, ApiError> {
    let draft = UserDraft::try_from(payload)?;
    let user = UserRepo::new(&state.pool).replace(id, &draft).await?;
    tracing::info!(id, "Replaced user");
    Ok(Json(user_resource(&state, user, UserProjection::Full)))
}

/// DELETE /users/{id} - 409 while the user still owns posts or comments
#[instrument(skip_all)]
async fn delete_user(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    UserRepo::new(&state.pool).delete_by_id(id).await?;
    tracing::info!(id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{id}/posts
#[instrument(skip_all)]
async fn user_posts(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Collection<Post>>, ApiError> {
    UserRepo::new(&state.pool).get(id).await?;
    let request = PageRequest::from_params(params, POST_SORTABLE)?;
    let filter = PostFilter {
        user_id: Some(id),
        ..Default::default()
    };

    let page = PostRepo::new(&state.pool).find_all(&filter, &request).await?;
    let path = format!("/users/{id}/posts");
    Ok(Json(post_collection(&state, &path, page, &request)))
}

/// GET /users/{id}/comments
#[instrument(skip_all)]
async fn user_comments(
    State(state): State<Arc<AppState>>,
    ResourceId(id): ResourceId,
    ApiQuery(params): ApiQuery<PageParams>,
    ApiQuery(projection): ApiQuery<ProjectionParams>,
) -> Result<Json<Collection<CommentView>>, ApiError> {
    UserRepo::new(&state.pool).get(id).await?;
    let request = PageRequest::from_params(params, COMMENT_SORTABLE)?;
    let projection = CommentProjection::parse(projection.projection.as_deref());
    let filter = CommentFilter {
        user_id: Some(id),
        ..Default::default()
    };

    let page = CommentRepo::new(&state.pool).find_all(&filter, &request).await?;
    let path = format!("/users/{id}/comments");
    Ok(Json(comment_collection(&state, &path, page, &request, projection)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(replace_user).delete(delete_user),
        )
        .route("/users/{id}/posts", get(user_posts))
        .route("/users/{id}/comments", get(user_comments))
}
