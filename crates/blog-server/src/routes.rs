// crates/blog-server/src/routes.rs
// ============================================================================
// Module: API Routes
// Description: axum router and handlers for posts, comments, and images.
// Purpose: Translate HTTP requests into service calls on the blocking pool.
// Dependencies: axum, blog-config, blog-core, tokio, tower-http
// ============================================================================

//! ## Overview
//! All API routes live under `/api/posts`. Handlers extract and validate the
//! request shape, then run the synchronous service call through
//! [`tokio::task::spawn_blocking`]. CORS applies to the API routes only;
//! `/health` sits outside it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::middleware;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use blog_config::CorsConfig;
use blog_config::ServerConfig;
use blog_core::BlogError;
use blog_core::CommentRequest;
use blog_core::CommentResponse;
use blog_core::CommentService;
use blog_core::DEFAULT_IMAGE_CONTENT_TYPE;
use blog_core::PostRequest;
use blog_core::PostResponse;
use blog_core::PostService;
use blog_core::PostsResponse;
use blog_core::SharedBlogStore;
use serde::Deserialize;
use serde::Serialize;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;

use crate::audit::RequestAuditSink;
use crate::audit::audit_requests;
use crate::error::ApiError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Multipart field carrying the uploaded image.
const IMAGE_PART: &str = "image";

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Post operations.
    posts: PostService,
    /// Comment operations.
    comments: CommentService,
}

impl AppState {
    /// Builds handler state over a shared store.
    #[must_use]
    pub fn new(store: SharedBlogStore) -> Self {
        Self { posts: PostService::new(store.clone()), comments: CommentService::new(store) }
    }
}

/// Query parameters of the post listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostsQuery {
    /// Raw search string (title words and `#tags`).
    search: String,
    /// One-based page number.
    page_number: i64,
    /// Page size.
    page_size: i64,
}

/// Liveness response body.
#[derive(Debug, Serialize)]
struct HealthResponse {
    /// Always `"ok"`.
    status: &'static str,
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the application router.
///
/// # Errors
///
/// Returns [`ApiError`] when a configured CORS origin is not a valid header value.
pub fn build_router(
    state: AppState,
    server: &ServerConfig,
    audit: Arc<dyn RequestAuditSink>,
) -> Result<Router, ApiError> {
    let cors = cors_layer(&server.cors)?;
    let api = Router::new()
        .route("/api/posts", get(get_posts).post(create_post))
        .route("/api/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/api/posts/{id}/likes", post(increment_likes))
        .route(
            "/api/posts/{id}/image",
            get(get_image)
                .put(update_image)
                .layer(DefaultBodyLimit::max(server.max_image_bytes)),
        )
        .route("/api/posts/{id}/comments", get(get_comments).post(create_comment))
        .route(
            "/api/posts/{id}/comments/{comment_id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
        .layer(cors);
    Ok(api
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(audit, audit_requests))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .with_state(state))
}

/// Builds the CORS layer for API routes.
fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ApiError> {
    let origins = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let values = config
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin.trim())
                    .map_err(|_| ApiError::internal(format!("invalid cors origin: {origin}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age_secs)))
}

/// Runs a synchronous service call on the blocking pool.
async fn blocking<T, F>(call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, BlogError> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|_| ApiError::internal("request handler failed"))?
        .map_err(ApiError::from)
}

// ============================================================================
// SECTION: Post Handlers
// ============================================================================

/// `GET /api/posts`
async fn get_posts(
    State(state): State<AppState>,
    query: Result<Query<PostsQuery>, QueryRejection>,
) -> Result<Json<PostsResponse>, ApiError> {
    let Query(query) = query?;
    let response = blocking(move || {
        state.posts.get_posts(&query.search, query.page_number, query.page_size)
    })
    .await?;
    Ok(Json(response))
}

/// `GET /api/posts/{id}`
async fn get_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PostResponse>, ApiError> {
    let Path(id) = id?;
    Ok(Json(blocking(move || state.posts.get_post(id)).await?))
}

/// `POST /api/posts`
async fn create_post(
    State(state): State<AppState>,
    body: Result<Json<PostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let Json(request) = body?;
    let response = blocking(move || state.posts.create_post(&request)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `PUT /api/posts/{id}`
async fn update_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<PostRequest>, JsonRejection>,
) -> Result<Json<PostResponse>, ApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    Ok(Json(blocking(move || state.posts.update_post(id, &request)).await?))
}

/// `DELETE /api/posts/{id}`
async fn delete_post(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    blocking(move || state.posts.delete_post(id)).await?;
    Ok(StatusCode::OK)
}

/// `POST /api/posts/{id}/likes`
async fn increment_likes(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<u32>, ApiError> {
    let Path(id) = id?;
    Ok(Json(blocking(move || state.posts.increment_likes(id)).await?))
}

/// `PUT /api/posts/{id}/image` with a multipart `image` part.
async fn update_image(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_PART) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?.to_vec();
        upload = Some((bytes, content_type));
        break;
    }
    let (bytes, content_type) = upload.ok_or_else(|| {
        ApiError::bad_request(format!("Required part '{IMAGE_PART}' is not present."))
    })?;
    blocking(move || state.posts.update_image(id, bytes, content_type.as_deref())).await?;
    Ok(StatusCode::OK)
}

/// `GET /api/posts/{id}/image`
async fn get_image(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let image = blocking(move || state.posts.get_image(id)).await?;
    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_IMAGE_CONTENT_TYPE));
    Ok(([(CONTENT_TYPE, content_type)], image.bytes).into_response())
}

// ============================================================================
// SECTION: Comment Handlers
// ============================================================================

/// `GET /api/posts/{id}/comments`
async fn get_comments(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let Path(post_id) = id?;
    Ok(Json(blocking(move || state.comments.get_comments(post_id)).await?))
}

/// `GET /api/posts/{id}/comments/{comment_id}`
async fn get_comment(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<CommentResponse>, ApiError> {
    let Path((post_id, comment_id)) = ids?;
    Ok(Json(blocking(move || state.comments.get_comment(post_id, comment_id)).await?))
}

/// `POST /api/posts/{id}/comments`
async fn create_comment(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentResponse>, ApiError> {
    let Path(post_id) = id?;
    let Json(request) = body?;
    Ok(Json(blocking(move || state.comments.create_comment(post_id, &request)).await?))
}

/// `PUT /api/posts/{id}/comments/{comment_id}`
async fn update_comment(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentResponse>, ApiError> {
    let Path((post_id, comment_id)) = ids?;
    let Json(request) = body?;
    let response =
        blocking(move || state.comments.update_comment(post_id, comment_id, &request)).await?;
    Ok(Json(response))
}

/// `DELETE /api/posts/{id}/comments/{comment_id}`
async fn delete_comment(
    State(state): State<AppState>,
    ids: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((post_id, comment_id)) = ids?;
    blocking(move || state.comments.delete_comment(post_id, comment_id)).await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// SECTION: Health
// ============================================================================

/// `GET /health`
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
