use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

use crate::db::models::{
    ApprovedCount, Blog, BlogSummary, CreateBlogRequest, DeleteAck, InsertAck, UpdateAck,
};
use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for the paginated listing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

const MAX_PAGE_SIZE: i64 = 50;

impl PageQuery {
    /// Page size, forced into a sane window.
    pub fn clamped_size(&self) -> i64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Parse a path parameter into an ObjectId, rejecting malformed values
/// before they reach the driver.
fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid blog id")))
}

fn validate_create(request: &CreateBlogRequest) -> Result<(), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title cannot be empty".into()));
    }
    if request.author.email.trim().is_empty() {
        return Err(AppError::Validation("Author email cannot be empty".into()));
    }
    Ok(())
}

/// `GET /blogs/home`
pub async fn home_feed(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(state.blog_repo.list_home().await?))
}

/// `GET /blogs?page&size`
pub async fn paginated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Blog>>, AppError> {
    let blogs = state
        .blog_repo
        .list_page(query.page, query.clamped_size())
        .await?;

    Ok(Json(blogs))
}

/// `GET /blogs/manage`
pub async fn manage_listing(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogSummary>>, AppError> {
    Ok(Json(state.blog_repo.list_summaries().await?))
}

/// `GET /blogs/count`
pub async fn approved_count(
    State(state): State<AppState>,
) -> Result<Json<ApprovedCount>, AppError> {
    let count = state.blog_repo.count_approved().await?;

    Ok(Json(ApprovedCount {
        approved_blogs: count,
    }))
}

/// `GET /blogs/popular`
pub async fn popular_feed(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(state.blog_repo.list_popular().await?))
}

/// `GET /blogs/author/{email}`
pub async fn by_author(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Blog>>, AppError> {
    Ok(Json(state.blog_repo.list_by_author(&email).await?))
}

/// `GET /blog/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Blog>, AppError> {
    let id = parse_object_id(&id)?;

    match state.blog_repo.find_by_id(id).await? {
        Some(blog) => Ok(Json(blog)),
        None => Err(AppError::NotFound(format!("no blog with id {id}"))),
    }
}

/// `POST /blogs`
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<InsertAck>), AppError> {
    validate_create(&request)?;

    let id = state.blog_repo.create(request.into_blog()).await?;

    Ok((
        StatusCode::CREATED,
        Json(InsertAck {
            acknowledged: true,
            inserted_id: id.to_hex(),
        }),
    ))
}

/// `PATCH /blog/{id}/approve`
pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateAck>, AppError> {
    let id = parse_object_id(&id)?;
    let outcome = state.blog_repo.approve(id).await?;

    Ok(Json(outcome.into()))
}

/// `PATCH /blog/{id}/deny`
pub async fn deny(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateAck>, AppError> {
    let id = parse_object_id(&id)?;
    let outcome = state.blog_repo.deny(id).await?;

    Ok(Json(outcome.into()))
}

/// `DELETE /blog/{id}` — idempotent; a second delete acknowledges zero.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = parse_object_id(&id)?;
    let deleted = state.blog_repo.delete(id).await?;

    Ok(Json(DeleteAck {
        acknowledged: true,
        deleted_count: deleted,
    }))
}
