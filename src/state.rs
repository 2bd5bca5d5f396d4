use std::sync::Arc;

use crate::db::blog_repository::BlogRepository;
use crate::db::user_repository::UserRepository;

/// Shared handles injected into every request handler.
///
/// Built once at startup from a single MongoDB client; the driver pools
/// connections internally, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub blog_repo: Arc<dyn BlogRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}
