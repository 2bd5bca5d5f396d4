use std::sync::Arc;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use inkpost::api::router::build_router;
use inkpost::db::blog_repository::{BlogRepository, MongoBlogRepository};
use inkpost::db::user_repository::{MongoUserRepository, UserRepository};
use inkpost::state::AppState;

/// Holds the running MongoDB container and provides the Axum router for
/// integration tests.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: axum::Router,
    pub blog_repo: Arc<dyn BlogRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl TestEnv {
    /// Spin up MongoDB and build an Axum router wired to real repositories.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("inkpost_test");

        let user_repo_impl = MongoUserRepository::new(&mongo_db);
        user_repo_impl
            .ensure_indexes()
            .await
            .expect("Failed to create user indexes");

        let blog_repo: Arc<dyn BlogRepository> = Arc::new(MongoBlogRepository::new(&mongo_db));
        let user_repo: Arc<dyn UserRepository> = Arc::new(user_repo_impl);

        let router = build_router(AppState {
            blog_repo: blog_repo.clone(),
            user_repo: user_repo.clone(),
        });

        Self {
            _mongo: mongo_container,
            router,
            blog_repo,
            user_repo,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for
    /// error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: create a blog via the API and return its new id (hex).
    pub async fn create_blog(
        &self,
        server: &axum_test::TestServer,
        title: &str,
        email: &str,
        date: &str,
        approved: bool,
        likes: i64,
    ) -> String {
        let ack = server
            .post("/blogs")
            .json(&serde_json::json!({
                "title": title,
                "author": { "email": email, "name": "Test Author", "date": date },
                "content": format!("Body of {title}"),
                "likes": likes,
                "approved": approved,
            }))
            .await
            .json::<serde_json::Value>();

        ack["insertedId"]
            .as_str()
            .expect("create response should carry an insertedId")
            .to_string()
    }
}
