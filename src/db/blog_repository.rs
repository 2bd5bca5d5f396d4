use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};

use crate::db::models::{Blog, BlogSummary, WriteOutcome};
use crate::error::AppError;

/// Number of posts on the home feed.
pub const HOME_FEED_LIMIT: i64 = 4;
/// Number of posts on the popular feed.
pub const POPULAR_FEED_LIMIT: i64 = 5;

/// Fixed notice written by the approve flow.
pub const APPROVAL_TITLE: &str = "Congratulations!";
pub const APPROVAL_MESSAGE: &str = "Your blog has been approved and is now live.";

/// Fixed notice written by the deny flow.
pub const DENIAL_TITLE: &str = "Blog rejected";
pub const DENIAL_MESSAGE: &str = "Your blog did not meet our publishing guidelines.";

/// Repository trait for blog post operations.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new post and return its database-assigned id.
    async fn create(&self, blog: Blog) -> Result<ObjectId, AppError>;

    /// Find a post by id.
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Blog>, AppError>;

    /// Latest approved posts for the home feed, newest first.
    async fn list_home(&self) -> Result<Vec<Blog>, AppError>;

    /// One page of approved posts, newest first. `page` is zero-based.
    async fn list_page(&self, page: u64, size: i64) -> Result<Vec<Blog>, AppError>;

    /// Every post, approved or not, projected down to the fields the
    /// management screen shows.
    async fn list_summaries(&self) -> Result<Vec<BlogSummary>, AppError>;

    /// Number of approved posts.
    async fn count_approved(&self) -> Result<u64, AppError>;

    /// Most-liked approved posts.
    async fn list_popular(&self) -> Result<Vec<Blog>, AppError>;

    /// Every post written under the given author email.
    async fn list_by_author(&self, email: &str) -> Result<Vec<Blog>, AppError>;

    /// Mark a post approved and attach the acceptance notice. Upserts, so
    /// approving an id with no document creates a moderation stub.
    async fn approve(&self, id: ObjectId) -> Result<WriteOutcome, AppError>;

    /// Attach the rejection notice. Writes `denied: false` and leaves
    /// `approved` untouched, faithful to the legacy moderation flow; see
    /// DESIGN.md before changing either fact. Upserts like `approve`.
    async fn deny(&self, id: ObjectId) -> Result<WriteOutcome, AppError>;

    /// Delete a post by id, returning how many documents matched.
    async fn delete(&self, id: ObjectId) -> Result<u64, AppError>;
}

/// MongoDB implementation of the BlogRepository.
pub struct MongoBlogRepository {
    collection: mongodb::Collection<Blog>,
}

impl MongoBlogRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("blogs"),
        }
    }

    async fn collect(
        &self,
        filter: Document,
        options: mongodb::options::FindOptions,
    ) -> Result<Vec<Blog>, AppError> {
        let mut cursor = self.collection.find(filter).with_options(options).await?;

        let mut blogs = Vec::new();
        while let Some(blog) = cursor.try_next().await? {
            blogs.push(blog);
        }

        Ok(blogs)
    }

    async fn moderate(&self, id: ObjectId, update: Document) -> Result<WriteOutcome, AppError> {
        use mongodb::options::UpdateOptions;

        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(doc! { "_id": id }, update)
            .with_options(options)
            .await?;

        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
            upserted_id: result.upserted_id.and_then(|id| id.as_object_id()),
        })
    }
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    async fn create(&self, blog: Blog) -> Result<ObjectId, AppError> {
        let result = self.collection.insert_one(&blog).await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("insert did not return an ObjectId".into()))
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Blog>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn list_home(&self) -> Result<Vec<Blog>, AppError> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "author.date": -1 })
            .limit(HOME_FEED_LIMIT)
            .build();

        self.collect(doc! { "approved": true }, options).await
    }

    async fn list_page(&self, page: u64, size: i64) -> Result<Vec<Blog>, AppError> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "author.date": -1 })
            .skip(page.saturating_mul(size as u64))
            .limit(size)
            .build();

        self.collect(doc! { "approved": true }, options).await
    }

    async fn list_summaries(&self) -> Result<Vec<BlogSummary>, AppError> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .projection(doc! { "title": 1, "category": 1, "approved": 1, "author": 1 })
            .build();

        let mut cursor = self
            .collection
            .clone_with_type::<BlogSummary>()
            .find(doc! {})
            .with_options(options)
            .await?;

        let mut summaries = Vec::new();
        while let Some(summary) = cursor.try_next().await? {
            summaries.push(summary);
        }

        Ok(summaries)
    }

    async fn count_approved(&self) -> Result<u64, AppError> {
        // The driver's estimated count cannot take a filter, so the
        // approved subset is counted exactly.
        Ok(self
            .collection
            .count_documents(doc! { "approved": true })
            .await?)
    }

    async fn list_popular(&self) -> Result<Vec<Blog>, AppError> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "likes": -1 })
            .limit(POPULAR_FEED_LIMIT)
            .build();

        self.collect(doc! { "approved": true }, options).await
    }

    async fn list_by_author(&self, email: &str) -> Result<Vec<Blog>, AppError> {
        use mongodb::options::FindOptions;

        self.collect(doc! { "author.email": email }, FindOptions::default())
            .await
    }

    async fn approve(&self, id: ObjectId) -> Result<WriteOutcome, AppError> {
        let update = doc! {
            "$set": {
                "approved": true,
                "adminsMessage": { "title": APPROVAL_TITLE, "message": APPROVAL_MESSAGE },
            }
        };

        self.moderate(id, update).await
    }

    async fn deny(&self, id: ObjectId) -> Result<WriteOutcome, AppError> {
        let update = doc! {
            "$set": {
                "denied": false,
                "adminsMessage": { "title": DENIAL_TITLE, "message": DENIAL_MESSAGE },
            }
        };

        self.moderate(id, update).await
    }

    async fn delete(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count)
    }
}
