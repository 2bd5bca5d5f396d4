use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;

use crate::db::models::{Role, User, WriteOutcome};
use crate::error::AppError;

/// Repository trait for user operations. Users are keyed by email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All registered users.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Upsert the role of the user with this email.
    async fn set_role(&self, email: &str, role: Role) -> Result<WriteOutcome, AppError>;

    /// Replace-or-create the full profile keyed by email.
    async fn upsert_profile(&self, user: User) -> Result<WriteOutcome, AppError>;

    /// Delete the user with this email, returning how many matched.
    async fn delete(&self, email: &str) -> Result<u64, AppError>;
}

/// MongoDB implementation of the UserRepository.
pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }

    /// Unique index on email: one document per address. Racing profile
    /// writes then fail with a duplicate-key error instead of splitting
    /// a user across two documents.
    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection.create_index(index).await?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut cursor = self.collection.find(doc! {}).await?;

        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }

        Ok(users)
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<WriteOutcome, AppError> {
        use mongodb::options::UpdateOptions;

        let options = UpdateOptions::builder().upsert(true).build();

        let result = self
            .collection
            .update_one(
                doc! { "email": email },
                doc! { "$set": { "email": email, "role": role.as_str() } },
            )
            .with_options(options)
            .await?;

        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
            upserted_id: result.upserted_id.and_then(|id| id.as_object_id()),
        })
    }

    async fn upsert_profile(&self, user: User) -> Result<WriteOutcome, AppError> {
        use mongodb::options::ReplaceOptions;

        let filter = doc! { "email": &user.email };
        let options = ReplaceOptions::builder().upsert(true).build();

        let result = self
            .collection
            .replace_one(filter, &user)
            .with_options(options)
            .await?;

        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
            upserted_id: result.upserted_id.and_then(|id| id.as_object_id()),
        })
    }

    async fn delete(&self, email: &str) -> Result<u64, AppError> {
        let result = self.collection.delete_one(doc! { "email": email }).await?;
        Ok(result.deleted_count)
    }
}
