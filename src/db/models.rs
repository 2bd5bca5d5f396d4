use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Author stamp embedded in every blog document.
///
/// `date` is the client-supplied publication timestamp; listings sort on
/// it, so it is stored exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogAuthor {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Fixed moderation notice attached by the approve and deny flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminMessage {
    pub title: String,
    pub message: String,
}

/// A blog post stored in the `blogs` collection.
///
/// Field names stay camelCase on the wire to match the documents the
/// platform already holds. Reads are lenient (every field defaults) so
/// legacy documents and moderation stubs deserialize; writes go through
/// [`CreateBlogRequest`], which is where validation lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub author: BlogAuthor,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub approved: bool,
    /// Written (as `false`) by the deny flow and never cleared by the
    /// approve flow; the two flags are independent. See DESIGN.md.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admins_message: Option<AdminMessage>,
}

/// Trimmed projection of a blog used by the management listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub author: BlogAuthor,
}

/// Client payload for creating a blog post. Inserted verbatim, with the
/// moderation fields zeroed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub author: BlogAuthor,
    pub title: String,
    #[serde(default)]
    pub title_image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub approved: bool,
}

impl CreateBlogRequest {
    pub fn into_blog(self) -> Blog {
        Blog {
            id: None,
            author: self.author,
            title: self.title,
            title_image: self.title_image,
            category: self.category,
            content: self.content,
            likes: self.likes,
            approved: self.approved,
            denied: None,
            admins_message: None,
        }
    }
}

/// Platform role, stored as a lowercase string in the `users` collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Author,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Author => "author",
            Role::Admin => "admin",
        }
    }
}

/// A platform user, uniquely addressed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// Outcome of an update/upsert, decoupled from the driver's result type
/// so repositories stay mockable.
#[derive(Debug, Clone, Default)]
pub struct WriteOutcome {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<ObjectId>,
}

/// Wire shape of write acknowledgements. These mirror the driver results
/// the platform's existing clients already consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

impl From<WriteOutcome> for UpdateAck {
    fn from(outcome: WriteOutcome) -> Self {
        Self {
            acknowledged: true,
            matched_count: outcome.matched,
            modified_count: outcome.modified,
            upserted_id: outcome.upserted_id.map(|id| id.to_hex()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Response body for the approved-blog count endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedCount {
    pub approved_blogs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_fields_are_camel_case_on_the_wire() {
        let blog = Blog {
            id: None,
            author: BlogAuthor {
                email: "a@x.com".to_string(),
                name: "Ada".to_string(),
                date: Some(Utc::now()),
            },
            title: "Hello".to_string(),
            title_image: Some("cover.png".to_string()),
            category: Some("tech".to_string()),
            content: "body".to_string(),
            likes: 3,
            approved: false,
            denied: None,
            admins_message: None,
        };

        let json = serde_json::to_value(&blog).unwrap();
        assert!(json.get("titleImage").is_some());
        assert!(json.get("title_image").is_none());
        // Unset moderation fields stay off the wire entirely.
        assert!(json.get("_id").is_none());
        assert!(json.get("denied").is_none());
        assert!(json.get("adminsMessage").is_none());
    }

    #[test]
    fn legacy_documents_deserialize_with_defaults() {
        // A moderation stub created by an approve-before-submit upsert has
        // nothing but an id and the fields the update set.
        let json = r#"{
            "_id": { "$oid": "64ab0e2f9d3e4c0001a20b3c" },
            "approved": true,
            "adminsMessage": { "title": "Congratulations!", "message": "ok" }
        }"#;

        let blog: Blog = serde_json::from_str(json).unwrap();
        assert!(blog.approved);
        assert_eq!(blog.title, "");
        assert_eq!(blog.likes, 0);
        assert_eq!(blog.denied, None);
        assert_eq!(blog.author, BlogAuthor::default());
    }

    #[test]
    fn create_request_zeroes_moderation_fields() {
        let request: CreateBlogRequest = serde_json::from_value(serde_json::json!({
            "title": "A",
            "author": { "email": "a@x.com" },
            "approved": false
        }))
        .unwrap();

        let blog = request.into_blog();
        assert_eq!(blog.id, None);
        assert_eq!(blog.denied, None);
        assert_eq!(blog.admins_message, None);
        assert_eq!(blog.content, "");
        assert_eq!(blog.author.date, None);
    }

    #[test]
    fn role_round_trips_as_lowercase_string() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"author\"").unwrap();
        assert_eq!(role, Role::Author);
        assert_eq!(role.as_str(), "author");
    }

    #[test]
    fn user_role_defaults_to_user() {
        let user: User =
            serde_json::from_value(serde_json::json!({ "email": "a@x.com", "name": "Ada" }))
                .unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn update_ack_carries_upserted_id_as_hex() {
        let id = ObjectId::new();
        let ack: UpdateAck = WriteOutcome {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        }
        .into();

        assert!(ack.acknowledged);
        assert_eq!(ack.upserted_id.as_deref(), Some(id.to_hex().as_str()));

        let json = serde_json::to_value(&ack).unwrap();
        assert!(json.get("upsertedId").is_some());
        assert!(json.get("matchedCount").is_some());
    }
}
