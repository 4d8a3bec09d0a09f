use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A blog post owned by the user who created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    /// Number of comments attached to this post.
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    /// Guard run before any update or delete of this post.
    pub fn authorize_mutation(&self, actor_id: i64) -> Result<(), DomainError> {
        if self.is_owned_by(actor_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "user {} does not own post {}",
                actor_id, self.id
            )))
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Names of the fields this change touches, for audit records.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.content.is_some() {
            fields.push("content");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_owned_by(user_id: i64) -> Post {
        let now = Utc::now();
        Post {
            id: 7,
            user_id,
            title: "t".to_string(),
            content: "c".to_string(),
            comment_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_owner_may_mutate() {
        assert!(post_owned_by(1).authorize_mutation(1).is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let result = post_owned_by(1).authorize_mutation(2);
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn test_change_field_names() {
        let changes = PostChanges {
            title: None,
            content: Some("new".to_string()),
        };
        assert_eq!(changes.field_names(), vec!["content"]);
        assert!(PostChanges::default().is_empty());
    }
}
