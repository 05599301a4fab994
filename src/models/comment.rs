use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::UserProfile;

/// A comment attached to a news item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentItem {
    pub id: i64,
    pub text: String,
    pub news_id: i64,
    pub author_id: i64,
    pub publication_date: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<UserProfile>,
}
