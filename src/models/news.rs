use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::UserProfile;

/// A published news item.
///
/// `content` is either a structured document or a plain string, depending
/// on the editor used to produce it; the client passes it through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub content: Value,
    pub publication_date: DateTime<Utc>,
    pub author_id: i64,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub author: Option<UserProfile>,
}
