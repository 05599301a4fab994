// News endpoints

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::NewsItem;
use crate::transport::ApiClient;

/// Pagination window for news listings
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Fields accepted when creating a news item
#[derive(Debug, Clone, Serialize)]
pub struct NewsPayload {
    pub title: String,
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// Partial update of a news item; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

pub async fn list(client: &ApiClient, params: ListParams) -> Result<Vec<NewsItem>, ApiError> {
    client
        .send_json(client.request(Method::GET, "/news").query(&params))
        .await
}

pub async fn get(client: &ApiClient, id: i64) -> Result<NewsItem, ApiError> {
    client
        .send_json(client.request(Method::GET, &format!("/news/{}", id)))
        .await
}

pub async fn create(client: &ApiClient, payload: &NewsPayload) -> Result<NewsItem, ApiError> {
    client
        .send_json(client.request(Method::POST, "/news").json(payload))
        .await
}

pub async fn update(client: &ApiClient, id: i64, payload: &NewsUpdate) -> Result<NewsItem, ApiError> {
    client
        .send_json(client.request(Method::PUT, &format!("/news/{}", id)).json(payload))
        .await
}

pub async fn remove(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client
        .send_unit(client.request(Method::DELETE, &format!("/news/{}", id)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_skip_absent_fields() {
        let empty = serde_json::to_value(ListParams::default()).unwrap();
        assert_eq!(empty, serde_json::json!({}));

        let windowed = serde_json::to_value(ListParams {
            skip: Some(20),
            limit: Some(10),
        })
        .unwrap();
        assert_eq!(windowed, serde_json::json!({"skip": 20, "limit": 10}));
    }

    #[test]
    fn test_news_update_serializes_only_changed_fields() {
        let update = NewsUpdate {
            title: Some("New title".to_string()),
            ..NewsUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"title": "New title"})
        );
    }
}
