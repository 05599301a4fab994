// Comment endpoints

use reqwest::Method;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::CommentItem;
use crate::transport::ApiClient;

/// Fields accepted when creating a comment
#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub text: String,
    pub news_id: i64,
}

#[derive(Serialize)]
struct CommentUpdate<'a> {
    text: &'a str,
}

pub async fn list_by_news(client: &ApiClient, news_id: i64) -> Result<Vec<CommentItem>, ApiError> {
    client
        .send_json(client.request(Method::GET, &format!("/comments/news/{}", news_id)))
        .await
}

pub async fn create(client: &ApiClient, payload: &CommentPayload) -> Result<CommentItem, ApiError> {
    client
        .send_json(client.request(Method::POST, "/comments").json(payload))
        .await
}

pub async fn update(client: &ApiClient, id: i64, text: &str) -> Result<CommentItem, ApiError> {
    client
        .send_json(
            client
                .request(Method::PUT, &format!("/comments/{}", id))
                .json(&CommentUpdate { text }),
        )
        .await
}

pub async fn remove(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client
        .send_unit(client.request(Method::DELETE, &format!("/comments/{}", id)))
        .await
}
