// Identity endpoints

use reqwest::Method;

use crate::auth::{LoginRequest, LogoutRequest, RegisterRequest, SessionInfo, TokenPair, UserProfile};
use crate::error::ApiError;
use crate::transport::ApiClient;

/// Exchange credentials for a token pair
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<TokenPair, ApiError> {
    let body = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    client
        .send_json(client.request(Method::POST, "/auth/login").json(&body))
        .await
}

/// Create an account and receive its first token pair
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<TokenPair, ApiError> {
    let body = RegisterRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    client
        .send_json(client.request(Method::POST, "/auth/register").json(&body))
        .await
}

/// Fetch the identity behind the current access token
pub async fn me(client: &ApiClient) -> Result<UserProfile, ApiError> {
    client.send_json(client.request(Method::GET, "/auth/me")).await
}

/// List active refresh sessions for the account
pub async fn sessions(client: &ApiClient) -> Result<Vec<SessionInfo>, ApiError> {
    client
        .send_json(client.request(Method::GET, "/auth/sessions"))
        .await
}

/// Invalidate one refresh token server-side
pub async fn logout(client: &ApiClient, refresh_token: &str) -> Result<(), ApiError> {
    let body = LogoutRequest {
        refresh_token: refresh_token.to_string(),
    };
    client
        .send_unit(client.request(Method::POST, "/auth/logout").json(&body))
        .await
}

/// Invalidate every refresh token tied to the account
pub async fn logout_all(client: &ApiClient) -> Result<(), ApiError> {
    client
        .send_unit(client.request(Method::DELETE, "/auth/sessions"))
        .await
}
