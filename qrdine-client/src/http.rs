//! HTTP client for network-based API calls
//!
//! Typed wrapper over `reqwest` for the ordering backend's REST surface.
//! The bearer token is pulled from the injected [`TokenProvider`] per
//! request, so authenticated and anonymous calls share one client.

use crate::auth::TokenProvider;
use crate::error::{ClientError, ClientResult};
use crate::ClientConfig;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdatePasswordRequest,
};
use shared::models::order::CreateOrderRequest;
use shared::models::suggestion::SuggestionRequest;
use shared::{BankAccount, MealSuggestion, OrderDetail, Product, Promotion};
use std::sync::Arc;

/// Rating to submit for a completed order
#[derive(Debug, Clone)]
pub struct RatingSubmission {
    /// 1-5
    pub stars: u8,
    pub comment: Option<String>,
    pub photo: Option<RatingPhoto>,
}

/// Optional photo attached to a rating
#[derive(Debug, Clone)]
pub struct RatingPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for making network requests to the ordering backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token_provider: config.token_provider.clone(),
        }
    }

    /// Set the bearer token source
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token_provider
            .as_ref()
            .and_then(|p| p.bearer_token())
            .map(|t| format!("Bearer {}", t))
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request whose response body is irrelevant
    async fn post_discard<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let mut request = self.client.post(self.url(path)).json(body);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Map a non-2xx response to the error taxonomy, passing the backend's
    /// error string through for the translation layer.
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Backend(text),
        })
    }

    /// Handle the HTTP response, decoding the body into `T`.
    /// A body that does not match `T` is a decode error, not a silent
    /// partial value.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    // ========== Menu API ==========

    /// Fetch the full product catalog
    pub async fn get_all_products(&self) -> ClientResult<Vec<Product>> {
        self.get("menu/products/getAll").await
    }

    /// Fetch products in one category
    pub async fn get_products_by_category(&self, category_id: i64) -> ClientResult<Vec<Product>> {
        self.get(&format!("menu/products/category/{}", category_id))
            .await
    }

    // ========== Order API ==========

    /// Place an order for the current table session
    pub async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<OrderDetail> {
        self.post("orders/create", request).await
    }

    /// Fetch one order's current state
    pub async fn get_order(&self, order_id: i64) -> ClientResult<OrderDetail> {
        self.get(&format!("orders/{}", order_id)).await
    }

    // ========== Auth API ==========

    /// Register a customer account
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.post("auth/client-register", request).await
    }

    /// Sign in. Role gating happens in the auth store, not here.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.post("auth/login", request).await
    }

    /// Fetch the signed-in customer's order history
    pub async fn get_user_orders(&self, user_id: i64) -> ClientResult<Vec<OrderDetail>> {
        self.get(&format!("auth/orders/{}", user_id)).await
    }

    /// Change the signed-in customer's password
    pub async fn update_password(&self, request: &UpdatePasswordRequest) -> ClientResult<()> {
        self.post_discard("auth/update-password", request).await
    }

    // ========== Payment API ==========

    /// Fetch the bank account shown for transfer payments.
    ///
    /// The endpoint has been observed returning either a single object or
    /// an array; both are accepted. Anything that is not ACTIVE is
    /// rejected here so callers never display a disabled account.
    pub async fn get_active_bank_account(&self) -> ClientResult<BankAccount> {
        let value: serde_json::Value = self.get("banks/active").await?;

        let raw = match value {
            serde_json::Value::Array(mut items) => {
                if items.is_empty() {
                    return Err(ClientError::NotFound("no bank account configured".into()));
                }
                items.remove(0)
            }
            other => other,
        };

        let account: BankAccount = serde_json::from_value(raw)
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if !account.is_active() {
            tracing::warn!(status = %account.status, "Bank account is not active");
            return Err(ClientError::InvalidResponse(
                "bank account is not active".to_string(),
            ));
        }
        Ok(account)
    }

    // ========== Promotion API ==========

    /// Fetch currently active promotions for the client-side pre-check
    pub async fn get_active_promotions(&self) -> ClientResult<Vec<Promotion>> {
        self.get("promotions/active").await
    }

    // ========== Assistant API ==========

    /// Ask the backend assistant for a meal suggestion. Best-effort; see
    /// [`crate::suggest`] for the catalog fallback callers must apply.
    pub async fn get_meal_suggestion(&self, user_demand: &str) -> ClientResult<MealSuggestion> {
        let request = SuggestionRequest {
            user_demand: user_demand.to_string(),
        };
        self.post("ai/suggestion", &request).await
    }

    // ========== Rating API ==========

    /// Submit a rating for a completed order (multipart, authenticated)
    pub async fn submit_rating(
        &self,
        order_id: i64,
        rating: &RatingSubmission,
    ) -> ClientResult<()> {
        let mut form = reqwest::multipart::Form::new().text("stars", rating.stars.to_string());
        if let Some(comment) = &rating.comment {
            form = form.text("comment", comment.clone());
        }
        if let Some(photo) = &rating.photo {
            let part = reqwest::multipart::Part::bytes(photo.bytes.clone())
                .file_name(photo.file_name.clone())
                .mime_str(&photo.content_type)?;
            form = form.part("photo", part);
        }

        let mut request = self
            .client
            .post(self.url(&format!("ratings/{}", order_id)))
            .multipart(form);

        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        Self::check_status(response).await.map(|_| ())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("token_provider", &self.token_provider.is_some())
            .finish()
    }
}
