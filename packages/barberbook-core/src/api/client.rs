use super::config::ApiConfig;
use crate::auth::User;
use crate::booking::{BookingConfirmation, BookingRequest};
use crate::catalog::Provider;
use crate::error::ApiError;
use crate::session::SessionStore;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// HTTP client for the Barberbook API.
///
/// Every request goes through [`authorize`] before it is sent and [`unwrap`]
/// after it returns. Failures reach the caller as-is: no retries, no token
/// refresh, and a 401 does not end the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client over a hydrated session.
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        tracing::debug!(
            "API client ready: {} (timeout {:?}, from {})",
            config.api_url,
            config.timeout,
            config.source
        );

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request against `path`, authorized with the current token.
    ///
    /// The token is read at call time, so a sign-in or sign-out is picked up
    /// by the very next request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let token = self.session.token();
        authorize(self.http.request(method, self.url(path)), token.as_deref())
    }

    pub async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!("Request failed before a response arrived: {}", e);
            ApiError::from(e)
        })?;
        unwrap(response).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn list_barbers(&self) -> Result<Vec<Provider>, ApiError> {
        let barbers: Vec<Provider> = self.get("barbers").await?;
        tracing::info!("Fetched {} barbers", barbers.len());
        Ok(barbers)
    }

    pub async fn get_barber(&self, id: u32) -> Result<Provider, ApiError> {
        self.get(&format!("barbers/{}", id)).await
    }

    pub async fn create_booking(
        &self,
        booking: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        tracing::info!(
            "Booking {} service(s) with barber {}",
            booking.service_ids.len(),
            booking.barber_id
        );
        self.post("bookings", booking).await
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("me").await
    }
}

/// Attach `Authorization: Bearer <token>` when a token is present.
///
/// Without a token the request goes out unauthenticated and the server
/// decides whether to reject it.
pub fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Return only the decoded payload of a successful response.
///
/// Non-2xx responses become [`ApiError::Status`] with the body text. An
/// empty body decodes as JSON `null`, so `()` and `Option<T>` payloads work.
pub async fn unwrap<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let url = response.url().clone();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("{} returned {}: {}", url, status, body);
        return Err(ApiError::Status { status, body });
    }

    let bytes = response.bytes().await?;
    let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };
    serde_json::from_slice(payload).map_err(|e| {
        tracing::debug!("Failed to decode response from {}: {}", url, e);
        ApiError::Decode(e)
    })
}
