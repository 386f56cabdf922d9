//! Thin REST clients for the off-chain services the library depends on:
//! handle-to-ID lookup and the OTP registration/authorization flow.

use crate::error::Error;

pub mod otp;
pub mod twitter;

pub use otp::{AuthorizationApi, CheckPaymentResponse, CreateOtpResponse, ValidateOtpResponse};
pub use twitter::{HttpTwitterLookup, TwitterLookup};

/// Default base URL of the hosted API.
pub const DEFAULT_API_BASE: &str = "https://www.idriss.xyz";

/// Pull the `message` field out of an error body, falling back to raw text.
pub(crate) async fn error_message(response: reqwest::Response) -> (u16, String) {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| {
            body.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or(text);
    (status, message)
}

/// Turn a non-success response into [`Error::RemoteService`].
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    let (status, message) = error_message(response).await;
    Err(Error::RemoteService { status, message })
}
