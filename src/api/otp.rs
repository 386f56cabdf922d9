//! OTP registration and authorization flow.
//!
//! Registering an identifier requires proving ownership through a one-time
//! password delivered out of band. This client wraps the three calls of that
//! flow; the server carries all state, keyed by `session_key`.

use crate::api::{self, DEFAULT_API_BASE};
use crate::error::Error;
use serde::Deserialize;
use std::time::Duration;

/// Error-body message the service returns for a wrong one-time password.
const WRONG_OTP_SENTINEL: &str = "Validation failed";

/// Client for the hosted authorization service.
pub struct AuthorizationApi {
    http: reqwest::Client,
    base_url: String,
}

/// Response to starting an OTP session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOtpResponse {
    pub session_key: String,
    pub tries_left: u32,
    pub address: Option<String>,
    pub hash: Option<String>,
    pub message: Option<String>,
    pub next_step: Option<String>,
    pub twitter_id: Option<String>,
    pub twitter_msg: Option<String>,
}

/// Response to a successful OTP validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateOtpResponse {
    pub message: Option<String>,
    pub session_key: Option<String>,
    #[serde(rename = "pricePOL")]
    pub price_pol: Option<serde_json::Value>,
    #[serde(rename = "priceETH")]
    pub price_eth: Option<serde_json::Value>,
    #[serde(rename = "priceBNB")]
    pub price_bnb: Option<serde_json::Value>,
    #[serde(rename = "receiptID")]
    pub receipt_id: Option<String>,
    pub gas: Option<serde_json::Value>,
}

/// Response to a registration payment status poll.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckPaymentResponse {
    pub message: Option<String>,
    pub txn_hash: Option<String>,
    pub session_key: Option<String>,
    #[serde(rename = "referralLink")]
    pub referral_link: Option<String>,
}

impl AuthorizationApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn hosted() -> Result<Self, Error> {
        Self::new(DEFAULT_API_BASE)
    }

    /// Start an OTP session for registering `identifier` under `tag`.
    pub async fn create_otp(
        &self,
        tag: &str,
        identifier: &str,
        address: &str,
        secret_word: Option<&str>,
    ) -> Result<CreateOtpResponse, Error> {
        let mut params = vec![
            ("tag", tag),
            ("identifier", identifier),
            ("address", address),
        ];
        if let Some(word) = secret_word {
            params.push(("secretWord", word));
        }
        let response = self
            .http
            .get(format!("{}/v1/createOTP", self.base_url))
            .query(&params)
            .send()
            .await?;
        let response = api::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Submit the received one-time password.
    ///
    /// A rejected password surfaces as [`Error::WrongOtp`] so callers can
    /// prompt for re-entry; other failures are generic remote errors.
    pub async fn validate_otp(
        &self,
        otp: &str,
        session_key: &str,
    ) -> Result<ValidateOtpResponse, Error> {
        let response = self
            .http
            .post(format!("{}/v1/validateOTP", self.base_url))
            .query(&[("OTP", otp), ("session_key", session_key)])
            .send()
            .await?;
        if !response.status().is_success() {
            let (status, message) = api::error_message(response).await;
            if message == WRONG_OTP_SENTINEL {
                return Err(Error::WrongOtp(message));
            }
            return Err(Error::RemoteService { status, message });
        }
        Ok(response.json().await?)
    }

    /// Poll whether the registration payment went through.
    pub async fn check_payment(
        &self,
        token: &str,
        session_key: &str,
    ) -> Result<CheckPaymentResponse, Error> {
        let response = self
            .http
            .get(format!("{}/v1/checkPayment", self.base_url))
            .query(&[("token", token), ("session_key", session_key)])
            .send()
            .await?;
        let response = api::check_status(response).await?;
        Ok(response.json().await?)
    }
}
