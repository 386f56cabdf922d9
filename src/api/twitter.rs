//! Handle-to-ID lookup.
//!
//! Registered @handles are stored under their numeric platform ID, which
//! survives handle renames. The lookup service maps in both directions; the
//! "Not found" sentinel in responses is translated to `None`.

use crate::api::{self, DEFAULT_API_BASE};
use crate::error::Error;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const NOT_FOUND_SENTINEL: &str = "Not found";

/// Resolution between @handles and numeric platform IDs.
#[async_trait]
pub trait TwitterLookup: Send + Sync {
    /// Numeric platform ID for an @handle, or `None` when unknown.
    async fn id_for_handle(&self, handle: &str) -> Result<Option<String>, Error>;

    /// Current @handle for a numeric platform ID, or `None`.
    async fn handle_for_id(&self, id: &str) -> Result<Option<String>, Error>;
}

/// Lookup backed by the hosted REST service.
pub struct HttpTwitterLookup {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TwitterIdResponse {
    #[serde(rename = "twitterID")]
    twitter_id: String,
}

#[derive(Deserialize)]
struct TwitterNamesResponse {
    #[serde(rename = "twitterNames")]
    twitter_names: HashMap<String, String>,
}

impl HttpTwitterLookup {
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
}

#[async_trait]
impl TwitterLookup for HttpTwitterLookup {
    async fn id_for_handle(&self, handle: &str) -> Result<Option<String>, Error> {
        let response = self
            .http
            .get(format!("{}/v1/getTwitterID", self.base_url))
            .query(&[("identifier", handle)])
            .send()
            .await?;
        let response = api::check_status(response).await?;
        let body: TwitterIdResponse = response.json().await?;
        if body.twitter_id == NOT_FOUND_SENTINEL {
            Ok(None)
        } else {
            Ok(Some(body.twitter_id))
        }
    }

    async fn handle_for_id(&self, id: &str) -> Result<Option<String>, Error> {
        let response = self
            .http
            .get(format!("{}/v1/getTwitterNames", self.base_url))
            .query(&[("ids", id)])
            .send()
            .await?;
        let response = api::check_status(response).await?;
        let body: TwitterNamesResponse = response.json().await?;
        Ok(body.twitter_names.get(id).cloned())
    }
}
