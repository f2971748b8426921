//! HTTP client for a jsonblob-style document store.
//!
//! # Responsibilities
//! - Create empty documents (`POST <base>`, location from `Location` header)
//! - Fetch documents (`GET <base>/<id>`)
//! - Replace documents (`PUT <base>/<id>`)
//! - Bound every call with a timeout and check response status

use reqwest::header::{HeaderValue, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use url::{Host, Url};

use crate::observability::metrics;
use crate::store::types::{DocumentStore, StoreError, StoreResult};
use crate::watchlist::WatchList;

const APPLICATION_JSON: &str = "application/json";

/// Document store client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct JsonBlobStore {
    client: Client,
    base: Url,
}

impl JsonBlobStore {
    /// Create a client for the store at `base`.
    ///
    /// Loopback stores are always reached directly, bypassing any proxy
    /// configured in the environment.
    pub fn new(base: Url, timeout: Duration) -> StoreResult<Self> {
        let mut builder = Client::builder().timeout(timeout);
        if is_loopback(&base) {
            builder = builder.no_proxy();
        }
        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    async fn create_inner(&self) -> StoreResult<Url> {
        let response = self
            .client
            .post(self.base.clone())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .body("{}")
            .send()
            .await?;
        let response = check_status(response)?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(StoreError::MissingLocation)?;

        // Relative locations resolve against the collection endpoint.
        self.base
            .join(location)
            .map_err(|_| StoreError::MissingLocation)
    }

    async fn fetch_inner(&self, url: &Url) -> StoreResult<WatchList> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, APPLICATION_JSON)
            .send()
            .await?;
        let body = check_status(response)?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn replace_inner(&self, url: &Url, list: &WatchList) -> StoreResult<()> {
        let body = serde_json::to_vec(list)?;
        let response = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(CONTENT_LENGTH, HeaderValue::from(body.len()))
            .body(body)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        None => false,
    }
}

fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Status(status))
    }
}

fn observe<T>(operation: &'static str, start: Instant, result: &StoreResult<T>) {
    match result {
        Ok(_) => {
            tracing::debug!(operation, elapsed = ?start.elapsed(), "Store call succeeded");
        }
        Err(e) => {
            tracing::warn!(operation, elapsed = ?start.elapsed(), error = %e, "Store call failed");
        }
    }
    metrics::record_store_call(operation, result.is_ok(), start);
}

impl DocumentStore for JsonBlobStore {
    async fn create(&self) -> StoreResult<Url> {
        let start = Instant::now();
        let result = self.create_inner().await;
        observe("create", start, &result);
        result
    }

    async fn fetch(&self, url: &Url) -> StoreResult<WatchList> {
        let start = Instant::now();
        let result = self.fetch_inner(url).await;
        observe("fetch", start, &result);
        result
    }

    async fn replace(&self, url: &Url, list: &WatchList) -> StoreResult<()> {
        let start = Instant::now();
        let result = self.replace_inner(url, list).await;
        observe("replace", start, &result);
        result
    }
}
