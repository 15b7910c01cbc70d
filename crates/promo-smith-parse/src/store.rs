//! [`PromoStore`] over the Parse REST API.
//!
//! - `exists` is a `GET /classes/{class}` with `where={"promoCodeId": ...}`
//!   and `limit=1`.
//! - `insert` is a `POST /classes/{class}` with the record as the body.
//!
//! Parse does not enforce uniqueness of `promoCodeId` unless a unique index
//! was added to the class. When it was, a conflicting insert comes back as
//! error code 137 and is reported as [`StoreError::Duplicate`].

use crate::error::store_error;
use crate::{DUPLICATE_VALUE_CODE, ParseConfig, ParseError};
use promo_smith::{AllocationRecord, PromoStore, StoreError};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

const APP_ID_HEADER: &str = "X-Parse-Application-Id";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
}

/// A [`PromoStore`] talking to a Parse server.
#[derive(Debug, Clone)]
pub struct ParseStore {
    http: Client,
    collection_url: String,
}

impl ParseStore {
    /// Builds a client carrying the application id and access key headers.
    ///
    /// # Errors
    /// [`ParseError::InvalidHeader`] if a configured value is not a valid
    /// header value, [`ParseError::Client`] if the TLS backend fails to
    /// initialize.
    pub fn new(config: &ParseConfig) -> Result<Self, ParseError> {
        let http = Client::builder()
            .default_headers(headers(config)?)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            collection_url: config.collection_url(),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }
}

fn headers(config: &ParseConfig) -> Result<HeaderMap, ParseError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    insert_header(&mut headers, APP_ID_HEADER, &config.app_id, false)?;

    match &config.credential {
        Some(credential) => {
            insert_header(&mut headers, credential.header_name(), credential.secret(), true)?;
        }
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!("no Parse access key configured, sending application id only");
        }
    }

    Ok(headers)
}

fn insert_header(
    headers: &mut HeaderMap,
    header: &'static str,
    value: &str,
    sensitive: bool,
) -> Result<(), ParseError> {
    let invalid = || ParseError::InvalidHeader { header };
    let name = HeaderName::from_bytes(header.as_bytes()).map_err(|_| invalid())?;
    let mut value = HeaderValue::from_str(value).map_err(|_| invalid())?;
    value.set_sensitive(sensitive);
    headers.insert(name, value);
    Ok(())
}

/// Turns a non-success response into a [`StoreError`].
async fn status_error(response: Response, code: &str) -> StoreError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => return store_error(&err),
    };

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            code: DUPLICATE_VALUE_CODE,
        }) => StoreError::Duplicate {
            code: code.to_string(),
        },
        _ => StoreError::Status { status, body },
    }
}

impl PromoStore for ParseStore {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    async fn exists(&self, promo_code_id: &str) -> Result<bool, StoreError> {
        let filter = serde_json::json!({ "promoCodeId": promo_code_id }).to_string();
        let response = self
            .http
            .get(&self.collection_url)
            .query(&[("where", filter.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|err| store_error(&err))?;

        if !response.status().is_success() {
            return Err(status_error(response, promo_code_id).await);
        }

        let parsed: QueryResponse = response.json().await.map_err(|err| store_error(&err))?;
        Ok(parsed.results.is_some_and(|results| !results.is_empty()))
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip_all, fields(code = %record.promo_code_id))
    )]
    async fn insert(&self, record: &AllocationRecord) -> Result<(), StoreError> {
        let response = self
            .http
            .post(&self.collection_url)
            .json(record)
            .send()
            .await
            .map_err(|err| store_error(&err))?;

        if !response.status().is_success() {
            return Err(status_error(response, &record.promo_code_id).await);
        }
        Ok(())
    }
}
