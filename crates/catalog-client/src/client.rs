//! HTTP client for the remote products API.
//!
//! Maps catalog operations onto `<api_base>/products` requests, classifies
//! failed responses into [`CatalogError`] variants, and qualifies every
//! returned `imageUrl` against the configured base.

use std::time::Duration;

use catalog_core::{AppConfig, ImageFile, Product};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CatalogError;
use crate::normalize::qualify_image_url;
use crate::parts::{into_form, product_parts};

const DEFAULT_UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Which failure classes an endpoint distinguishes beyond plain transport errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StatusPolicy {
    pub(crate) not_found: bool,
    pub(crate) field_errors: bool,
}

impl StatusPolicy {
    pub(crate) const LIST: Self = Self {
        not_found: false,
        field_errors: false,
    };
    pub(crate) const ITEM: Self = Self {
        not_found: true,
        field_errors: false,
    };
    pub(crate) const CREATE: Self = Self {
        not_found: false,
        field_errors: true,
    };
    pub(crate) const UPDATE: Self = Self {
        not_found: true,
        field_errors: true,
    };
}

/// Client for the products CRUD API.
///
/// Use [`CatalogClient::from_config`] in the binary or
/// [`CatalogClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    products_url: String,
    pub(crate) upload_chunk_bytes: usize,
}

impl CatalogClient {
    /// Creates a client rooted at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `api_base` is not an
    /// absolute URL, or [`CatalogError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(api_base: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        let trimmed = api_base.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: api_base.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl {
                base_url: api_base.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_base: trimmed.to_owned(),
            products_url: format!("{trimmed}/products"),
            upload_chunk_bytes: DEFAULT_UPLOAD_CHUNK_BYTES,
        })
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        Ok(
            Self::new(
                &config.api_base_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?
            .with_upload_chunk_bytes(config.upload_chunk_bytes),
        )
    }

    /// Sets the body chunk size used by [`CatalogClient::upload_image`].
    /// Zero is clamped to one byte.
    #[must_use]
    pub fn with_upload_chunk_bytes(mut self, bytes: usize) -> Self {
        self.upload_chunk_bytes = bytes.max(1);
        self
    }

    /// The configured API root, without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetches the whole catalog in server order.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`] on network failure.
    /// - [`CatalogError::UnexpectedStatus`] on any non-2xx status.
    /// - [`CatalogError::Deserialize`] if the body is not a product array.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.products_url.clone();
        tracing::debug!(%url, "listing products");
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &url, StatusPolicy::LIST).await?;
        let products: Vec<Product> = read_json(response, "list products").await?;
        Ok(products
            .into_iter()
            .map(|p| qualify_image_url(p, &self.api_base))
            .collect())
    }

    /// Fetches one product by id.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] when the server answers 404.
    /// - [`CatalogError::Http`] / [`CatalogError::UnexpectedStatus`] otherwise.
    /// - [`CatalogError::Deserialize`] if the body is not a product.
    pub async fn get(&self, id: i64) -> Result<Product, CatalogError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "fetching product");
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &url, StatusPolicy::ITEM).await?;
        let product: Product = read_json(response, &format!("get product {id}")).await?;
        Ok(qualify_image_url(product, &self.api_base))
    }

    /// Creates a product with a single multipart request.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`] on a 4xx carrying field errors.
    /// - [`CatalogError::Http`] / [`CatalogError::UnexpectedStatus`] otherwise.
    /// - [`CatalogError::Deserialize`] if the body is not a product.
    pub async fn create(
        &self,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<Product, CatalogError> {
        let url = self.products_url.clone();
        let form = into_form(product_parts(name, price, image))?;
        tracing::debug!(%url, has_image = image.is_some(), "creating product");
        let response = self.client.post(&url).multipart(form).send().await?;
        let response = check_status(response, &url, StatusPolicy::CREATE).await?;
        let product: Product = read_json(response, "create product").await?;
        Ok(qualify_image_url(product, &self.api_base))
    }

    /// Replaces a product's name, price and optionally its image.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] when the server answers 404.
    /// - [`CatalogError::Validation`] on a 4xx carrying field errors.
    /// - [`CatalogError::Http`] / [`CatalogError::UnexpectedStatus`] otherwise.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<(), CatalogError> {
        let url = self.item_url(id);
        let form = into_form(product_parts(name, price, image))?;
        tracing::debug!(%url, has_image = image.is_some(), "updating product");
        let response = self.client.put(&url).multipart(form).send().await?;
        check_status(response, &url, StatusPolicy::UPDATE).await?;
        Ok(())
    }

    /// Deletes a product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] when the server answers 404.
    /// - [`CatalogError::Http`] / [`CatalogError::UnexpectedStatus`] otherwise.
    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "deleting product");
        let response = self.client.delete(&url).send().await?;
        check_status(response, &url, StatusPolicy::ITEM).await?;
        Ok(())
    }

    pub(crate) fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.products_url)
    }
}

/// Passes 2xx responses through and converts everything else into a
/// classified [`CatalogError`], capturing the error body.
pub(crate) async fn check_status(
    response: Response,
    url: &str,
    policy: StatusPolicy,
) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // A body that cannot be read is treated as absent; the status still classifies.
    let body = response.text().await.ok().and_then(|t| parse_body(&t));
    Err(classify_failure(status, url, body, policy))
}

pub(crate) fn classify_failure(
    status: StatusCode,
    url: &str,
    body: Option<Value>,
    policy: StatusPolicy,
) -> CatalogError {
    if policy.not_found && status == StatusCode::NOT_FOUND {
        return CatalogError::NotFound {
            url: url.to_owned(),
            body,
        };
    }

    if policy.field_errors && status.is_client_error() {
        if let Some(body) = body.as_ref().filter(|b| has_field_errors(b)) {
            return CatalogError::Validation {
                status: status.as_u16(),
                url: url.to_owned(),
                body: body.clone(),
            };
        }
    }

    CatalogError::UnexpectedStatus {
        status: status.as_u16(),
        url: url.to_owned(),
        body,
    }
}

fn has_field_errors(body: &Value) -> bool {
    body.get("errors").is_some_and(Value::is_object)
}

/// Decodes a response body: JSON when it parses, the raw text otherwise,
/// `None` when empty.
pub(crate) fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned())))
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, CatalogError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| CatalogError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
