use std::future::Future;

use catalog_client::{CatalogClient, CatalogError, UploadStream};
use catalog_core::{ImageFile, Product};

/// The catalog operations the controllers depend on.
///
/// Implemented by [`CatalogClient`]; tests substitute an in-memory fake.
pub trait CatalogApi: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn create(
        &self,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), CatalogError>> + Send;

    fn upload_image(&self, id: i64, file: ImageFile) -> UploadStream;
}

impl CatalogApi for CatalogClient {
    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        CatalogClient::list(self).await
    }

    async fn get(&self, id: i64) -> Result<Product, CatalogError> {
        CatalogClient::get(self, id).await
    }

    async fn create(
        &self,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<Product, CatalogError> {
        CatalogClient::create(self, name, price, image).await
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<(), CatalogError> {
        CatalogClient::update(self, id, name, price, image).await
    }

    async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        CatalogClient::delete(self, id).await
    }

    fn upload_image(&self, id: i64, file: ImageFile) -> UploadStream {
        CatalogClient::upload_image(self, id, file)
    }
}
