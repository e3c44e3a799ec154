//! In-memory collaborators for controller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use catalog_client::{CatalogError, UploadEvent, UploadStream};
use catalog_core::{ImageFile, Product};
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{oneshot, Notify};

use crate::api::CatalogApi;
use crate::collab::{Confirmer, Navigator};
use crate::preview::{PreviewError, PreviewRenderer};
use crate::route::Route;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Get(i64),
    Create {
        name: String,
        price: f64,
        image: Option<String>,
    },
    Update {
        id: i64,
        name: String,
        price: f64,
        image: Option<String>,
    },
    Delete(i64),
    Upload(i64),
}

/// Failure the fake returns instead of touching its store.
#[derive(Debug, Clone)]
pub(crate) enum Fail {
    NotFound,
    Validation(Value),
    Status(u16, Value),
}

impl Fail {
    fn to_error(&self) -> CatalogError {
        let url = "http://api.test/products".to_owned();
        match self {
            Fail::NotFound => CatalogError::NotFound { url, body: None },
            Fail::Validation(body) => CatalogError::Validation {
                status: 400,
                url,
                body: body.clone(),
            },
            Fail::Status(status, body) => CatalogError::UnexpectedStatus {
                status: *status,
                url,
                body: Some(body.clone()),
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    products: Mutex<Vec<Product>>,
    calls: Mutex<Vec<Call>>,
    fail: Mutex<Option<Fail>>,
    gate: Option<Arc<Notify>>,
    next_id: Mutex<i64>,
    upload_events: Mutex<Vec<Result<UploadEvent, Fail>>>,
    list_holds: Mutex<VecDeque<oneshot::Receiver<Vec<Product>>>>,
}

impl FakeApi {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            products: Mutex::new(products),
            next_id: Mutex::new(next_id),
            ..Self::default()
        }
    }

    /// Every call waits on `gate` before answering.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn fail_with(&self, fail: Fail) {
        *self.fail.lock().unwrap() = Some(fail);
    }

    pub(crate) fn succeed(&self) {
        *self.fail.lock().unwrap() = None;
    }

    pub(crate) fn script_upload(&self, events: Vec<Result<UploadEvent, Fail>>) {
        *self.upload_events.lock().unwrap() = events;
    }

    /// Queues a held `list` reply: the next `list` call answers with
    /// whatever is sent on the returned channel.
    pub(crate) fn hold_list(&self) -> oneshot::Sender<Vec<Product>> {
        let (tx, rx) = oneshot::channel();
        self.list_holds.lock().unwrap().push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    async fn enter(&self, call: Call) -> Result<(), CatalogError> {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.fail.lock().unwrap().as_ref() {
            Some(fail) => Err(fail.to_error()),
            None => Ok(()),
        }
    }
}

impl CatalogApi for FakeApi {
    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let hold = self.list_holds.lock().unwrap().pop_front();
        if let Some(rx) = hold {
            self.calls.lock().unwrap().push(Call::List);
            return Ok(rx.await.unwrap_or_default());
        }
        self.enter(Call::List).await?;
        Ok(self.products())
    }

    async fn get(&self, id: i64) -> Result<Product, CatalogError> {
        self.enter(Call::Get(id)).await?;
        self.products()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Fail::NotFound.to_error())
    }

    async fn create(
        &self,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<Product, CatalogError> {
        self.enter(Call::Create {
            name: name.to_owned(),
            price,
            image: image.map(|f| f.file_name.clone()),
        })
        .await?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = *next;
            *next += 1;
            id
        };
        let product = Product {
            id,
            name: name.to_owned(),
            price,
            image_url: image.map(|f| format!("http://api.test/uploads/{}", f.file_name)),
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<(), CatalogError> {
        self.enter(Call::Update {
            id,
            name: name.to_owned(),
            price,
            image: image.map(|f| f.file_name.clone()),
        })
        .await?;
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Fail::NotFound.to_error())?;
        product.name = name.to_owned();
        product.price = price;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        self.enter(Call::Delete(id)).await?;
        self.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    fn upload_image(&self, id: i64, _file: ImageFile) -> UploadStream {
        self.calls.lock().unwrap().push(Call::Upload(id));
        let events: Vec<_> = self
            .upload_events
            .lock()
            .unwrap()
            .drain(..)
            .map(|e| e.map_err(|f| f.to_error()))
            .collect();
        stream::iter(events).boxed()
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

impl<T: Navigator> Navigator for Arc<T> {
    fn navigate(&self, route: Route) {
        (**self).navigate(route);
    }
}

/// Answers every prompt with a fixed reply and records the prompts.
pub(crate) struct FixedConfirmer {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FixedConfirmer {
    pub(crate) fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmer for FixedConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.answer
    }
}

impl<T: Confirmer> Confirmer for Arc<T> {
    async fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt).await
    }
}

impl<T: CatalogApi> CatalogApi for Arc<T> {
    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        (**self).list().await
    }

    async fn get(&self, id: i64) -> Result<Product, CatalogError> {
        (**self).get(id).await
    }

    async fn create(
        &self,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<Product, CatalogError> {
        (**self).create(name, price, image).await
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        image: Option<&ImageFile>,
    ) -> Result<(), CatalogError> {
        (**self).update(id, name, price, image).await
    }

    async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        (**self).delete(id).await
    }

    fn upload_image(&self, id: i64, file: ImageFile) -> UploadStream {
        (**self).upload_image(id, file)
    }
}

/// Renders `preview:<file name>`, optionally holding a file's render until
/// its release channel fires.
#[derive(Default)]
pub(crate) struct ControlledRenderer {
    holds: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl ControlledRenderer {
    pub(crate) fn hold(&self, file_name: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds.lock().unwrap().insert(file_name.to_owned(), rx);
        tx
    }
}

impl PreviewRenderer for ControlledRenderer {
    async fn render(&self, file: &ImageFile) -> Result<String, PreviewError> {
        let hold = self.holds.lock().unwrap().remove(&file.file_name);
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        Ok(format!("preview:{}", file.file_name))
    }
}

pub(crate) fn product(id: i64, name: &str, price: f64, image_url: Option<&str>) -> Product {
    Product {
        id,
        name: name.to_owned(),
        price,
        image_url: image_url.map(str::to_owned),
    }
}

pub(crate) fn bad_request() -> Fail {
    Fail::Validation(json!({"title": "Bad Request", "errors": {"name": ["required"]}}))
}
