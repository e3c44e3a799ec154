//! Catalog list controller: load, delete-with-confirmation, and navigation
//! to the form views.

use std::sync::{Mutex, MutexGuard, PoisonError};

use catalog_client::{to_message, CatalogError};
use catalog_core::Product;
use thiserror::Error;

use crate::api::CatalogApi;
use crate::collab::{Confirmer, Navigator};
use crate::route::Route;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub phase: ListPhase,
    /// Products in server order.
    pub products: Vec<Product>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Declined,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("{message}")]
    Server {
        message: String,
        #[source]
        source: CatalogError,
    },

    #[error("list was disposed or reloaded before the request completed")]
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    view: ListState,
    epoch: u64,
    disposed: bool,
}

pub struct ListController<A, N, C> {
    api: A,
    navigator: N,
    confirmer: C,
    inner: Mutex<Inner>,
}

impl<A, N, C> ListController<A, N, C>
where
    A: CatalogApi,
    N: Navigator,
    C: Confirmer,
{
    pub fn new(api: A, navigator: N, confirmer: C) -> Self {
        Self {
            api,
            navigator,
            confirmer,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> ListState {
        self.lock().view.clone()
    }

    /// Loads the catalog. A failure leaves an empty list and an inline error.
    /// Only the most recently started load is applied.
    ///
    /// # Errors
    ///
    /// - [`ListError::Server`] if the catalog could not be fetched.
    /// - [`ListError::Stale`] if the controller was disposed or a newer load
    ///   started meanwhile.
    pub async fn load(&self) -> Result<(), ListError> {
        let epoch = {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.view.phase = ListPhase::Loading;
            inner.view.error = None;
            inner.epoch
        };

        let result = self.api.list().await;

        let mut inner = self.lock();
        if inner.disposed || inner.epoch != epoch {
            tracing::debug!("discarding superseded products load");
            return Err(ListError::Stale);
        }
        match result {
            Ok(products) => {
                inner.view.products = products;
                inner.view.phase = ListPhase::Loaded;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "products load failed");
                let message = format!("Failed to load products: {}", to_message(&e.failure()));
                inner.view.products.clear();
                inner.view.error = Some(message.clone());
                inner.view.phase = ListPhase::Failed;
                Err(ListError::Server { message, source: e })
            }
        }
    }

    /// Asks for confirmation, then deletes `product` and drops it from the
    /// held list by id. Declining sends nothing.
    ///
    /// # Errors
    ///
    /// - [`ListError::Server`] if the delete request fails; the list is kept.
    /// - [`ListError::Stale`] if the controller was disposed meanwhile.
    pub async fn remove(&self, product: &Product) -> Result<RemoveOutcome, ListError> {
        let prompt = format!("Delete product: {}?", product.name);
        if !self.confirmer.confirm(&prompt).await {
            return Ok(RemoveOutcome::Declined);
        }

        let result = self.api.delete(product.id).await;

        let mut inner = self.lock();
        if inner.disposed {
            return Err(ListError::Stale);
        }
        match result {
            Ok(()) => {
                inner.view.products.retain(|p| p.id != product.id);
                Ok(RemoveOutcome::Removed)
            }
            Err(e) => {
                tracing::error!(id = product.id, error = %e, "product delete failed");
                let message = to_message(&e.failure());
                inner.view.error = Some(message.clone());
                Err(ListError::Server { message, source: e })
            }
        }
    }

    pub fn add(&self) {
        self.navigator.navigate(Route::Create);
    }

    pub fn edit(&self, product: &Product) {
        self.navigator.navigate(Route::Edit(product.id));
    }

    /// Marks the controller torn down; in-flight completions become no-ops.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.disposed = true;
        inner.epoch += 1;
    }
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
