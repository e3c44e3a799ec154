//! View-layer cores for the catalog manager.
//!
//! The controllers own plain state that a rendering layer can snapshot and
//! bind to; routing, confirmation prompts and preview rendering are injected
//! through the traits in [`collab`] and [`preview`].

pub mod api;
pub mod collab;
pub mod form;
pub mod list;
pub mod preview;
pub mod route;
pub mod validate;

#[cfg(test)]
mod testing;

pub use api::CatalogApi;
pub use collab::{Confirmer, Navigator};
pub use form::{FormController, FormDraft, FormError, FormPhase, FormState};
pub use list::{ListController, ListError, ListPhase, ListState, RemoveOutcome};
pub use preview::{data_url, DataUrlRenderer, PreviewError, PreviewRenderer};
pub use route::Route;
pub use validate::{validate, ClientValidationError, Field, ValidInput};
