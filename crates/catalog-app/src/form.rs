//! Create/edit form controller.
//!
//! Phases: `Idle → Creating` for a blank form, `Idle → Loading → Editing`
//! when an id is supplied, `Creating|Editing|Failed → Saving → Idle` on a
//! successful save (with navigation back to the list) or `Saving → Failed`
//! with the draft retained.
//!
//! All methods take `&self`; state sits behind a mutex that is never held
//! across an await. Each `enter`/`cancel`/`dispose` bumps an epoch, and
//! completions carrying an older epoch are dropped instead of applied.

use std::sync::{Mutex, MutexGuard, PoisonError};

use catalog_client::{to_message, CatalogError, UploadEvent};
use catalog_core::ImageFile;
use futures::StreamExt;
use thiserror::Error;

use crate::api::CatalogApi;
use crate::collab::Navigator;
use crate::preview::{DataUrlRenderer, PreviewRenderer};
use crate::route::Route;
use crate::validate::{validate, ClientValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Loading,
    Creating,
    Editing,
    Saving,
    Failed,
}

/// In-progress, unsaved field values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub name: String,
    /// Raw price text as typed; parsed only on save.
    pub price: String,
    /// File chosen for upload with the next save.
    pub image_file: Option<ImageFile>,
    /// Data URL of `image_file`, or the stored image URL when editing.
    pub preview: Option<String>,
}

/// Snapshot of everything a view binds to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub id: Option<i64>,
    pub phase: FormPhase,
    pub draft: FormDraft,
    /// Set once a save attempt failed local validation.
    pub touched: bool,
    pub error: Option<String>,
    pub uploading: bool,
    /// Standalone upload progress, 0–100.
    pub progress: u8,
}

impl FormState {
    #[must_use]
    pub fn saving(&self) -> bool {
        self.phase == FormPhase::Saving
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ClientValidationError),

    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("an image upload is already in progress")]
    UploadInProgress,

    #[error("no product is bound to the form")]
    NoProduct,

    #[error("{message}")]
    Server {
        message: String,
        #[source]
        source: CatalogError,
    },

    #[error("image upload ended before the server confirmed it")]
    UploadIncomplete,

    #[error("form was reset before the request completed")]
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    view: FormState,
    epoch: u64,
    preview_seq: u64,
    disposed: bool,
}

impl Inner {
    fn is_current(&self, epoch: u64) -> bool {
        !self.disposed && self.epoch == epoch
    }

    fn reset(&mut self) {
        self.epoch += 1;
        self.preview_seq += 1;
        self.view = FormState::default();
    }
}

pub struct FormController<A, N, R = DataUrlRenderer> {
    api: A,
    navigator: N,
    renderer: R,
    inner: Mutex<Inner>,
}

impl<A, N, R> FormController<A, N, R>
where
    A: CatalogApi,
    N: Navigator,
    R: PreviewRenderer,
{
    pub fn new(api: A, navigator: N, renderer: R) -> Self {
        Self {
            api,
            navigator,
            renderer,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state for rendering.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.lock().view.clone()
    }

    /// Starts a blank form (`id == None`) or loads product `id` for editing.
    ///
    /// # Errors
    ///
    /// - [`FormError::Server`] if the product could not be fetched; the
    ///   phase becomes [`FormPhase::Failed`] with the message in `error`.
    /// - [`FormError::Stale`] if the form was reset while loading.
    pub async fn enter(&self, id: Option<i64>) -> Result<(), FormError> {
        let (epoch, id) = {
            let mut inner = self.lock();
            inner.reset();
            let Some(id) = id else {
                inner.view.phase = FormPhase::Creating;
                return Ok(());
            };
            inner.view.id = Some(id);
            inner.view.phase = FormPhase::Loading;
            (inner.epoch, id)
        };

        let result = self.api.get(id).await;

        let mut inner = self.lock();
        if !inner.is_current(epoch) {
            return Err(FormError::Stale);
        }
        match result {
            Ok(product) => {
                let view = &mut inner.view;
                view.draft.name = product.name;
                view.draft.price = product.price.to_string();
                // The stored image is only shown; nothing is attached for re-upload.
                view.draft.preview = product.image_url.filter(|u| !u.is_empty());
                view.phase = FormPhase::Editing;
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "failed to load product for editing");
                let message = to_message(&e.failure());
                inner.view.error = Some(message.clone());
                inner.view.phase = FormPhase::Failed;
                Err(FormError::Server { message, source: e })
            }
        }
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.lock().view.draft.name = name.into();
    }

    pub fn set_price(&self, price: impl Into<String>) {
        self.lock().view.draft.price = price.into();
    }

    /// Attaches `file` to the draft and renders its preview, or clears both.
    ///
    /// A newer selection supersedes any render still in flight: only the
    /// result for the most recent selection is applied.
    pub async fn select_file(&self, file: Option<ImageFile>) {
        let (epoch, seq, file) = {
            let mut inner = self.lock();
            inner.preview_seq += 1;
            inner.view.draft.image_file.clone_from(&file);
            let Some(file) = file else {
                inner.view.draft.preview = None;
                return;
            };
            (inner.epoch, inner.preview_seq, file)
        };

        let rendered = self.renderer.render(&file).await;

        let mut inner = self.lock();
        if !inner.is_current(epoch) || inner.preview_seq != seq {
            tracing::debug!(file_name = %file.file_name, "discarding superseded preview");
            return;
        }
        match rendered {
            Ok(preview) => inner.view.draft.preview = Some(preview),
            Err(e) => {
                tracing::warn!(file_name = %file.file_name, error = %e, "failed to render preview");
            }
        }
    }

    /// Validates the draft and submits it: `update` when an id is bound,
    /// `create` otherwise. Navigates to the list on success.
    ///
    /// # Errors
    ///
    /// - [`FormError::Invalid`] when local validation fails; no request is sent.
    /// - [`FormError::SaveInProgress`] when another save has not finished.
    /// - [`FormError::Server`] when the request fails; the draft is kept so
    ///   the user can retry.
    /// - [`FormError::Stale`] if the form was reset or disposed meanwhile.
    pub async fn save(&self) -> Result<(), FormError> {
        let (epoch, id, input, image) = {
            let mut inner = self.lock();
            if inner.disposed {
                return Err(FormError::Stale);
            }
            if inner.view.saving() {
                tracing::warn!("ignoring save while another save is in flight");
                return Err(FormError::SaveInProgress);
            }
            let input = match validate(&inner.view.draft.name, &inner.view.draft.price) {
                Ok(input) => input,
                Err(e) => {
                    inner.view.touched = true;
                    inner.view.error = Some(e.to_string());
                    return Err(e.into());
                }
            };
            inner.view.error = None;
            inner.view.phase = FormPhase::Saving;
            (
                inner.epoch,
                inner.view.id,
                input,
                inner.view.draft.image_file.clone(),
            )
        };

        tracing::debug!(
            ?id,
            name = %input.name,
            price = input.price,
            has_image = image.is_some(),
            "saving product"
        );

        let outcome = match id {
            Some(id) => self
                .api
                .update(id, &input.name, input.price, image.as_ref())
                .await
                .map(|()| id),
            None => self
                .api
                .create(&input.name, input.price, image.as_ref())
                .await
                .map(|product| product.id),
        };

        {
            let mut inner = self.lock();
            if !inner.is_current(epoch) {
                return Err(FormError::Stale);
            }
            match outcome {
                Ok(saved_id) => {
                    inner.view.id = Some(saved_id);
                    inner.view.phase = FormPhase::Idle;
                    inner.view.draft = FormDraft::default();
                    inner.view.touched = false;
                }
                Err(e) => {
                    tracing::error!(?id, error = %e, "failed to save product");
                    let message = to_message(&e.failure());
                    inner.view.error = Some(message.clone());
                    inner.view.phase = FormPhase::Failed;
                    return Err(FormError::Server { message, source: e });
                }
            }
        }

        self.navigator.navigate(Route::Root);
        Ok(())
    }

    /// Uploads `file` as the bound product's image outside the save flow,
    /// tracking `uploading` and `progress`.
    ///
    /// # Errors
    ///
    /// - [`FormError::NoProduct`] when no id is bound yet.
    /// - [`FormError::UploadInProgress`] when another upload is running.
    /// - [`FormError::Server`] when the upload fails.
    /// - [`FormError::UploadIncomplete`] when the progress stream ends
    ///   without a completion; `error` is set and `progress` reset.
    /// - [`FormError::Stale`] if the form was reset or disposed meanwhile.
    pub async fn upload_image(&self, file: ImageFile) -> Result<(), FormError> {
        let (epoch, id) = {
            let mut inner = self.lock();
            if inner.disposed {
                return Err(FormError::Stale);
            }
            let id = inner.view.id.ok_or(FormError::NoProduct)?;
            if inner.view.uploading {
                return Err(FormError::UploadInProgress);
            }
            inner.view.uploading = true;
            inner.view.progress = 0;
            inner.view.error = None;
            (inner.epoch, id)
        };

        let mut events = self.api.upload_image(id, file);
        while let Some(event) = events.next().await {
            let mut inner = self.lock();
            if !inner.is_current(epoch) {
                return Err(FormError::Stale);
            }
            match event {
                Ok(UploadEvent::Completed { .. }) => {
                    inner.view.uploading = false;
                    inner.view.progress = 100;
                    return Ok(());
                }
                Ok(event) => {
                    if let Some(pct) = event.percent() {
                        inner.view.progress = pct;
                    }
                }
                Err(e) => {
                    tracing::error!(id, error = %e, "image upload failed");
                    let message = to_message(&e.failure());
                    inner.view.uploading = false;
                    inner.view.progress = 0;
                    inner.view.error = Some(message.clone());
                    return Err(FormError::Server { message, source: e });
                }
            }
        }

        tracing::warn!(id, "upload stream ended without completion");
        let mut inner = self.lock();
        if !inner.is_current(epoch) {
            return Err(FormError::Stale);
        }
        inner.view.uploading = false;
        inner.view.progress = 0;
        inner.view.error = Some(FormError::UploadIncomplete.to_string());
        Err(FormError::UploadIncomplete)
    }

    /// Discards the draft and any pending file, preview or upload state,
    /// then navigates to the list. Never fails.
    pub fn cancel(&self) {
        self.lock().reset();
        self.navigator.navigate(Route::Root);
    }

    /// Marks the controller torn down; in-flight completions become no-ops.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.disposed = true;
        inner.epoch += 1;
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
