use std::future::Future;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use catalog_core::ImageFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("could not render preview for {file_name}: {reason}")]
    Render { file_name: String, reason: String },
}

/// Produces a locally displayable rendering of a selected file.
pub trait PreviewRenderer: Send + Sync {
    fn render(&self, file: &ImageFile) -> impl Future<Output = Result<String, PreviewError>> + Send;
}

/// Renders files as `data:` URLs, encoding off the async executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlRenderer;

impl PreviewRenderer for DataUrlRenderer {
    async fn render(&self, file: &ImageFile) -> Result<String, PreviewError> {
        let owned = file.clone();
        tokio::task::spawn_blocking(move || data_url(&owned))
            .await
            .map_err(|e| PreviewError::Render {
                file_name: file.file_name.clone(),
                reason: e.to_string(),
            })
    }
}

/// Encodes `file` as `data:<content-type>;base64,<payload>`.
#[must_use]
pub fn data_url(file: &ImageFile) -> String {
    format!(
        "data:{};base64,{}",
        file.content_type,
        STANDARD.encode(&file.bytes)
    )
}
