//! Standalone image upload with progress reporting.
//!
//! The request body is streamed in `upload_chunk_bytes` pieces; each piece
//! handed to the transport produces an [`UploadEvent::Progress`]. The stream
//! always ends with either [`UploadEvent::Completed`] or an error.

use catalog_core::ImageFile;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde_json::Value;

use crate::client::{check_status, parse_body, CatalogClient, StatusPolicy};
use crate::error::CatalogError;
use crate::normalize::qualify_body_image_url;

pub type UploadStream = BoxStream<'static, Result<UploadEvent, CatalogError>>;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// Emitted once before any bytes are sent.
    Started { total: u64 },
    /// `loaded` bytes of `total` have been handed to the transport.
    Progress { loaded: u64, total: u64 },
    /// The server accepted the upload. A relative `imageUrl` in `body` is
    /// qualified against the API base.
    Completed { status: u16, body: Option<Value> },
}

impl UploadEvent {
    /// Percentage sent, rounded down; `None` for [`UploadEvent::Started`].
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        match self {
            UploadEvent::Started { .. } => None,
            UploadEvent::Progress { loaded, total } => {
                if *total == 0 {
                    return Some(100);
                }
                let pct = ((*loaded).min(*total) * 100) / *total;
                Some(u8::try_from(pct).unwrap_or(100))
            }
            UploadEvent::Completed { .. } => Some(100),
        }
    }
}

type EventSender = UnboundedSender<Result<UploadEvent, CatalogError>>;

impl CatalogClient {
    /// Uploads `file` as the image of product `id` via `POST /products/:id/image`.
    ///
    /// The request runs on a spawned Tokio task, so this must be called from
    /// within a Tokio runtime. Dropping the returned stream does not abort
    /// the request.
    #[must_use]
    pub fn upload_image(&self, id: i64, file: ImageFile) -> UploadStream {
        let (tx, rx) = mpsc::unbounded();
        let client = self.client.clone();
        let url = format!("{}/image", self.item_url(id));
        let api_base = self.api_base.clone();
        let chunk_bytes = self.upload_chunk_bytes;

        tokio::spawn(async move {
            let outcome = send_upload(&client, &url, &api_base, file, chunk_bytes, &tx).await;
            if let Err(e) = &outcome {
                tracing::error!(%url, error = %e, "image upload failed");
            }
            // The receiver may already be gone; nothing left to report to.
            let _ = tx.unbounded_send(outcome);
        });

        rx.boxed()
    }
}

async fn send_upload(
    client: &Client,
    url: &str,
    api_base: &str,
    file: ImageFile,
    chunk_bytes: usize,
    events: &EventSender,
) -> Result<UploadEvent, CatalogError> {
    let total = file.bytes.len() as u64;
    let _ = events.unbounded_send(Ok(UploadEvent::Started { total }));
    tracing::debug!(%url, total, "uploading product image");

    let chunks: Vec<Vec<u8>> = file.bytes.chunks(chunk_bytes).map(<[u8]>::to_vec).collect();
    let progress = events.clone();
    let mut loaded = 0u64;
    let body = stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        let _ = progress.unbounded_send(Ok(UploadEvent::Progress { loaded, total }));
        Ok::<_, std::io::Error>(chunk)
    });

    let part = Part::stream_with_length(Body::wrap_stream(body), total)
        .file_name(file.file_name)
        .mime_str(&file.content_type)?;
    let form = Form::new().part("file", part);

    let response = client.post(url).multipart(form).send().await?;
    let response = check_status(response, url, StatusPolicy::ITEM).await?;
    let status = response.status().as_u16();
    let text = response.text().await?;

    Ok(UploadEvent::Completed {
        status,
        body: parse_body(&text).map(|body| qualify_body_image_url(body, api_base)),
    })
}
