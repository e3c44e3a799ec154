//! Multipart payload construction for product writes.
//!
//! [`product_parts`] is pure so the conditional `image` field can be checked
//! without an HTTP layer; [`into_form`] turns the parts into a `reqwest` form.

use catalog_core::ImageFile;
use reqwest::multipart::{Form, Part};

use crate::error::CatalogError;

/// One field of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: &'static str, value: String },
    File { name: &'static str, file: ImageFile },
}

impl FormPart {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Builds the parts for a create or update request.
///
/// The `image` part is omitted entirely when no file is chosen; the server
/// treats a missing field as "keep/no image", whereas an empty part would be
/// rejected as an invalid upload.
#[must_use]
pub fn product_parts(name: &str, price: f64, image: Option<&ImageFile>) -> Vec<FormPart> {
    let mut parts = vec![
        FormPart::Text {
            name: "name",
            value: name.to_owned(),
        },
        FormPart::Text {
            name: "price",
            value: price.to_string(),
        },
    ];
    if let Some(file) = image {
        parts.push(FormPart::File {
            name: "image",
            file: file.clone(),
        });
    }
    parts
}

/// Converts parts into a `reqwest` multipart form.
///
/// # Errors
///
/// Returns [`CatalogError::Http`] if a file part carries an unparseable
/// content type.
pub(crate) fn into_form(parts: Vec<FormPart>) -> Result<Form, CatalogError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File { name, file } => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
