pub mod client;
pub mod error;
pub mod failure;
pub mod normalize;
pub mod parts;
pub mod upload;

pub use client::CatalogClient;
pub use error::{CatalogError, ErrorKind};
pub use failure::{to_message, RequestFailure};
pub use normalize::{qualify_image_url, qualify_url};
pub use parts::{product_parts, FormPart};
pub use upload::{UploadEvent, UploadStream};
