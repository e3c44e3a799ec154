use serde::{Deserialize, Serialize};

/// A catalog item as stored by the remote products API.
///
/// `id` is assigned by the server on creation and never changes afterwards.
/// `image_url` may arrive server-relative (`/uploads/x.png`); the client
/// qualifies it against the API base before handing the record out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Product {
    /// Returns the image URL when one is set and non-empty.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }
}
