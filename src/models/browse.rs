// file: src/models/browse.rs
// description: browse window items and the response returned to the boundary
// reference: internal data structures

use crate::models::SolrDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved item together with the shelf keys derived from it.
#[derive(Debug, Clone)]
pub struct BrowseItem {
    pub doc: SolrDocument,
    pub forward_key: String,
    pub reverse_key: String,
}

impl BrowseItem {
    pub fn from_document(doc: SolrDocument, forward_field: &str, reverse_field: &str) -> Self {
        let forward_key = doc.get_first_value(forward_field);
        let reverse_key = doc.get_first_value(reverse_field);
        Self {
            doc,
            forward_key,
            reverse_key,
        }
    }

    /// An item with neither key has no shelf position and cannot anchor a
    /// browse window.
    pub fn has_shelf_keys(&self) -> bool {
        !self.forward_key.is_empty() || !self.reverse_key.is_empty()
    }
}

/// One projected item of the browse window. Absent and empty values are
/// omitted, never emitted as empty strings.
pub type OutputRecord = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseStatus {
    Success,
    NotFound,
    InternalError,
}

impl BrowseStatus {
    /// HTTP status the boundary should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            BrowseStatus::Success => 200,
            BrowseStatus::NotFound => 404,
            BrowseStatus::InternalError => 500,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowseResponse {
    pub status: BrowseStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OutputRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BrowseResponse {
    pub fn success(items: Vec<OutputRecord>) -> Self {
        Self {
            status: BrowseStatus::Success,
            items,
            message: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: BrowseStatus::NotFound,
            items: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: BrowseStatus::InternalError,
            items: Vec::new(),
            message: Some(message.into()),
        }
    }
}
