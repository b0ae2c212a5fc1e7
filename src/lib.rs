// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod browse;
pub mod config;
pub mod covers;
pub mod error;
pub mod models;
pub mod solr;
pub mod utils;

pub use browse::{COVER_IMAGE_FIELD, ShelfBrowser};
pub use config::{
    Config, CoverImagesConfig, OutputField, ShelfBrowseConfig, SolrClientsConfig, SolrConfig,
    SolrEndpointConfig, SolrParamsConfig,
};
pub use covers::build_cover_url;
pub use error::{BrowseError, Result};
pub use models::{BrowseItem, BrowseResponse, BrowseStatus, OutputRecord, SolrDocument};
pub use solr::{SolrClient, SolrHealth};
