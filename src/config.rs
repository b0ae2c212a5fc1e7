// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{BrowseError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub solr: SolrConfig,
    pub fields: Vec<OutputField>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolrConfig {
    pub host: String,
    pub core: String,
    pub clients: SolrClientsConfig,
    pub params: SolrParamsConfig,
    pub shelf_browse: ShelfBrowseConfig,
    pub cover_images: CoverImagesConfig,
}

/// One client per backend role, each with its own timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolrClientsConfig {
    pub service: SolrEndpointConfig,
    pub health_check: SolrEndpointConfig,
    pub shelf_browse: SolrEndpointConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolrEndpointConfig {
    pub endpoint: String,
    pub conn_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

/// Query parameters applied to every document lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolrParamsConfig {
    pub qt: String,
    pub def_type: String,
    #[serde(default)]
    pub fq: Vec<String>,
    #[serde(default)]
    pub fl: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShelfBrowseConfig {
    pub forward_key: String,
    pub reverse_key: String,
    pub default_items: usize,
    pub max_items: usize,
    /// Multiplier applied to the requested range when enumerating terms,
    /// so the range can still be filled when some keys no longer resolve.
    /// There is no adaptive re-query on shortfall.
    #[serde(default = "default_term_overage")]
    pub term_overage: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoverImagesConfig {
    pub url_prefix: String,
    pub id_field: String,
    pub title_field: String,
    pub author_fields: Vec<String>,
    pub isbn_field: String,
    pub lccn_field: String,
    pub oclc_field: String,
    pub upc_field: String,
    pub pool_field: String,
    pub music_pool: String,
}

/// Projection from a backend field to an output record attribute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputField {
    pub name: String,
    pub field: String,
}

fn default_term_overage() -> usize {
    10
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SHELF_BROWSE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| BrowseError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| BrowseError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            solr: SolrConfig {
                host: "http://localhost:8983/solr".to_string(),
                core: "catalog".to_string(),
                clients: SolrClientsConfig {
                    service: SolrEndpointConfig {
                        endpoint: "select".to_string(),
                        conn_timeout_secs: 5,
                        read_timeout_secs: 5,
                    },
                    health_check: SolrEndpointConfig {
                        endpoint: "admin/ping".to_string(),
                        conn_timeout_secs: 5,
                        read_timeout_secs: 15,
                    },
                    shelf_browse: SolrEndpointConfig {
                        endpoint: "terms".to_string(),
                        conn_timeout_secs: 5,
                        read_timeout_secs: 10,
                    },
                },
                params: SolrParamsConfig {
                    qt: "search".to_string(),
                    def_type: "lucene".to_string(),
                    fq: vec!["shadowed_location_f:VISIBLE".to_string()],
                    fl: vec![],
                },
                shelf_browse: ShelfBrowseConfig {
                    forward_key: "shelfkey".to_string(),
                    reverse_key: "reverse_shelfkey".to_string(),
                    default_items: 3,
                    max_items: 25,
                    term_overage: 10,
                },
                cover_images: CoverImagesConfig {
                    url_prefix: "https://covers.example.edu/card/".to_string(),
                    id_field: "id".to_string(),
                    title_field: "title_a".to_string(),
                    author_fields: vec![
                        "author_facet_a".to_string(),
                        "author_added_entry_a".to_string(),
                    ],
                    isbn_field: "isbn_a".to_string(),
                    lccn_field: "lccn_a".to_string(),
                    oclc_field: "oclc_a".to_string(),
                    upc_field: "upc_a".to_string(),
                    pool_field: "pool_f".to_string(),
                    music_pool: "music_recordings".to_string(),
                },
            },
            fields: vec![
                OutputField {
                    name: "id".to_string(),
                    field: "id".to_string(),
                },
                OutputField {
                    name: "title".to_string(),
                    field: "title_a".to_string(),
                },
                OutputField {
                    name: "author".to_string(),
                    field: "author_facet_a".to_string(),
                },
                OutputField {
                    name: "call_number".to_string(),
                    field: "call_number_a".to_string(),
                },
                OutputField {
                    name: "location".to_string(),
                    field: "location2_a".to_string(),
                },
                OutputField {
                    name: "cover_image_url".to_string(),
                    field: "thumbnail_url_a".to_string(),
                },
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        Self::require(&self.solr.host, "solr host")?;
        Self::require(&self.solr.core, "solr core")?;
        Self::require(&self.solr.clients.service.endpoint, "solr service endpoint")?;
        Self::require(
            &self.solr.clients.health_check.endpoint,
            "solr healthcheck endpoint",
        )?;
        Self::require(
            &self.solr.clients.shelf_browse.endpoint,
            "solr shelf browse endpoint",
        )?;
        Self::require(&self.solr.params.qt, "solr param qt")?;
        Self::require(&self.solr.params.def_type, "solr param def_type")?;
        Self::require(&self.solr.shelf_browse.forward_key, "shelf browse forward key")?;
        Self::require(&self.solr.shelf_browse.reverse_key, "shelf browse reverse key")?;

        for field in &self.fields {
            Self::require(&field.name, "output field json name")?;
            Self::require(&field.field, "output field solr field")?;
        }

        if self.solr.shelf_browse.default_items == 0 {
            return Err(BrowseError::Config(
                "default_items must be greater than 0".to_string(),
            ));
        }

        if self.solr.shelf_browse.max_items < self.solr.shelf_browse.default_items {
            return Err(BrowseError::Config(
                "max_items must be at least default_items".to_string(),
            ));
        }

        if self.solr.shelf_browse.term_overage == 0 {
            return Err(BrowseError::Config(
                "term_overage must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn require(value: &str, label: &str) -> Result<()> {
        if value.is_empty() {
            return Err(BrowseError::Config(format!("missing {}", label)));
        }
        Ok(())
    }
}
