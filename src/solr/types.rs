// file: src/solr/types.rs
// description: wire types for the Solr select, terms, and ping endpoints
// reference: https://solr.apache.org/guide/solr/latest/query-guide/json-request-api.html

use crate::models::SolrDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// JSON body posted to the select endpoint. Parameters ride in the body
/// rather than the query string so long queries cannot trigger a
/// 414 (URI Too Long) response.
#[derive(Debug, Clone, Serialize)]
pub struct SolrRequest {
    pub params: SolrRequestParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolrRequestParams {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub q: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub qt: String,
    #[serde(rename = "defType", skip_serializing_if = "String::is_empty")]
    pub def_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fq: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fl: Vec<String>,
    pub start: u64,
    pub rows: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolrResponseHeader {
    #[serde(default)]
    pub status: i64,
    #[serde(rename = "QTime", default)]
    pub q_time: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolrDocsSection {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(rename = "maxScore", default)]
    pub max_score: Option<f32>,
    #[serde(default)]
    pub docs: Vec<SolrDocument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolrErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

/// Superset of the three endpoint responses; each operation reads the
/// sections it cares about and ignores the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolrResponse {
    #[serde(rename = "responseHeader", default)]
    pub response_header: SolrResponseHeader,
    #[serde(default)]
    pub response: SolrDocsSection,
    #[serde(default)]
    pub terms: HashMap<String, Vec<Value>>,
    #[serde(default)]
    pub error: Option<SolrErrorBody>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SolrResponse {
    /// The terms endpoint interleaves terms and their frequencies
    /// (`[term1, count1, term2, count2, ...]`); the terms sit at even
    /// offsets. Frequencies are discarded, order is preserved.
    pub fn terms_for(&self, field: &str) -> Vec<String> {
        let Some(entries) = self.terms.get(field) else {
            return Vec::new();
        };

        entries
            .iter()
            .step_by(2)
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect()
    }

    pub fn error_parts(&self) -> (i64, String) {
        match &self.error {
            Some(error) => (error.code, error.msg.clone()),
            None => (
                self.response_header.status,
                "unspecified backend error".to_string(),
            ),
        }
    }
}
