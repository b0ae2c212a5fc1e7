// file: src/covers.rs
// description: cover image lookup URL derived from document attributes
// reference: internal cover image service contract

use crate::config::CoverImagesConfig;
use crate::models::SolrDocument;
use reqwest::Url;
use tracing::debug;

/// Compose a lookup URL for the cover image service. Never fails; any
/// construction error yields an empty string, which the projection step
/// treats the same as a missing value.
///
/// Music records are keyed by artist and album; everything else by title.
/// The identifier lists (isbn/oclc/lccn/upc) are attached whenever present.
pub fn build_cover_url(doc: &SolrDocument, cfg: &CoverImagesConfig) -> String {
    let id = doc.get_first_value(&cfg.id_field);

    let mut url = match Url::parse(&format!("{}{}", cfg.url_prefix, id)) {
        Ok(url) => url,
        Err(_) => return String::new(),
    };

    let title = doc.get_first_value(&cfg.title_field);
    let pools = doc.get_values(&cfg.pool_field);
    let author = first_author(doc, &cfg.author_fields);

    {
        let mut params = url.query_pairs_mut();

        if pools.iter().any(|pool| pool == &cfg.music_pool) {
            params.append_pair("doc_type", "music");

            if !author.is_empty() {
                params.append_pair("artist_name", &author);
            }

            if !title.is_empty() {
                params.append_pair("album_name", &title);
            }
        } else {
            params.append_pair("doc_type", "non_music");

            if !title.is_empty() {
                params.append_pair("title", &title);
            }
        }

        // the cover image service accepts any of these identifiers
        for (name, field) in [
            ("isbn", &cfg.isbn_field),
            ("oclc", &cfg.oclc_field),
            ("lccn", &cfg.lccn_field),
            ("upc", &cfg.upc_field),
        ] {
            let values = doc.get_values(field);
            if !values.is_empty() {
                params.append_pair(name, &values.join(","));
            }
        }
    }

    url.to_string()
}

/// First non-empty value among the configured author fields, with any
/// trailing bracketed date annotation stripped (e.g. "[1685-1750]").
fn first_author(doc: &SolrDocument, author_fields: &[String]) -> String {
    for field in author_fields {
        let value = doc.get_first_value(field);
        if !value.is_empty() {
            debug!("field [{}] had author [{}]", field, value);
            return value.split('[').next().unwrap_or_default().trim().to_string();
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cover_config() -> CoverImagesConfig {
        Config::default_config().solr.cover_images
    }

    fn doc(value: serde_json::Value) -> SolrDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_music_document_uses_artist_and_album() {
        let doc = doc(json!({
            "id": "u555",
            "title_a": "Goldberg Variations",
            "author_facet_a": "Bach, J.S. [1685-1750]",
            "pool_f": ["music_recordings"]
        }));

        let url = build_cover_url(&doc, &cover_config());
        assert!(url.starts_with("https://covers.example.edu/card/u555?"));
        assert!(url.contains("doc_type=music"));
        assert!(url.contains("artist_name=Bach%2C+J.S."));
        assert!(url.contains("album_name=Goldberg+Variations"));
        assert!(!url.contains("title="));
    }

    #[test]
    fn test_non_music_document_uses_title() {
        let doc = doc(json!({
            "id": "u556",
            "title_a": "Pride & Prejudice",
            "pool_f": ["catalog"]
        }));

        let url = build_cover_url(&doc, &cover_config());
        assert!(url.contains("doc_type=non_music"));
        assert!(url.contains("title=Pride+%26+Prejudice"));
        assert!(!url.contains("album_name"));
    }

    #[test]
    fn test_identifier_lists_are_comma_joined() {
        let doc = doc(json!({
            "id": "u557",
            "title_a": "Some Book",
            "isbn_a": ["9780486255637", "0486255638"],
            "oclc_a": "12345678"
        }));

        let url = build_cover_url(&doc, &cover_config());
        assert!(url.contains("isbn=9780486255637%2C0486255638"));
        assert!(url.contains("oclc=12345678"));
        assert!(!url.contains("lccn="));
        assert!(!url.contains("upc="));
    }

    #[test]
    fn test_author_falls_through_to_later_fields() {
        let doc = doc(json!({
            "id": "u558",
            "author_added_entry_a": "Gould, Glenn [1932-1982]",
            "pool_f": ["music_recordings"]
        }));

        let url = build_cover_url(&doc, &cover_config());
        assert!(url.contains("artist_name=Gould%2C+Glenn"));
    }

    #[test]
    fn test_unparseable_prefix_yields_empty_string() {
        let mut cfg = cover_config();
        cfg.url_prefix = "not a url ".to_string();

        let doc = doc(json!({ "id": "u559" }));
        assert_eq!(build_cover_url(&doc, &cfg), "");
    }
}
