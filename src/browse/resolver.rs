// file: src/browse/resolver.rs
// description: browse window resolution around an anchor item
// reference: internal browse algorithm

use crate::config::Config;
use crate::covers::build_cover_url;
use crate::error::Result;
use crate::models::{BrowseItem, BrowseResponse, OutputRecord};
use crate::solr::SolrClient;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

/// Output field that falls back to a derived cover image lookup URL when
/// the backend holds no stored value for it.
pub const COVER_IMAGE_FIELD: &str = "cover_image_url";

/// Anchor items are located by this backend field.
const ANCHOR_ID_FIELD: &str = "id";

/// Resolves browse requests against the search backend. Holds no state
/// between requests; safe to share across concurrent requests.
pub struct ShelfBrowser {
    solr: SolrClient,
    config: Config,
}

impl ShelfBrowser {
    pub fn new(config: Config) -> Result<Self> {
        let solr = SolrClient::new(&config.solr)?;
        Ok(Self { solr, config })
    }

    pub fn solr(&self) -> &SolrClient {
        &self.solr
    }

    /// Resolve a window of `range` items on either side of the item with
    /// the given id. The range defaults and clamps rather than rejecting;
    /// see `resolve_range`.
    pub async fn resolve_browse(&self, id: &str, range: Option<i64>) -> BrowseResponse {
        let request_id = Uuid::new_v4().simple().to_string();
        let span = tracing::info_span!("browse", request = %&request_id[..8]);

        self.browse_request(id, range).instrument(span).await
    }

    async fn browse_request(&self, id: &str, range: Option<i64>) -> BrowseResponse {
        let limit = self.resolve_range(range);
        let browse_cfg = &self.config.solr.shelf_browse;

        info!("id = [{}]  range = [{:?}]  limit = [{}]", id, range, limit);

        let anchor = match self.solr.lookup_by_field(ANCHOR_ID_FIELD, id).await {
            Ok(Some(doc)) => {
                BrowseItem::from_document(doc, &browse_cfg.forward_key, &browse_cfg.reverse_key)
            }
            Ok(None) => {
                warn!("record not found");
                return BrowseResponse::not_found("record not found");
            }
            Err(e) => {
                error!("anchor lookup failed: {}", e);
                return BrowseResponse::internal_error(e.to_string());
            }
        };

        if !anchor.has_shelf_keys() {
            warn!("item does not have shelf keys");
            return BrowseResponse::not_found("item does not have shelf keys");
        }

        // either enumeration failing is terminal; a window is returned
        // whole or not at all
        let (forward_keys, reverse_keys) = tokio::join!(
            self.solr
                .enumerate_terms(&browse_cfg.forward_key, &anchor.forward_key, limit),
            self.solr
                .enumerate_terms(&browse_cfg.reverse_key, &anchor.reverse_key, limit),
        );

        let forward_keys = match forward_keys {
            Ok(keys) => keys,
            Err(e) => {
                error!("forward term enumeration failed: {}", e);
                return BrowseResponse::internal_error(e.to_string());
            }
        };

        let reverse_keys = match reverse_keys {
            Ok(keys) => keys,
            Err(e) => {
                error!("reverse term enumeration failed: {}", e);
                return BrowseResponse::internal_error(e.to_string());
            }
        };

        // reverse candidates arrive closest-first; flipping the resolved
        // run puts them back into shelf order, ending adjacent to the
        // anchor
        let mut items = self
            .fill_neighbors(&browse_cfg.reverse_key, &reverse_keys, limit)
            .await;
        items.reverse();

        items.push(anchor);

        items.extend(
            self.fill_neighbors(&browse_cfg.forward_key, &forward_keys, limit)
                .await,
        );

        let records: Vec<OutputRecord> = items.iter().map(|item| self.project(item)).collect();

        info!("returning {} items", records.len());

        BrowseResponse::success(records)
    }

    /// Default when absent, clamp into `[1, max_items]`. Out-of-range
    /// requests are adjusted, never rejected.
    fn resolve_range(&self, requested: Option<i64>) -> usize {
        let browse_cfg = &self.config.solr.shelf_browse;

        match requested {
            Some(r) if r > 0 => (r as usize).min(browse_cfg.max_items),
            _ => browse_cfg.default_items.min(browse_cfg.max_items),
        }
    }

    /// Take the first `limit` candidates that still resolve to a full
    /// record. Candidate keys can linger in the term index after their
    /// record is gone; those are skipped silently, leaving no holes.
    async fn fill_neighbors(
        &self,
        key_field: &str,
        candidates: &[String],
        limit: usize,
    ) -> Vec<BrowseItem> {
        let browse_cfg = &self.config.solr.shelf_browse;
        let mut neighbors = Vec::with_capacity(limit);

        for key in candidates {
            if neighbors.len() >= limit {
                break;
            }

            match self.solr.lookup_by_field(key_field, key).await {
                Ok(Some(doc)) => neighbors.push(BrowseItem::from_document(
                    doc,
                    &browse_cfg.forward_key,
                    &browse_cfg.reverse_key,
                )),
                Ok(None) => debug!("skipping unresolvable shelf key [{}]", key),
                Err(e) => debug!("skipping shelf key [{}]: {}", key, e),
            }
        }

        neighbors
    }

    /// Project one item through the configured output fields. Empty values
    /// are omitted; the cover image field falls back to a derived URL.
    fn project(&self, item: &BrowseItem) -> OutputRecord {
        let mut record = OutputRecord::new();

        for field in &self.config.fields {
            let mut value = item.doc.get_first_value(&field.field);

            if value.is_empty() && field.name == COVER_IMAGE_FIELD {
                value = build_cover_url(&item.doc, &self.config.solr.cover_images);
            }

            if !value.is_empty() {
                record.insert(field.name.clone(), value);
            }
        }

        record
    }
}
