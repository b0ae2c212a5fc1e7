// file: src/solr/client.rs
// description: Solr client with per-role connections, timeouts, and error classification
// reference: https://docs.rs/reqwest

use crate::config::{SolrConfig, SolrEndpointConfig, SolrParamsConfig};
use crate::error::{BrowseError, Result};
use crate::models::SolrDocument;
use crate::solr::types::{SolrRequest, SolrRequestParams, SolrResponse};
use crate::utils::RequestTimer;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of the liveness probe, suitable for the boundary's healthcheck
/// payload. A probe never errors; every failure becomes a reason string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum SolrHealth {
    Healthy,
    Unhealthy { reason: String },
}

impl SolrHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, SolrHealth::Healthy)
    }
}

struct SolrEndpoint {
    url: String,
    client: Client,
}

impl SolrEndpoint {
    fn build(host: &str, core: &str, cfg: &SolrEndpointConfig) -> Result<Self> {
        let url = format!("{}/{}/{}", host.trim_end_matches('/'), core, cfg.endpoint);

        // timeouts are floored at one second
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(cfg.conn_timeout_secs.max(1)))
            .timeout(Duration::from_secs(cfg.read_timeout_secs.max(1)))
            .build()
            .map_err(|e| BrowseError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self { url, client })
    }
}

/// Read-only client for the search backend. One pooled connection set per
/// endpoint role, constructed once at startup and shared across requests.
pub struct SolrClient {
    service: SolrEndpoint,
    health_check: SolrEndpoint,
    shelf_browse: SolrEndpoint,
    params: SolrParamsConfig,
    term_overage: usize,
}

impl SolrClient {
    pub fn new(cfg: &SolrConfig) -> Result<Self> {
        let service = SolrEndpoint::build(&cfg.host, &cfg.core, &cfg.clients.service)?;
        let health_check = SolrEndpoint::build(&cfg.host, &cfg.core, &cfg.clients.health_check)?;
        let shelf_browse = SolrEndpoint::build(&cfg.host, &cfg.core, &cfg.clients.shelf_browse)?;

        info!("solr service url     = [{}]", service.url);
        info!("solr healthcheck url = [{}]", health_check.url);
        info!("solr shelfbrowse url = [{}]", shelf_browse.url);

        Ok(Self {
            service,
            health_check,
            shelf_browse,
            params: cfg.params.clone(),
            term_overage: cfg.shelf_browse.term_overage,
        })
    }

    /// Look up the single document matching `field:"value"`. The value is
    /// matched as an exact phrase; callers are responsible for escaping.
    /// `Ok(None)` means the backend answered and found nothing.
    pub async fn lookup_by_field(&self, field: &str, value: &str) -> Result<Option<SolrDocument>> {
        let query = format!("{}:\"{}\"", field, value);

        let request = SolrRequest {
            params: SolrRequestParams {
                q: query.clone(),
                qt: self.params.qt.clone(),
                def_type: self.params.def_type.clone(),
                fq: nonempty_values(&self.params.fq),
                fl: nonempty_values(&self.params.fl),
                start: 0,
                rows: 1,
            },
        };

        debug!("req: [{}]", query);

        let builder = self.service.client.post(&self.service.url).json(&request);
        let response = send_and_decode(&self.service.url, builder).await?;

        debug!(
            "res: {{ rows = {}, total = {} }}",
            response.response.docs.len(),
            response.response.num_found
        );

        Ok(response.response.docs.into_iter().next())
    }

    /// Enumerate indexed terms for `field` strictly greater than
    /// `start_key`, in index order. Requests an oversized buffer
    /// (`term_overage` x `limit`) so the caller can usually fill its range
    /// even when some terms no longer resolve to a record.
    pub async fn enumerate_terms(
        &self,
        field: &str,
        start_key: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let overage = self.term_overage.saturating_mul(limit);

        let builder = self.shelf_browse.client.get(&self.shelf_browse.url).query(&[
            ("terms.fl", field),
            ("terms.lower", start_key),
            ("terms.lower.incl", "false"),
            ("terms.limit", overage.to_string().as_str()),
            ("terms.sort", "index"),
        ]);

        debug!("req: terms after [{}] on [{}]", start_key, field);

        let response = send_and_decode(&self.shelf_browse.url, builder).await?;
        let terms = response.terms_for(field);

        debug!("res: {{ terms = {} }}", terms.len());

        Ok(terms)
    }

    /// Liveness probe against the health-check endpoint.
    pub async fn ping(&self) -> SolrHealth {
        let builder = self.health_check.client.get(&self.health_check.url);

        match send_and_decode(&self.health_check.url, builder).await {
            Ok(response) => match response.status.as_deref() {
                Some("OK") => SolrHealth::Healthy,
                Some(other) => SolrHealth::Unhealthy {
                    reason: format!("ping status was not OK: [{}]", other),
                },
                None => SolrHealth::Unhealthy {
                    reason: "ping response had no status".to_string(),
                },
            },
            Err(e) => SolrHealth::Unhealthy {
                reason: e.to_string(),
            },
        }
    }
}

/// Shared round trip: send, decode, verify the backend's own status code.
/// Every path logs the elapsed wall-clock time and outcome.
async fn send_and_decode(url: &str, builder: reqwest::RequestBuilder) -> Result<SolrResponse> {
    let timer = RequestTimer::start();

    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => {
            let err = classify_transport(url, &e);
            warn!("Failed Solr response from {} after {}ms: {}", url, timer.elapsed_ms(), err);
            return Err(err);
        }
    };

    let decoded: SolrResponse = match response.json().await {
        Ok(decoded) => decoded,
        Err(e) => {
            let err = if e.is_timeout() {
                BrowseError::BackendTimeout {
                    url: url.to_string(),
                }
            } else {
                BrowseError::BackendDecode {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            };
            warn!("Failed Solr response from {} after {}ms: {}", url, timer.elapsed_ms(), err);
            return Err(err);
        }
    };

    if decoded.response_header.status != 0 {
        let (code, message) = decoded.error_parts();
        warn!(
            "Solr error from {} after {}ms: {{ code = {}, msg = {} }}",
            url,
            timer.elapsed_ms(),
            code,
            message
        );
        return Err(BrowseError::BackendReported { code, message });
    }

    info!(
        "Successful Solr response from {} in {}ms (QTime = {})",
        url,
        timer.elapsed_ms(),
        decoded.response_header.q_time
    );

    Ok(decoded)
}

fn classify_transport(url: &str, err: &reqwest::Error) -> BrowseError {
    if err.is_timeout() {
        BrowseError::BackendTimeout {
            url: url.to_string(),
        }
    } else if err.is_connect() {
        BrowseError::BackendUnavailable {
            url: url.to_string(),
        }
    } else {
        BrowseError::BackendUnreachable {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

fn nonempty_values(values: &[String]) -> Vec<String> {
    values.iter().filter(|v| !v.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SolrClient {
        let mut config = Config::default_config();
        config.solr.host = server.uri();
        config.solr.core = "browse".to_string();
        config.solr.clients.service.read_timeout_secs = 1;
        config.solr.clients.shelf_browse.read_timeout_secs = 1;
        config.solr.params.fq = vec![];
        SolrClient::new(&config.solr).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_returns_first_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/browse/select"))
            .and(body_string_contains("u12345"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseHeader": { "status": 0, "QTime": 3 },
                "response": {
                    "numFound": 1,
                    "start": 0,
                    "docs": [{ "id": "u12345", "shelfkey": "PS 3537" }]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let doc = client.lookup_by_field("id", "u12345").await.unwrap().unwrap();
        assert_eq!(doc.get_first_value("shelfkey"), "PS 3537");
    }

    #[tokio::test]
    async fn test_lookup_with_zero_matches_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/browse/select"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseHeader": { "status": 0, "QTime": 1 },
                "response": { "numFound": 0, "start": 0, "docs": [] }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let doc = client.lookup_by_field("id", "missing").await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_backend_reported_error_carries_code_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/browse/select"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "responseHeader": { "status": 400, "QTime": 1 },
                "error": { "code": 400, "msg": "undefined field bogus" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.lookup_by_field("bogus", "x").await.unwrap_err();
        match err {
            BrowseError::BackendReported { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "undefined field bogus");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/browse/select"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.lookup_by_field("id", "u1").await.unwrap_err();
        assert!(matches!(err, BrowseError::BackendDecode { .. }));
    }

    #[tokio::test]
    async fn test_terms_request_shape_and_parsing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/browse/terms"))
            .and(query_param("terms.fl", "shelfkey"))
            .and(query_param("terms.lower", "PS 3537"))
            .and(query_param("terms.lower.incl", "false"))
            .and(query_param("terms.limit", "20"))
            .and(query_param("terms.sort", "index"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseHeader": { "status": 0, "QTime": 2 },
                "terms": { "shelfkey": ["PS 3538", 1, "PS 3539", 2] }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let terms = client.enumerate_terms("shelfkey", "PS 3537", 2).await.unwrap();
        assert_eq!(terms, vec!["PS 3538", "PS 3539"]);
    }

    #[tokio::test]
    async fn test_ping_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/browse/admin/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseHeader": { "status": 0, "QTime": 1 },
                "status": "OK"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.ping().await.is_healthy());
    }

    #[tokio::test]
    async fn test_ping_with_bad_status_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/browse/admin/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseHeader": { "status": 0, "QTime": 1 },
                "status": "DEGRADED"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.ping().await {
            SolrHealth::Unhealthy { reason } => assert!(reason.contains("DEGRADED")),
            SolrHealth::Healthy => panic!("expected unhealthy"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        // bind then drop a listener so the port is known to refuse
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default_config();
        config.solr.host = format!("http://{}", addr);
        let client = SolrClient::new(&config.solr).unwrap();

        let err = client.lookup_by_field("id", "u1").await.unwrap_err();
        assert!(matches!(err, BrowseError::BackendUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_slow_response_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/browse/select"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "responseHeader": { "status": 0, "QTime": 1 },
                        "response": { "numFound": 0, "start": 0, "docs": [] }
                    }))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.lookup_by_field("id", "u1").await.unwrap_err();
        assert!(matches!(err, BrowseError::BackendTimeout { .. }));
    }
}
