//! puppetdb connector
//!
//! a [`Connector`] validates its configuration once, then performs any
//! number of sequential queries through its [`Transport`].

use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::transport::{HttpTransport, Transport};

/// synchronous puppetdb client
#[derive(Debug)]
pub struct Connector<T = HttpTransport> {
    config: ConnectorConfig,
    transport: T,
    performed_query_url: String,
}

impl Connector<HttpTransport> {
    /// create a connector over the default http transport
    ///
    /// fails if the configuration does not validate; see
    /// [`Connector::with_transport`].
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let transport = HttpTransport::with_client_builder(config.http_client_builder.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Connector<T> {
    /// create a connector over a custom transport
    ///
    /// checks, in order: hostname present, tls compiled in, all certificate
    /// paths present, each certificate file readable.
    pub fn with_transport(config: ConnectorConfig, transport: T) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            hostname = %config.hostname,
            port = config.port(),
            api_version = %config.api_version,
            secure = config.is_secure(),
            "created puppetdb connector"
        );

        Ok(Self {
            config,
            transport,
            performed_query_url: String::new(),
        })
    }

    /// access the connector configuration
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// true if the connector uses mutual tls
    pub fn is_secure(&self) -> bool {
        self.config.is_secure()
    }

    /// url of the most recent query, empty until one is performed
    pub fn performed_query_url(&self) -> &str {
        &self.performed_query_url
    }

    /// build the request url for a query
    pub fn query_url(&self, query: &Query) -> Result<String> {
        self.config.query_url(query)
    }

    /// perform a query and return the raw response body
    ///
    /// the body is returned as-is, whatever the http status.
    pub fn perform_query(&mut self, query: &Query) -> Result<String> {
        self.perform_query_with(query, ConnectorConfig::query_url)
    }

    pub(crate) fn perform_query_with<F>(&mut self, query: &Query, build_url: F) -> Result<String>
    where
        F: FnOnce(&ConnectorConfig, &Query) -> Result<String>,
    {
        if !query.is_valid() {
            return Err(Error::Query("no endpoint specified".to_string()));
        }

        let url = build_url(&self.config, query)?;
        tracing::debug!(%url, "performing puppetdb query");
        self.performed_query_url = url;

        self.transport
            .execute(&self.performed_query_url, self.config.tls())
            .inspect_err(|err| {
                tracing::warn!(url = %self.performed_query_url, "puppetdb query failed: {err}")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiVersion;
    use crate::config::TlsConfig;
    use std::cell::RefCell;

    /// records every url it is asked to fetch
    #[derive(Default)]
    struct RecordingTransport {
        urls: RefCell<Vec<String>>,
        body: String,
    }

    impl RecordingTransport {
        fn returning(body: &str) -> Self {
            Self {
                urls: RefCell::default(),
                body: body.to_string(),
            }
        }
    }

    impl Transport for RecordingTransport {
        fn execute(&self, url: &str, _tls: Option<&TlsConfig>) -> Result<String> {
            self.urls.borrow_mut().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    #[test]
    fn test_connect_without_tls() {
        let config = ConnectorConfig::new("spam")
            .with_port(42)
            .with_api_version(ApiVersion::V2);
        let connector = Connector::new(config).unwrap();
        assert!(!connector.is_secure());
        assert_eq!(connector.performed_query_url(), "");
    }

    #[test]
    fn test_connect_without_host() {
        let err = Connector::new(ConnectorConfig::new("")).unwrap_err();
        assert!(matches!(err, Error::Connector(_)));
        assert_eq!(err.to_string(), "connector error: no hostname specified");
    }

    #[test]
    fn test_connect_with_fake_certificates() {
        let config = ConnectorConfig::secure(
            "fake_host",
            "/fake/path/ca.cer",
            "/fake/path/host.cer",
            "/fake/path/host.key",
        );
        let err = Connector::new(config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "connector error: invalid certificate file: /fake/path/ca.cer"
        );
    }

    #[test]
    fn test_invalid_connector_never_reaches_transport() {
        let transport = RecordingTransport::default();
        assert!(Connector::with_transport(ConnectorConfig::new(""), &transport).is_err());
        assert!(transport.urls.borrow().is_empty());
    }

    #[test]
    fn test_query_url_default_port_and_version() {
        let config = ConnectorConfig::new("spam").with_api_version(ApiVersion::V3);
        let connector = Connector::new(config).unwrap();
        let url = connector.query_url(&Query::new("facts").unwrap()).unwrap();
        assert_eq!(url, "http://spam:8080/v3/facts");
    }

    #[test]
    fn test_perform_query_returns_body() {
        let transport = RecordingTransport::returning("simple_result");
        let mut connector =
            Connector::with_transport(ConnectorConfig::new("bar"), &transport).unwrap();

        let result = connector.perform_query(&Query::new("foo").unwrap()).unwrap();
        assert_eq!(result, "simple_result");
        assert_eq!(*transport.urls.borrow(), vec!["http://bar:8080/v4/foo"]);
    }

    #[test]
    fn test_perform_query_empty_body_is_ok() {
        let transport = RecordingTransport::returning("");
        let mut connector =
            Connector::with_transport(ConnectorConfig::new("bar"), &transport).unwrap();
        assert_eq!(connector.perform_query(&Query::new("foo").unwrap()).unwrap(), "");
    }

    #[test]
    fn test_performed_query_url_tracks_latest_query() {
        let transport = RecordingTransport::returning("[]");
        let config = ConnectorConfig::new("eggs").with_api_version(ApiVersion::V3);
        let mut connector = Connector::with_transport(config, &transport).unwrap();

        connector.perform_query(&Query::new("nodes").unwrap()).unwrap();
        assert_eq!(connector.performed_query_url(), "http://eggs:8080/v3/nodes");

        let query = Query::with_query_string("facts", "bar").unwrap();
        connector.perform_query(&query).unwrap();
        assert_eq!(
            connector.performed_query_url(),
            "http://eggs:8080/v3/facts?query=bar"
        );
        assert_eq!(transport.urls.borrow().len(), 2);
    }

    #[test]
    fn test_perform_query_with_stubbed_url() {
        let transport = RecordingTransport::returning("{}");
        let mut connector =
            Connector::with_transport(ConnectorConfig::new("spam"), &transport).unwrap();

        let mut urls = vec!["http://example.com", "http://example.org"].into_iter();
        for endpoint in ["eggs", "beans"] {
            let url = urls.next().unwrap();
            connector
                .perform_query_with(&Query::new(endpoint).unwrap(), |_, _| Ok(url.to_string()))
                .unwrap();
            assert_eq!(connector.performed_query_url(), url);
        }
        assert_eq!(
            *transport.urls.borrow(),
            vec!["http://example.com", "http://example.org"]
        );
    }

    #[test]
    fn test_url_failure_skips_transport() {
        let transport = RecordingTransport::default();
        let mut connector =
            Connector::with_transport(ConnectorConfig::new("bad host"), &transport).unwrap();

        let err = connector.perform_query(&Query::new("facts").unwrap()).unwrap_err();
        assert!(matches!(err, Error::Url(_)));
        assert!(transport.urls.borrow().is_empty());
        assert_eq!(connector.performed_query_url(), "");
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn execute(&self, _url: &str, _tls: Option<&TlsConfig>) -> Result<String> {
            Err(Error::Processing("couldn't resolve host name".to_string()))
        }
    }

    #[test]
    fn test_transport_failure_is_processing_error() {
        let mut connector =
            Connector::with_transport(ConnectorConfig::new("spam"), FailingTransport).unwrap();

        let err = connector.perform_query(&Query::new("facts").unwrap()).unwrap_err();
        assert!(err.is_transport_error());
        // the url is recorded even when the request fails
        assert_eq!(connector.performed_query_url(), "http://spam:8080/v4/facts");
    }

    /// echoes the url back after checking the tls material it was handed
    struct TlsEcho(Option<TlsConfig>);

    impl Transport for TlsEcho {
        fn execute(&self, url: &str, tls: Option<&TlsConfig>) -> Result<String> {
            assert_eq!(tls, self.0.as_ref());
            Ok(url.to_string())
        }
    }

    #[test]
    fn test_secure_connector_passes_tls_to_transport() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = ["ca.pem", "host.pem", "host.key"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, "pem").unwrap();
                path
            })
            .collect();

        let config = ConnectorConfig::secure("master", &paths[0], &paths[1], &paths[2]);
        let transport = TlsEcho(config.tls().cloned());
        let mut connector = Connector::with_transport(config, transport).unwrap();

        assert!(connector.is_secure());
        let body = connector.perform_query(&Query::new("facts").unwrap()).unwrap();
        assert_eq!(body, "https://master:8081/v4/facts");
    }

    #[test]
    fn test_identical_inputs_build_identical_urls() {
        let build = || {
            Connector::new(ConnectorConfig::new("spam").with_api_version(ApiVersion::V3)).unwrap()
        };
        let query = Query::with_query_string("nodes", "bar").unwrap();
        assert_eq!(
            build().query_url(&query).unwrap(),
            build().query_url(&query).unwrap()
        );
    }
}
