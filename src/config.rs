//! connector configuration
//!
//! build a [`ConnectorConfig`] with a hostname and optional overrides, then
//! pass it to [`crate::Connector::new`]. the config can also be loaded from
//! json with [`ConnectorConfig::from_json`].

use crate::api::ApiVersion;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// default port for plain http connections
pub const HTTP_PORT: u16 = 8080;

/// default port for mutual tls connections
pub const SECURE_PORT: u16 = 8081;

const TLS_ENABLED: bool = cfg!(feature = "rustls-tls");

pub(crate) type ClientBuilderHook =
    Arc<dyn Fn(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder + Send + Sync>;

/// certificate material for a secure connector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TlsConfig {
    /// ca certificate used to verify the server
    pub ca_cert: PathBuf,
    /// client certificate presented to the server
    pub client_cert: PathBuf,
    /// private key for the client certificate
    pub client_key: PathBuf,
}

impl TlsConfig {
    /// create tls material from ca, client certificate, and client key paths
    pub fn new(
        ca_cert: impl Into<PathBuf>,
        client_cert: impl Into<PathBuf>,
        client_key: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ca_cert: ca_cert.into(),
            client_cert: client_cert.into(),
            client_key: client_key.into(),
        }
    }

    /// paths in the order they are checked
    fn paths(&self) -> [&Path; 3] {
        [
            self.ca_cert.as_path(),
            self.client_cert.as_path(),
            self.client_key.as_path(),
        ]
    }

    fn validate(&self) -> Result<()> {
        if self.paths().iter().any(|path| path.as_os_str().is_empty()) {
            return Err(Error::Connector(
                "not all certificates were specified".to_string(),
            ));
        }

        for path in self.paths() {
            if !file_exists(path) {
                return Err(Error::Connector(format!(
                    "invalid certificate file: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}

fn file_exists(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

/// configuration for a puppetdb connector
#[derive(Clone, Deserialize)]
pub struct ConnectorConfig {
    /// puppetdb hostname
    pub(crate) hostname: String,

    /// explicit port; falls back to 8080 or 8081
    #[serde(default)]
    pub(crate) port: Option<u16>,

    #[serde(default)]
    pub(crate) api_version: ApiVersion,

    /// certificate material; present iff the connector is secure
    #[serde(default)]
    pub(crate) tls: Option<TlsConfig>,

    /// callback to customize each request client before it is built
    #[serde(skip)]
    pub(crate) http_client_builder: Option<ClientBuilderHook>,
}

impl ConnectorConfig {
    /// create a plain http configuration
    ///
    /// ```
    /// use puppetdb::{ApiVersion, ConnectorConfig};
    ///
    /// let config = ConnectorConfig::new("puppetdb.example.com").with_api_version(ApiVersion::V3);
    /// assert_eq!(config.port(), 8080);
    /// ```
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: None,
            api_version: crate::DEFAULT_API_VERSION,
            tls: None,
            http_client_builder: None,
        }
    }

    /// create a mutual tls configuration
    pub fn secure(
        hostname: impl Into<String>,
        ca_cert: impl Into<PathBuf>,
        client_cert: impl Into<PathBuf>,
        client_key: impl Into<PathBuf>,
    ) -> Self {
        Self::new(hostname).with_tls(TlsConfig::new(ca_cert, client_cert, client_key))
    }

    /// load a configuration from a json document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// set the port
    ///
    /// default: 8080, or 8081 when tls is configured
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// set the api version
    ///
    /// default: v4
    pub fn with_api_version(mut self, api_version: ApiVersion) -> Self {
        self.api_version = api_version;
        self
    }

    /// enable mutual tls with the given certificate material
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// customize the http client builder before each request client is built.
    ///
    /// the callback receives a builder with the tls material already applied.
    /// use this for timeouts, proxies, or other transport settings.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder
            + Send
            + Sync
            + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    /// puppetdb hostname
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// effective port
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(if self.is_secure() {
            SECURE_PORT
        } else {
            HTTP_PORT
        })
    }

    /// api version used in the url path
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// certificate material, if the connector is secure
    pub fn tls(&self) -> Option<&TlsConfig> {
        self.tls.as_ref()
    }

    /// true if tls material is configured
    pub fn is_secure(&self) -> bool {
        self.tls.is_some()
    }

    /// validate the configuration, stopping at the first failed check
    pub(crate) fn validate(&self) -> Result<()> {
        if self.hostname.is_empty() {
            return Err(Error::Connector("no hostname specified".to_string()));
        }

        if let Some(tls) = &self.tls {
            if !TLS_ENABLED {
                return Err(Error::Connector(
                    "tls support is not enabled in this build".to_string(),
                ));
            }
            tls.validate()?;
        }

        Ok(())
    }

    /// build the request url for a query
    ///
    /// the query string is percent-encoded; the result is the assembled text,
    /// not the normalized form of the parsed url.
    pub(crate) fn query_url(&self, query: &crate::Query) -> Result<String> {
        let scheme = if self.is_secure() { "https" } else { "http" };
        let mut url = format!(
            "{}://{}:{}/{}/{}",
            scheme,
            self.hostname,
            self.port(),
            self.api_version,
            query.endpoint()
        );

        if !query.query_string().is_empty() {
            url.push_str("?query=");
            url.push_str(&urlencoding::encode(query.query_string()));
        }

        Url::parse(&url)?;
        Ok(url)
    }
}

impl std::fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port())
            .field("api_version", &self.api_version)
            .field("tls", &self.tls)
            .field("http_client_builder", &self.http_client_builder.is_some())
            .finish()
    }
}
