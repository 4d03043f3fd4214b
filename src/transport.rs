//! http transport
//!
//! the [`Transport`] trait is the seam between the connector and the
//! network. [`HttpTransport`] is the default, backed by `reqwest::blocking`.

use crate::config::{ClientBuilderHook, TlsConfig};
use crate::error::{Error, Result};
use reqwest::blocking::{Client, ClientBuilder};

/// performs one blocking GET request and returns the whole body.
///
/// implementations must not inspect the http status; only transport
/// failures are errors.
///
/// ```
/// use puppetdb::{Connector, ConnectorConfig, Query, TlsConfig, Transport};
///
/// struct Echo;
///
/// impl Transport for Echo {
///     fn execute(&self, url: &str, _tls: Option<&TlsConfig>) -> puppetdb::Result<String> {
///         Ok(format!("[\"{url}\"]"))
///     }
/// }
///
/// let mut connector = Connector::with_transport(ConnectorConfig::new("localhost"), Echo)?;
/// let body = connector.perform_query(&Query::new("nodes")?)?;
/// assert_eq!(body, "[\"http://localhost:8080/v4/nodes\"]");
/// # Ok::<(), puppetdb::Error>(())
/// ```
pub trait Transport {
    /// request `url`, presenting `tls` material when given
    fn execute(&self, url: &str, tls: Option<&TlsConfig>) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, url: &str, tls: Option<&TlsConfig>) -> Result<String> {
        (**self).execute(url, tls)
    }
}

/// default transport over `reqwest::blocking`
///
/// every call builds its own client, so nothing is pooled between queries.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client_builder: Option<ClientBuilderHook>,
}

impl HttpTransport {
    /// create a transport with reqwest defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_client_builder(client_builder: Option<ClientBuilderHook>) -> Self {
        Self { client_builder }
    }

    fn client(&self, tls: Option<&TlsConfig>) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(tls) = tls {
            builder = apply_tls(builder, tls)?;
        }
        if let Some(customize) = &self.client_builder {
            builder = customize(builder);
        }
        builder.build().map_err(|err| Error::processing(&err))
    }
}

impl Transport for HttpTransport {
    fn execute(&self, url: &str, tls: Option<&TlsConfig>) -> Result<String> {
        let client = self.client(tls)?;
        let response = client
            .get(url)
            .send()
            .map_err(|err| Error::processing(&err))?;

        let status = response.status();
        let body = response.bytes().map_err(|err| Error::processing(&err))?;
        tracing::debug!(%status, bytes = body.len(), "received puppetdb response");

        String::from_utf8(body.to_vec())
            .map_err(|err| Error::Processing(format!("response body is not valid utf-8: {err}")))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client_builder", &self.client_builder.is_some())
            .finish()
    }
}

#[cfg(feature = "rustls-tls")]
fn apply_tls(builder: ClientBuilder, tls: &TlsConfig) -> Result<ClientBuilder> {
    let ca = read_pem(&tls.ca_cert)?;
    let ca = reqwest::Certificate::from_pem(&ca).map_err(|err| Error::processing(&err))?;

    let mut identity = read_pem(&tls.client_cert)?;
    if !identity.ends_with(b"\n") {
        identity.push(b'\n');
    }
    identity.extend(read_pem(&tls.client_key)?);
    let identity = reqwest::Identity::from_pem(&identity).map_err(|err| Error::processing(&err))?;

    Ok(builder
        .use_rustls_tls()
        .tls_built_in_root_certs(false)
        .add_root_certificate(ca)
        .identity(identity))
}

#[cfg(not(feature = "rustls-tls"))]
fn apply_tls(_builder: ClientBuilder, _tls: &TlsConfig) -> Result<ClientBuilder> {
    Err(Error::Processing(
        "tls support is not enabled in this build".to_string(),
    ))
}

#[cfg(feature = "rustls-tls")]
fn read_pem(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        Error::Processing(format!(
            "failed to read certificate file {}: {err}",
            path.display()
        ))
    })
}
