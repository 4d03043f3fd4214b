//! puppetdb rest client
//!
//! this crate issues synchronous queries against the puppetdb rest api and
//! returns the raw json text. build a [`Connector`] from a
//! [`ConnectorConfig`], then call [`Connector::perform_query`] with a
//! [`Query`]. parsing the response is left to the caller.
//!
//! ## quick start
//!
//! ```no_run
//! use puppetdb::{ApiVersion, Connector, ConnectorConfig, Query};
//!
//! # fn example() -> Result<(), puppetdb::Error> {
//! let config = ConnectorConfig::new("localhost").with_api_version(ApiVersion::V3);
//! let mut connector = Connector::new(config)?;
//! let query = Query::with_query_string("nodes", r#"["=", "name", "master"]"#)?;
//! let json = connector.perform_query(&query)?;
//! println!("{json}");
//! println!("performed: {}", connector.performed_query_url());
//! # Ok(())
//! # }
//! ```
//!
//! ## mutual tls
//!
//! ```no_run
//! use puppetdb::{Connector, ConnectorConfig};
//!
//! # fn example() -> Result<(), puppetdb::Error> {
//! let config = ConnectorConfig::secure(
//!     "puppetdb.example.com",
//!     "/etc/puppetlabs/puppet/ssl/certs/ca.pem",
//!     "/etc/puppetlabs/puppet/ssl/certs/agent.pem",
//!     "/etc/puppetlabs/puppet/ssl/private_keys/agent.pem",
//! );
//! let connector = Connector::new(config)?;
//! assert!(connector.is_secure());
//! # Ok(())
//! # }
//! ```
//!
//! query strings are passed raw; the connector percent-encodes them.

mod api;
mod config;
mod connector;
mod error;
mod query;
mod transport;

pub use api::ApiVersion;
pub use config::{ConnectorConfig, TlsConfig, HTTP_PORT, SECURE_PORT};
pub use connector::Connector;
pub use error::{Error, Result};
pub use query::Query;
pub use transport::{HttpTransport, Transport};

/// crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// api version used when none is configured
pub const DEFAULT_API_VERSION: ApiVersion = ApiVersion::V4;
