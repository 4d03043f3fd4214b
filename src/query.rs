//! puppetdb query
//!
//! a [`Query`] pairs an endpoint with an optional query string written in
//! the puppetdb query language.

use crate::error::{Error, Result};
use std::fmt;

/// endpoint plus optional query string
///
/// the query string is kept raw; the connector percent-encodes it when it
/// builds the request url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    endpoint: String,
    query_string: String,
}

impl Query {
    /// create a query without a query string
    ///
    /// ```
    /// use puppetdb::Query;
    ///
    /// let query = Query::new("facts").unwrap();
    /// assert_eq!(query.to_string(), "facts");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_query_string(endpoint, "")
    }

    /// create a query with a query string
    ///
    /// fails if the endpoint is empty.
    pub fn with_query_string(
        endpoint: impl Into<String>,
        query_string: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(Error::Query("no endpoint specified".to_string()));
        }

        Ok(Self {
            endpoint,
            query_string: query_string.into(),
        })
    }

    /// true iff the endpoint is non-empty
    pub fn is_valid(&self) -> bool {
        !self.endpoint.is_empty()
    }

    /// rest endpoint, e.g. `nodes`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// raw query string, empty if none was given
    pub fn query_string(&self) -> &str {
        &self.query_string
    }
}

/// `endpoint` or `endpoint?query=query_string`, with no encoding applied
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query_string.is_empty() {
            write!(f, "{}", self.endpoint)
        } else {
            write!(f, "{}?query={}", self.endpoint, self.query_string)
        }
    }
}
