use puppetdb::{ApiVersion, Connector, ConnectorConfig, Query};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hostname = env::var("PUPPETDB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let query_string = env::var("PUPPETDB_QUERY").unwrap_or_default();

    let config = ConnectorConfig::new(hostname).with_api_version(ApiVersion::V3);
    let mut connector = Connector::new(config)?;

    let query = Query::with_query_string("nodes", query_string)?;
    let result = connector.perform_query(&query)?;

    println!("result:\n{result}\n");
    println!("performed query: {}", connector.performed_query_url());

    Ok(())
}
