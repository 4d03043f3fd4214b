//! run one puppetdb query from the command line
//!
//! prints the raw json result followed by the performed url. failures map to
//! distinct exit codes, one per error kind.
//!
//! command help reference (kept in sync with `puppetdb-query --help`):
#[doc = concat!("```text\n", include_str!("puppetdb-query-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("puppetdb-query-help.txt");

use puppetdb::{ApiVersion, Connector, ConnectorConfig, Error, Query, TlsConfig};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    hostname: Option<String>,
    endpoint: String,
    query_string: String,
    port: Option<u16>,
    api_version: Option<ApiVersion>,
    ca_cert: Option<PathBuf>,
    client_cert: Option<PathBuf>,
    client_key: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

#[derive(Debug)]
enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        let context = match err {
            Error::Connector(_) => "failed to initialize the connector",
            Error::Query(_) => "failed to initialize the query",
            Error::Config(_) => "failed to load the connector config",
            Error::Url(_) | Error::Processing(_) => "failed to perform the query",
        };
        eprintln!("{context}: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(args: Args) -> puppetdb::Result<()> {
    let config = build_config(&args)?;
    let mut connector = Connector::new(config)?;
    let query = Query::with_query_string(args.endpoint, args.query_string)?;

    let result = connector.perform_query(&query)?;
    println!("result:\n{result}\n");
    println!("performed query: {}", connector.performed_query_url());
    Ok(())
}

fn build_config(args: &Args) -> puppetdb::Result<ConnectorConfig> {
    let mut config = match &args.config_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
            ConnectorConfig::from_json(&json)?
        }
        None => ConnectorConfig::new(args.hostname.clone().unwrap_or_default()),
    };

    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(api_version) = args.api_version {
        config = config.with_api_version(api_version);
    }

    let tls_paths = [&args.ca_cert, &args.client_cert, &args.client_key];
    if tls_paths.iter().any(|path| path.is_some()) {
        // a missing path becomes empty so the connector reports it
        let [ca, cert, key] = tls_paths.map(|path| path.clone().unwrap_or_default());
        config = config.with_tls(TlsConfig::new(ca, cert, key));
    }

    Ok(config)
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut parsed = Args::default();
    let mut positional = Vec::new();

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--port" => {
                let value = required_value(&arg, iter.next())?;
                parsed.port = Some(value.parse().map_err(|_| {
                    ParseArgsError::Message(format!("invalid port: {value}"))
                })?);
            }
            "--api-version" => {
                let value = required_value(&arg, iter.next())?;
                parsed.api_version = Some(
                    value
                        .parse()
                        .map_err(|err: Error| ParseArgsError::Message(err.to_string()))?,
                );
            }
            "--ca-cert" => parsed.ca_cert = Some(required_value(&arg, iter.next())?.into()),
            "--client-cert" => parsed.client_cert = Some(required_value(&arg, iter.next())?.into()),
            "--client-key" => parsed.client_key = Some(required_value(&arg, iter.next())?.into()),
            "--config" => parsed.config_path = Some(required_value(&arg, iter.next())?.into()),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ if arg.starts_with("--") => {
                return Err(ParseArgsError::Message(format!("unknown argument: {arg}")))
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    if parsed.config_path.is_none() {
        parsed.hostname = Some(positional.next().ok_or_else(|| {
            ParseArgsError::Message("<hostname> is required".to_string())
        })?);
    }
    parsed.endpoint = positional
        .next()
        .ok_or_else(|| ParseArgsError::Message("<endpoint> is required".to_string()))?;
    parsed.query_string = positional.next().unwrap_or_default();

    if let Some(extra) = positional.next() {
        return Err(ParseArgsError::Message(format!(
            "unexpected argument: {extra}"
        )));
    }

    Ok(parsed)
}

fn required_value(flag: &str, value: Option<String>) -> Result<String, ParseArgsError> {
    value.ok_or_else(|| ParseArgsError::Message(format!("{flag} requires a value")))
}
