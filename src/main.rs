//! Quarry CLI - evaluate a JSON query description against local data or an endpoint.
//!
//! Usage:
//!   quarry --data data/people.nt --query queries/friends.json
//!   quarry --data a.nq --data b.nq --federate --query q.json --format csv
//!   quarry --endpoint http://localhost:7878/query --param default-graph-uri=http://example.org/g --query q.json
//!   quarry --query q.json --explain

use clap::Parser;
use quarry::core::Triple;
use quarry::execution::{write_results, ResultFormat};
use quarry::parsing::{has_named_graphs, load_query, read_file};
use quarry::sources::{DataSource, Endpoint, EndpointConfig, Federation, Graph, Store};
use quarry::{EngineConfig, QuarryError, QueryEngine};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(about = "Quarry - SPARQL-style SELECT evaluation over graphs, federations and endpoints")]
struct Args {
    /// Data files (N-Triples or N-Quads); repeat for several files
    #[arg(short, long)]
    data: Vec<PathBuf>,

    /// JSON query description
    #[arg(short, long)]
    query: PathBuf,

    /// Query the data files as a federation, one member per file
    #[arg(long)]
    federate: bool,

    /// Remote SPARQL endpoint URL; replaces local data
    #[arg(long, conflicts_with_all = ["data", "federate"])]
    endpoint: Option<String>,

    /// Extra endpoint query-string parameter as key=value
    #[arg(long = "param", value_parser = parse_key_value, requires = "endpoint")]
    params: Vec<(String, String)>,

    /// Bearer token for the endpoint
    #[arg(long, requires = "endpoint")]
    token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ResultFormat::Table)]
    format: ResultFormat,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Evaluate patterns and federation members in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the canonical query text instead of evaluating
    #[arg(long)]
    explain: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) =
        s.split_once('=').ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build_source(args: &Args, config: &EngineConfig) -> Result<Option<DataSource>, QuarryError> {
    if let Some(url) = &args.endpoint {
        let mut endpoint_config =
            EndpointConfig::new(url.as_str()).with_timeout_secs(config.endpoint_timeout_secs);
        for (key, value) in &args.params {
            endpoint_config = endpoint_config.with_param(key.as_str(), value.as_str());
        }
        if let Some(token) = &args.token {
            endpoint_config = endpoint_config.with_auth_token(token.as_str());
        }
        return Ok(Some(DataSource::Endpoint(Endpoint::new(endpoint_config)?)));
    }

    if args.data.is_empty() {
        return Ok(None);
    }

    let mut inputs = Vec::with_capacity(args.data.len());
    for path in &args.data {
        inputs.push(read_file(path)?);
    }

    if args.federate {
        let mut federation = Federation::new();
        for input in inputs {
            federation.add_member(input.triples.into_iter().collect::<Store>());
        }
        return Ok(Some(DataSource::Federation(federation)));
    }

    let triples: Vec<Triple> = inputs.into_iter().flat_map(|input| input.triples).collect();
    if has_named_graphs(&triples) {
        return Ok(Some(DataSource::from(triples.into_iter().collect::<Store>())));
    }
    Ok(Some(DataSource::from(triples.into_iter().collect::<Graph>())))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if args.parallel {
        config.parallel = true;
    }

    let query = load_query(&args.query)?;
    if args.explain {
        println!("{}", query.to_sparql());
        return Ok(());
    }

    let source = build_source(&args, &config)?;
    if source.is_none() {
        log::warn!("No --data or --endpoint given; the result will be empty");
    }

    let engine = QueryEngine::new(config);
    let table = engine.evaluate(&query, source.as_ref());
    log::info!("Query returned {} rows", table.len());

    let stdout = std::io::stdout();
    write_results(&table, args.format, BufWriter::new(stdout.lock()))?;
    Ok(())
}
