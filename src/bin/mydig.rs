use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dns_walker::config::DEFAULT_QUERY_TIMEOUT;
use dns_walker::report::render_answer;
use dns_walker::roots::RootServerList;
use dns_walker::{Outcome, Resolver, ResolverConfig, UdpTransport, Verbosity};
use tracing_subscriber::EnvFilter;

const EXIT_NAME_DOES_NOT_EXIST: u8 = 1;
const EXIT_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "mydig")]
#[command(version)]
#[command(about = "Resolve a domain name to an IP address, starting from the root servers")]
struct Cli {
    /// The domain name to resolve
    domain: String,

    /// Print extra information about each step of the resolution
    #[arg(short, long)]
    verbose: bool,

    /// Seconds to wait for each DNS response
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Root server to start from instead of the builtin list; repeat to try several in order
    #[arg(short, long = "root", value_name = "IP")]
    roots: Vec<Ipv4Addr>,
}

fn parse_timeout(value: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(String::from("timeout must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("`{}` is not a usable timeout: {}", value, e))
}

fn init_logging(verbosity: Verbosity) {
    let default_level = if verbosity.is_verbose() { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = ResolverConfig::default()
        .with_query_timeout(cli.timeout.unwrap_or(DEFAULT_QUERY_TIMEOUT))
        .with_verbosity(Verbosity::from_flag(cli.verbose));
    if !cli.roots.is_empty() {
        config = config.with_root_servers(RootServerList::new(cli.roots.clone())?);
    }
    config.validate().context("invalid resolver settings")?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli)?;
    let resolver = Resolver::new(UdpTransport::new(), config);

    let code = match resolver.resolve(&cli.domain).await {
        Outcome::Success(resolution) => {
            println!("{}", render_answer(&cli.domain, &resolution));
            ExitCode::SUCCESS
        }
        Outcome::NameDoesNotExist(name) => {
            eprintln!(
                "Error: response returned with rcode NXDOMAIN. The domain {} does not exist",
                name
            );
            ExitCode::from(EXIT_NAME_DOES_NOT_EXIST)
        }
        Outcome::Failure(e) => {
            eprintln!("{}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    };
    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flag(cli.verbose));

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
