//! `cookiejar`: bake, eat and count cookies on the ledger.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cookiejar::config::{
    load_keypair, resolve_key_file, DEFAULT_TIMEOUT_SECS, ENV_KEY_FILE, ENV_TIMEOUT, ENV_URL,
};
use cookiejar::client::DEFAULT_URL;
use cookiejar::{execute, ClientConfig, Command, CookieJarClient};

/// Cookie jar client
#[derive(Parser, Debug)]
#[command(name = "cookiejar", version)]
#[command(about = "Bake, eat and count cookies in your jar on the ledger")]
struct Args {
    /// REST API endpoint
    #[arg(long, env = ENV_URL, default_value = DEFAULT_URL)]
    url: String,

    /// Private key file (default: ~/.sawtooth/keys/mycookiejar.priv)
    #[arg(long, env = ENV_KEY_FILE)]
    key_file: Option<PathBuf>,

    /// Seconds to wait for the batch to commit
    #[arg(long, env = ENV_TIMEOUT, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<String> {
    let key_file = resolve_key_file(args.key_file)?;
    let keypair = load_keypair(&key_file)?;

    let config = ClientConfig::default()
        .with_url(args.url)
        .with_wait_timeout(Duration::from_secs(args.timeout));
    let client = CookieJarClient::connect(keypair, config)
        .context("failed to initialize cookiejar client")?;

    Ok(execute(&client, &args.command).await?)
}
