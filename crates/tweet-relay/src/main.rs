//! Tweet Relay - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tweet_relay::{config::Config, server::WebServer};

#[derive(Parser, Debug)]
#[command(name = "tweet-relay")]
#[command(about = "Sign in with Twitter and post a tweet")]
#[command(version)]
struct Cli {
    /// OAuth consumer key
    #[arg(long, env = "CONSUMER_KEY", hide_env_values = true)]
    consumer_key: String,

    /// OAuth consumer secret
    #[arg(long, env = "CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: String,

    /// Override the API endpoint (e.g. an API proxy); a bare host gets http://
    #[arg(long, env = "TWITTER_API_ENDPOINT")]
    api_endpoint: Option<String>,

    /// Secret signing the session cookie (at least 64 bytes)
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_secret: Option<String>,

    /// Public base URL used for the OAuth callback (e.g. https://relay.example.com)
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// HTTP server port
    #[arg(long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), port = cli.port, "Starting tweet relay");

    let config = Config::new(cli.consumer_key, cli.consumer_secret)
        .with_api_endpoint(cli.api_endpoint.as_deref())
        .with_base_url(cli.base_url)
        .with_session_secret(cli.session_secret);

    WebServer::new(config)?.run_http(cli.port).await
}
