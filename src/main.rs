use release_relay::error::{RelayError, Result};
use release_relay::handlers::build_router;
use release_relay::notify::Notifier;
use release_relay::policy::AuthorizationRoster;
use release_relay::routes::JobRouter;
use release_relay::secrets::{EnvSecretStore, resolve_credentials};
use release_relay::{AppState, RelayConfig};
use std::fs;
use std::sync::Arc;
use tracing::{self, info};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_CONFIG_PATH: &str = "relay_config.toml";

/// Load and parse the configuration file
fn load_config(path: &str) -> Result<RelayConfig> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        RelayError::ConfigError(format!("Failed to read config file '{}': {}", path, e))
    })?;

    let config: RelayConfig = toml::from_str(&config_str).map_err(|e| {
        RelayError::ConfigError(format!("Failed to parse config file '{}': {}", path, e))
    })?;

    Ok(config)
}

fn required_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| RelayError::ConfigError(format!("Environment variable '{}' is not set", name)))
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let config_path =
        std::env::var("RELAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config: RelayConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Secret names and the channel id come from the environment; a
    // missing one is fatal before any traffic is served.
    let startup = async {
        let slack_channel = required_env("SLACK_CHANNEL")?;
        let slack_secret_name = required_env("SLACK_TOKEN_SECRETNAME")?;
        let build_secret_name = required_env("BUILD_AUTH_SECRETNAME")?;

        let store = EnvSecretStore;
        let credentials =
            resolve_credentials(&store, &slack_secret_name, &build_secret_name).await?;
        Ok::<_, RelayError>((slack_channel, credentials))
    };
    let (slack_channel, credentials) = match startup.await {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            std::process::exit(1);
        }
    };

    let http = reqwest::Client::new();
    let notifier = Notifier::new(http.clone(), &credentials.slack_token, &slack_channel);
    let state = Arc::new(AppState {
        roster: AuthorizationRoster::from_entries(&config.authorized_users),
        router: JobRouter::from_config(&config.job),
        config,
        credentials,
        notifier,
        http,
    });

    info!(
        "Routing {} repositories, roster of {} deployers",
        state.router.len(),
        state.roster.len()
    );

    let app = build_router(state);

    info!("Listening on {}", bind_address);
    info!("Using config at {:?}", config_path);
    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
