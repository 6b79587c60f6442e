use earn_notify::config::{LoggingSettings, Settings};
use earn_notify::core::Dispatcher;
use earn_notify::services::{EarnClient, PostgresPreferenceStore, SeenListings, TelegramChannel};
use earn_notify::MessageFormatter;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

/// Runs a single notification cycle. Scheduling is left to cron or a
/// systemd timer; overlapping runs in one process are rejected by the
/// dispatcher itself.
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    init_logging(&logging);

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting Earn notification cycle...");

    if settings.telegram.bot_token.is_empty() {
        error!("Telegram bot token is not configured (set TELEGRAM_BOT_TOKEN)");
        return ExitCode::FAILURE;
    }

    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(10_000);
    let seen_ttl = settings.cache.ttl_secs.unwrap_or(7 * 24 * 3600);

    let seen = match settings.cache.redis_url.as_deref() {
        Some(redis_url) => match SeenListings::new(redis_url, l1_cache_size, seen_ttl).await {
            Ok(seen) => {
                info!("Seen-listing tracker initialized (L1: {} entries, TTL: {}s)", l1_cache_size, seen_ttl);
                seen
            }
            Err(e) => {
                warn!("Failed to connect to Redis ({}), tracking seen listings in memory only", e);
                SeenListings::in_memory(l1_cache_size, seen_ttl)
            }
        },
        None => {
            warn!(
                "No cache.redis_url configured, seen listings are forgotten between runs; \
                 deduplication relies on earn.lookback_minutes ({}) matching the schedule",
                settings.earn.lookback_minutes
            );
            SeenListings::in_memory(l1_cache_size, seen_ttl)
        }
    };

    let earn = match EarnClient::new(
        settings.earn.api_url.clone(),
        settings.earn.timeout_secs,
        settings.earn.lookback_minutes,
        Arc::new(seen),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create Earn client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = match PostgresPreferenceStore::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
    )
    .await
    {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let channel = match TelegramChannel::new(
        settings.telegram.api_base_url.clone(),
        settings.telegram.bot_token.clone(),
        settings.telegram.parse_mode.clone(),
        settings.telegram.timeout_secs,
    ) {
        Ok(channel) => Arc::new(channel),
        Err(e) => {
            error!("Failed to create Telegram client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let formatter = MessageFormatter::new(
        settings.earn.listing_base_url.clone(),
        settings.earn.utm_source.clone(),
    );

    let dispatcher = Dispatcher::new(store, channel, formatter)
        .with_send_delay(Duration::from_millis(settings.dispatch.send_delay_ms));

    match dispatcher.run_cycle(&earn).await {
        Ok(outcome) => {
            info!(
                outcome = %serde_json::to_string(&outcome).unwrap_or_default(),
                "Notification process completed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error in notification process: {}", e);
            ExitCode::FAILURE
        }
    }
}
