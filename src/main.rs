//! Lanescout binary - composition root.
//!
//! Ties the crate together into a single executable:
//! 1. Load configuration from the environment
//! 2. Build the Manheim valuation client and QuickChart renderer
//! 3. Build the session registry and application handlers
//! 4. Start the idle-session sweeper
//! 5. Run the Telegram long-poll loop

use std::sync::Arc;
use std::time::Duration;

use lanescout::adapters::chart::{QuickChartConfig, QuickChartRenderer};
use lanescout::adapters::manheim::{ManheimClient, ManheimClientConfig};
use lanescout::adapters::telegram::{BotHandlers, TelegramBot, TelegramBotConfig};
use lanescout::application::handlers::{
    ApplyFilterHandler, GetHistoryHandler, PaginateHandler, RefineFieldHandler,
    RequestForecastHandler, StartQueryHandler,
};
use lanescout::application::registry::SessionRegistry;
use lanescout::config::AppConfig;
use lanescout::ports::{ChartRenderer, ValuationClient};

/// Interval between idle-session sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Reclaim sessions idle for longer than the configured timeout.
async fn idle_sweep_loop(registry: Arc<SessionRegistry>, idle_timeout_secs: u64) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let reclaimed = registry.sweep_idle(idle_timeout_secs).await;
        if reclaimed > 0 {
            tracing::info!(reclaimed, "Reclaimed idle sessions");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting lanescout v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config = AppConfig::load()?;
    config.validate()?;

    // Valuation provider.
    let manheim_config = ManheimClientConfig::new(
        config.manheim.client_id.clone().unwrap_or_default(),
        config.manheim.client_secret.clone().unwrap_or_default(),
    )
    .with_base_url(config.manheim.base_url())
    .with_timeout(config.manheim.timeout());
    let valuation_client: Arc<dyn ValuationClient> = Arc::new(ManheimClient::new(manheim_config));
    tracing::info!(base_url = config.manheim.base_url(), "Manheim client ready");

    // Chart rendering.
    let chart_renderer: Arc<dyn ChartRenderer> =
        Arc::new(QuickChartRenderer::new(QuickChartConfig::default()));

    // Sessions and handlers.
    let registry = Arc::new(SessionRegistry::new(
        config.session.page_size,
        config.session.history_capacity,
    ));
    let handlers = BotHandlers {
        registry: Arc::clone(&registry),
        start_query: StartQueryHandler::new(Arc::clone(&registry), Arc::clone(&valuation_client)),
        refine_field: RefineFieldHandler::new(Arc::clone(&registry), Arc::clone(&valuation_client)),
        apply_filter: ApplyFilterHandler::new(Arc::clone(&registry)),
        paginate: PaginateHandler::new(Arc::clone(&registry)),
        request_forecast: RequestForecastHandler::new(Arc::clone(&registry), chart_renderer),
        get_history: GetHistoryHandler::new(Arc::clone(&registry)),
    };

    // Idle-session sweeper.
    let sweep_registry = Arc::clone(&registry);
    let idle_timeout_secs = config.session.idle_timeout_secs;
    tokio::spawn(async move {
        idle_sweep_loop(sweep_registry, idle_timeout_secs).await;
    });

    // Telegram transport.
    let bot_config = TelegramBotConfig::new(config.telegram.bot_token.clone().unwrap_or_default())
        .with_base_url(config.telegram.api_base_url.clone())
        .with_poll_timeout(Duration::from_secs(config.telegram.poll_timeout_secs));
    let bot = Arc::new(TelegramBot::new(bot_config, handlers));

    bot.run().await;

    Ok(())
}
