use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use coin_price_bot::bot::{schema, AppContext};
use coin_price_bot::config::{BotConfig, LogFormat};
use coin_price_bot::dialogue::SessionState;
use coin_price_bot::membership::{MembershipGate, TelegramMembership};
use coin_price_bot::price_client::CoinGeckoClient;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Missing secrets are the only fatal startup error
    let config = Arc::new(BotConfig::from_env()?);
    init_tracing(config.log_format);

    info!(
        channel = %config.required_channel,
        price_api = %config.price_api.base_url,
        "Starting Coin Price Telegram Bot"
    );

    let bot = Bot::new(&config.bot_token);

    let prices = CoinGeckoClient::new(&config.price_api)?;
    let membership = MembershipGate::new(Arc::new(TelegramMembership::new(
        bot.clone(),
        &config.required_channel,
    )));
    let app = Arc::new(AppContext::new(Arc::clone(&config), Arc::new(prices), membership));

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![InMemStorage::<SessionState>::new(), app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
