use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};

use fra_chat_relay::auth::HostedAuthVerifier;
use fra_chat_relay::config::RelayConfig;
use fra_chat_relay::model::{CompletionProvider, GatewayModel};
use fra_chat_relay::prompts::PromptTable;
use fra_chat_relay::relay::ChatRelay;
use fra_chat_relay::web::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting FRA chat relay");

    let config = RelayConfig::from_env().context("failed to load configuration")?;

    let verifier = HostedAuthVerifier::new(&config.auth).context("failed to build auth client")?;
    info!("Verifying callers against: {}", config.auth.base_url);

    let provider = GatewayModel::from_config(&config.gateway)
        .context("failed to build completion gateway client")?
        .map(|model| Arc::new(model) as Arc<dyn CompletionProvider>);
    if provider.is_none() {
        error!("AI_GATEWAY_API_KEY is not configured; chat requests will be refused with 503");
    }

    let relay = Data::new(ChatRelay::new(
        Arc::new(verifier),
        provider,
        PromptTable::default(),
        config.gateway.max_tokens,
    )
    .with_body_limit(config.max_body_bytes));

    let allow_origin = config.allow_origin.clone();
    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors_headers(&allow_origin))
            .wrap(Logger::default())
            .app_data(relay.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
