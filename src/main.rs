use axum::{Router, middleware::from_fn_with_state, routing::post};
use tracing::Level;

use crate::{
    controller::discord::interaction::handle_interaction,
    shared::{
        middleware::discord_validation::validate_interaction,
        structs::{AppState, config::Configuration, discord::command::command_definitions},
        utility::discord::register_commands,
    },
};

mod controller;
mod shared;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = Configuration::load()?;

    let log_level = match config.log_level.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "INFO" => Level::INFO,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::DEBUG,
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(log_level)
        .pretty()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!(
            "Initialization of tracing subscriber failed with error: {}",
            e
        );
    }

    if std::env::args().nth(1).as_deref() == Some("register") {
        return register_commands(&config, &command_definitions()).await;
    }

    if config.application_public_key.is_none() {
        tracing::warn!("DISCORD_PUBLIC_KEY is not set; every interaction will be rejected.");
    }

    let server_bind_point = config.bind_address();
    let app_state = AppState::new(config);

    let app = Router::new()
        .route("/", post(handle_interaction))
        .route("/api/discord/interaction", post(handle_interaction))
        .layer(from_fn_with_state(app_state, validate_interaction));

    tracing::info!("Listening on {}", &server_bind_point);

    let listener = tokio::net::TcpListener::bind(&server_bind_point).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
