use axum::body::Bytes;
use axum::http::StatusCode;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::shared::error::{CommandError, InteractionError};
use crate::shared::structs::discord::interaction::{
    CommandData, CommandOption, InteractionRequest, InteractionResponse, InteractionType,
};
use crate::shared::utility::dice::{DiceRoller, SecureDice};

pub type CommandHandler = fn(&[CommandOption], &mut dyn DiceRoller) -> Result<String, CommandError>;

pub static COMMAND_REGISTRY: Lazy<DashMap<String, CommandHandler>> = Lazy::new(DashMap::new);

pub fn register_command(name: &str, handler: CommandHandler) {
    COMMAND_REGISTRY.insert(name.to_string(), handler);
}

pub fn find_command(name: &str) -> Option<CommandHandler> {
    COMMAND_REGISTRY.get(name).map(|entry| *entry.value())
}

pub async fn handle_interaction(request: Bytes) -> Response {
    let mut dice = SecureDice;

    match route_interaction(&request, &mut dice) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Decodes an authenticated payload and produces its reply.
pub fn route_interaction(
    payload: &[u8],
    dice: &mut dyn DiceRoller,
) -> Result<InteractionResponse, InteractionError> {
    let value = serde_json::from_slice::<serde_json::Value>(payload).map_err(|e| {
        tracing::error!("Failed to deserialize incoming payload: {}", e);
        InteractionError::BadRequest
    })?;

    if is_empty_payload(&value) {
        tracing::warn!("Received an empty interaction payload.");
        return Err(InteractionError::BadRequest);
    }

    let interaction = serde_json::from_value::<InteractionRequest>(value).map_err(|e| {
        tracing::error!("Incoming payload is not an interaction: {}", e);
        InteractionError::BadRequest
    })?;

    match InteractionType::from_raw(interaction.r#type) {
        Some(InteractionType::Ping) => Ok(InteractionResponse::pong()),
        Some(InteractionType::ApplicationCommand) => {
            let data = interaction.data.unwrap_or_default();
            Ok(handle_command_interaction(&data, dice))
        }
        None => {
            tracing::warn!("Unsupported interaction type: {}", interaction.r#type);
            Err(InteractionError::BadRequest)
        }
    }
}

fn handle_command_interaction(
    data: &CommandData,
    dice: &mut dyn DiceRoller,
) -> InteractionResponse {
    tracing::debug!("Received incoming command interaction: {:?}", data);

    let Some(handler) = find_command(&data.name) else {
        tracing::debug!("No handler registered for command: {}", &data.name);
        return InteractionResponse::channel_message(format!("Unknown command: {}", &data.name));
    };

    match handler(data.options(), dice) {
        Ok(content) => InteractionResponse::channel_message(content),
        Err(e) => {
            match &e {
                CommandError::InvalidOptions(_) => {
                    tracing::debug!("Invalid options for {}: {}", &data.name, e)
                }
                CommandError::Dice(_) => tracing::error!("Command {} failed: {}", &data.name, e),
            }
            InteractionResponse::channel_message(e.to_string())
        }
    }
}

fn is_empty_payload(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(a) => a.is_empty(),
        serde_json::Value::Object(o) => o.is_empty(),
    }
}
