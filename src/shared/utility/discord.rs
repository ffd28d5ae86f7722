use std::collections::HashSet;

use anyhow::{Context, anyhow};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use crate::shared::structs::config::Configuration;
use crate::shared::structs::discord::command::{ApplicationCommand, RegisteredCommand};
use crate::shared::{
    DISCORD_GLOBAL_COMMANDS_ENDPOINT, DISCORD_GUILD_COMMANDS_ENDPOINT, DISCORD_ROOT_ENDPOINT,
};

pub fn commands_endpoint(application_id: &str, guild_id: Option<&str>) -> String {
    let path = match guild_id {
        Some(guild_id) => DISCORD_GUILD_COMMANDS_ENDPOINT
            .replace("$APPLICATION_ID", application_id)
            .replace("$GUILD_ID", guild_id),
        None => DISCORD_GLOBAL_COMMANDS_ENDPOINT.replace("$APPLICATION_ID", application_id),
    };

    format!("{DISCORD_ROOT_ENDPOINT}{path}")
}

/// Registered commands whose names are no longer defined locally.
pub fn stale_commands<'a>(
    existing: &'a [RegisteredCommand],
    definitions: &[ApplicationCommand],
) -> Vec<&'a RegisteredCommand> {
    let current: HashSet<&str> = definitions.iter().map(|c| c.name.as_str()).collect();

    existing
        .iter()
        .filter(|c| !current.contains(c.name.as_str()))
        .collect()
}

/// Syncs the platform's command list with `definitions`: stale commands are
/// deleted, then every definition is posted (the platform upserts by name).
pub async fn register_commands(
    config: &Configuration,
    definitions: &[ApplicationCommand],
) -> anyhow::Result<()> {
    let application_id = config
        .application_id
        .as_deref()
        .ok_or_else(|| anyhow!("DISCORD_APP_ID must be set to register commands."))?;
    let bot_token = config
        .bot_token
        .as_deref()
        .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set to register commands."))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bot {bot_token}"))?);
    headers.insert(USER_AGENT, HeaderValue::from_static(crate::shared::USER_AGENT));

    let http_client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    let guild_id = config.test_guild_id.as_deref();
    let url = commands_endpoint(application_id, guild_id);
    let scope = guild_id
        .map(|id| format!("guild {id}"))
        .unwrap_or_else(|| "global".to_string());

    tracing::info!("Registering commands ({scope}).");

    let existing = fetch_existing_commands(&http_client, &url).await?;
    tracing::info!("Found {} existing command(s).", existing.len());

    for command in stale_commands(&existing, definitions) {
        delete_command(&http_client, &url, command).await;
    }

    let mut failures = Vec::new();
    for definition in definitions {
        match http_client.post(&url).json(definition).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Registered command {}.", &definition.name);
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                tracing::error!("Failed to register {}: {status} {body}", &definition.name);
                failures.push(definition.name.clone());
            }
            Err(e) => {
                tracing::error!("Failed to register {}: {e:?}", &definition.name);
                failures.push(definition.name.clone());
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "Command registration failed for: {}",
            failures.join(", ")
        ))
    }
}

async fn fetch_existing_commands(
    http_client: &reqwest::Client,
    url: &str,
) -> anyhow::Result<Vec<RegisteredCommand>> {
    let commands = http_client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<RegisteredCommand>>()
        .await
        .context("Failed to decode existing commands.")?;

    Ok(commands)
}

async fn delete_command(http_client: &reqwest::Client, url: &str, command: &RegisteredCommand) {
    let delete_url = format!("{url}/{}", &command.id);

    match http_client.delete(&delete_url).send().await {
        Ok(response) if response.status() == reqwest::StatusCode::NO_CONTENT => {
            tracing::info!("Deleted stale command {} ({}).", &command.name, &command.id);
        }
        Ok(response) => {
            tracing::error!(
                "Failed to delete stale command {}: {}",
                &command.name,
                response.status()
            );
        }
        Err(e) => {
            tracing::error!("Failed to delete stale command {}: {e:?}", &command.name);
        }
    }
}
