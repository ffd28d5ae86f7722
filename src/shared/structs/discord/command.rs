use serde::{Deserialize, Serialize};

use crate::shared::MAX_DICE_PER_POOL;

pub const OPTION_TYPE_INTEGER: i64 = 4;

/// Slash command definition as sent to the application commands endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApplicationCommand {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub options: Vec<ApplicationCommandOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApplicationCommandOption {
    pub name: String,
    pub description: String,
    pub r#type: i64,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
}

/// A command as returned by the platform when listing registered commands.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl ApplicationCommandOption {
    fn dice_count(name: &str, description: &str, required: bool) -> Self {
        ApplicationCommandOption {
            name: name.into(),
            description: description.into(),
            r#type: OPTION_TYPE_INTEGER,
            required,
            min_value: Some(0),
            max_value: Some(MAX_DICE_PER_POOL as i64),
        }
    }
}

pub fn command_definitions() -> Vec<ApplicationCommand> {
    vec![
        ApplicationCommand {
            name: "roll".into(),
            description: "Roll a six-sided die or pool".into(),
            options: vec![
                ApplicationCommandOption::dice_count(
                    "light",
                    "Number of light dice (default 1)",
                    false,
                ),
                ApplicationCommandOption::dice_count(
                    "dark",
                    "Number of dark dice (default 0)",
                    false,
                ),
            ],
        },
        ApplicationCommand {
            name: "combat".into(),
            description: "Trophy Gold endurance test".into(),
            options: vec![
                ApplicationCommandOption::dice_count("dark", "Number of dark dice", true),
                ApplicationCommandOption {
                    name: "endurance".into(),
                    description: "Monster endurance value".into(),
                    r#type: OPTION_TYPE_INTEGER,
                    required: true,
                    min_value: None,
                    max_value: None,
                },
            ],
        },
        ApplicationCommand {
            name: "gold".into(),
            description: "Trophy Gold loot roll".into(),
            options: vec![ApplicationCommandOption::dice_count(
                "count",
                "Number of gold dice to roll",
                true,
            )],
        },
    ]
}
