pub mod error;
pub mod middleware;
pub mod structs;
pub mod utility;

pub const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/trophy-bot/trophy-bot, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

pub const DEFAULT_MAX_BODY_SIZE: usize = 8 * 1024;
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: i64 = 5;

pub const MAX_DICE_PER_POOL: u32 = 100;

pub const DISCORD_ROOT_ENDPOINT: &str = "https://discord.com/api/v10";
pub const DISCORD_GLOBAL_COMMANDS_ENDPOINT: &str = "/applications/$APPLICATION_ID/commands";
pub const DISCORD_GUILD_COMMANDS_ENDPOINT: &str =
    "/applications/$APPLICATION_ID/guilds/$GUILD_ID/commands";

pub const NO_DICE_ROLLED: &str = "No dice rolled.";
