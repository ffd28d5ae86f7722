use crate::shared::MAX_DICE_PER_POOL;
use crate::shared::error::CommandError;
use crate::shared::structs::discord::interaction::CommandOption;

pub const LIGHT_OPTION: &str = "light";
pub const DARK_OPTION: &str = "dark";

/// Normalized `/roll` arguments. `None` means the side was not given at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedRollOptions {
    pub light: Option<u32>,
    pub dark: Option<u32>,
}

impl ParsedRollOptions {
    pub fn is_empty(&self) -> bool {
        self.light.is_none() && self.dark.is_none()
    }

    /// Structured `light`/`dark` options win. Only when neither is present are
    /// digit runs pulled out of the remaining options, first light then dark.
    pub fn parse(options: &[CommandOption]) -> Result<Self, CommandError> {
        let light = integer_option(options, LIGHT_OPTION);
        let dark = integer_option(options, DARK_OPTION);

        let (light, dark) = if light.is_some() || dark.is_some() {
            (light, dark)
        } else {
            let mut tokens = free_text_tokens(options).into_iter();
            (tokens.next(), tokens.next())
        };

        Ok(ParsedRollOptions {
            light: light.map(|v| dice_count(LIGHT_OPTION, v)).transpose()?,
            dark: dark.map(|v| dice_count(DARK_OPTION, v)).transpose()?,
        })
    }
}

/// First option called `name` holding an integer. Later duplicates are ignored.
pub fn integer_option(options: &[CommandOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|o| o.name == name && o.integer().is_some())
        .and_then(CommandOption::integer)
}

pub fn required_integer(options: &[CommandOption], name: &str) -> Result<i64, CommandError> {
    integer_option(options, name)
        .ok_or_else(|| CommandError::invalid_options(format!("Missing required option: {name}")))
}

/// Validates a requested pool size against the per-pool bounds.
pub fn dice_count(name: &str, value: i64) -> Result<u32, CommandError> {
    if value < 0 {
        return Err(CommandError::invalid_options(format!(
            "Invalid options: {name} must be zero or more, got {value}"
        )));
    }

    match u32::try_from(value) {
        Ok(count) if count <= MAX_DICE_PER_POOL => Ok(count),
        _ => Err(CommandError::invalid_options(format!(
            "Invalid options: {name} can be at most {MAX_DICE_PER_POOL}, got {value}"
        ))),
    }
}

fn free_text_tokens(options: &[CommandOption]) -> Vec<i64> {
    let mut tokens = Vec::new();

    for option in options {
        let mut found = option.text().map(digit_tokens).unwrap_or_default();
        if found.is_empty() {
            found = digit_tokens(&option.name);
        }
        tokens.extend(found);

        if tokens.len() >= 2 {
            break;
        }
    }

    tokens
}

/// Runs of ASCII digits in order of appearance. Runs too long for an `i64`
/// saturate so that the bounds check rejects them.
pub fn digit_tokens(text: &str) -> Vec<i64> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse().unwrap_or(i64::MAX))
        .collect()
}
