use std::fmt::{Display, Formatter};

use command_macros::command_handler;

use crate::shared::NO_DICE_ROLLED;
use crate::shared::error::CommandError;
use crate::shared::structs::discord::interaction::CommandOption;
use crate::shared::utility::dice::DiceRoller;
use crate::shared::utility::join_rolls;
use crate::shared::utility::options::ParsedRollOptions;

/// Ordering matters: on equal values the later variant is the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoolColor {
    Light,
    Dark,
}

impl Display for PoolColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolColor::Light => write!(f, "Light"),
            PoolColor::Dark => write!(f, "Dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRoll {
    pub color: PoolColor,
    pub rolls: Vec<u8>,
}

#[command_handler]
pub fn roll(options: &[CommandOption], dice: &mut dyn DiceRoller) -> Result<String, CommandError> {
    let parsed = ParsedRollOptions::parse(options)?;

    if parsed.is_empty() {
        return Ok(format!("You rolled: {}", dice.roll_d6()));
    }

    let light = parsed.light.unwrap_or_default();
    let dark = parsed.dark.unwrap_or_default();

    if light == 0 && dark == 0 {
        return Ok(NO_DICE_ROLLED.to_string());
    }

    let mut pools = Vec::with_capacity(2);
    if light > 0 {
        pools.push(PoolRoll {
            color: PoolColor::Light,
            rolls: dice.roll_pool(light.into())?,
        });
    }
    if dark > 0 {
        pools.push(PoolRoll {
            color: PoolColor::Dark,
            rolls: dice.roll_pool(dark.into())?,
        });
    }

    Ok(describe_pools(&pools))
}

/// The highest die across all pools, keyed on `(value, color)`.
pub fn highest(pools: &[PoolRoll]) -> Option<(u8, PoolColor)> {
    pools
        .iter()
        .flat_map(|pool| pool.rolls.iter().map(move |value| (*value, pool.color)))
        .max()
}

pub fn describe_pools(pools: &[PoolRoll]) -> String {
    let listed = pools
        .iter()
        .filter(|pool| !pool.rolls.is_empty())
        .map(|pool| format!("{} {}", pool.color, join_rolls(&pool.rolls)))
        .collect::<Vec<_>>()
        .join(" ");

    match highest(pools) {
        Some((value, color)) => format!("{listed} => {color} {value} is highest"),
        None => NO_DICE_ROLLED.to_string(),
    }
}
