use command_macros::command_handler;

use crate::shared::NO_DICE_ROLLED;
use crate::shared::error::CommandError;
use crate::shared::structs::discord::interaction::CommandOption;
use crate::shared::utility::dice::DiceRoller;
use crate::shared::utility::join_rolls;
use crate::shared::utility::options::{dice_count, required_integer};

pub const COUNT_OPTION: &str = "count";

#[command_handler]
pub fn gold(options: &[CommandOption], dice: &mut dyn DiceRoller) -> Result<String, CommandError> {
    let count = dice_count(COUNT_OPTION, required_integer(options, COUNT_OPTION)?)?;

    if count == 0 {
        return Ok(NO_DICE_ROLLED.to_string());
    }

    let rolls = dice.roll_pool(count.into())?;
    let total: u32 = rolls.iter().map(|v| u32::from(*v)).sum();

    Ok(format!("Gold {} => {} gold", join_rolls(&rolls), total))
}
