use std::fmt::{Display, Formatter};

use command_macros::command_handler;

use crate::shared::error::CommandError;
use crate::shared::structs::discord::interaction::CommandOption;
use crate::shared::utility::dice::DiceRoller;
use crate::shared::utility::join_rolls;
use crate::shared::utility::options::{DARK_OPTION, dice_count, required_integer};

pub const ENDURANCE_OPTION: &str = "endurance";

const RUIN_REMINDER: &str = "If any die matches your weak point, mark Ruin";

/// The two highest dice summed against a monster's endurance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnduranceCheck {
    pub rolls: Vec<u8>,
    /// Ascending.
    pub top: Vec<u8>,
    pub total: i64,
    pub endurance: i64,
}

impl EnduranceCheck {
    pub fn resolve(rolls: Vec<u8>, endurance: i64) -> Self {
        let mut top = rolls.clone();
        top.sort_unstable_by(|a, b| b.cmp(a));
        top.truncate(2);
        top.reverse();

        let total = top.iter().map(|v| i64::from(*v)).sum();

        EnduranceCheck {
            rolls,
            top,
            total,
            endurance,
        }
    }

    pub fn is_success(&self) -> bool {
        self.total >= self.endurance
    }
}

impl Display for EnduranceCheck {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let top = self
            .top
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("+");

        let (outcome, comparison) = if self.is_success() {
            ("Success", ">=")
        } else {
            ("Failure", "<")
        };

        writeln!(f, "Dice: {}", join_rolls(&self.rolls))?;
        writeln!(f, "Top {}: {} = {}", self.top.len(), top, self.total)?;
        writeln!(f, "Outcome: {outcome} ({comparison} {})", self.endurance)?;
        write!(f, "{RUIN_REMINDER}")
    }
}

#[command_handler]
pub fn combat(
    options: &[CommandOption],
    dice: &mut dyn DiceRoller,
) -> Result<String, CommandError> {
    let dark = required_integer(options, DARK_OPTION)?;
    let endurance = required_integer(options, ENDURANCE_OPTION)?;

    let dark = dice_count(DARK_OPTION, dark)?;
    if dark == 0 {
        return Err(CommandError::invalid_options(
            "Invalid options: combat needs at least one dark die",
        ));
    }

    let rolls = dice.roll_pool(dark.into())?;

    Ok(EnduranceCheck::resolve(rolls, endurance).to_string())
}
