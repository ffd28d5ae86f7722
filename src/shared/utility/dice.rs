//! Six-sided dice backed by the operating system's CSPRNG.
//!
//! Handlers only see the [`DiceRoller`] trait so tests can script the draws
//! and observe exactly which pools were requested.
use rand::Rng;
use rand::rngs::OsRng;

use crate::shared::error::DiceError;

pub const DIE_FACES: u8 = 6;

pub trait DiceRoller {
    /// A single value in `1..=6`.
    fn roll_d6(&mut self) -> u8;

    /// `count` independent draws in draw order. An empty pool is not an error.
    fn roll_pool(&mut self, count: i64) -> Result<Vec<u8>, DiceError> {
        if count < 0 {
            return Err(DiceError::InvalidArgument(count));
        }

        Ok((0..count).map(|_| self.roll_d6()).collect())
    }
}

/// Stateless from the caller's perspective; every request builds its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureDice;

impl DiceRoller for SecureDice {
    fn roll_d6(&mut self) -> u8 {
        OsRng.gen_range(1..=DIE_FACES)
    }
}
