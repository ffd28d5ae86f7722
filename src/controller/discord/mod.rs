pub mod combat;
pub mod gold;
pub mod interaction;
pub mod roll;
