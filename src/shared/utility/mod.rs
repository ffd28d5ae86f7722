pub mod dice;
pub mod discord;
pub mod options;

/// Space-separated rendering of a roll sequence, in draw order.
pub fn join_rolls(rolls: &[u8]) -> String {
    rolls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
