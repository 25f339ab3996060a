//! Waypoint library exports for testing

pub mod core;
pub mod host;
pub mod tui;

#[cfg(test)]
pub mod test_support;
