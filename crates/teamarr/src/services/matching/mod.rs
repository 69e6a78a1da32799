//! Stream-to-event matching: text normalization, fuzzy scoring, per-league
//! resolution, and the cross-group reconciliation passes that run after.

pub mod enforcement;
pub mod fuzzy;
pub mod multi_league;
pub mod normalize;
pub mod single_league;
