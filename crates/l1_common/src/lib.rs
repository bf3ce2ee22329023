//! Common helpers shared between L1 crates

pub mod nom_helpers;
