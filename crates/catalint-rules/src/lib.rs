//! # Catalint Rules
//!
//! The domain-logic stages of the pipeline: cross-field logic validation,
//! non-destructive field derivation, and additive fix suggestion. All three
//! consume the same loaded sources and the same rule configuration, so a
//! contradiction flagged by the logic pass and a value proposed by the fix
//! pass always agree on what the suffix table says.

pub mod derive;
pub mod fixes;
pub mod logic;

pub use derive::{apply_derivations, derive_axle_config};
pub use fixes::suggest_fixes;
pub use logic::{LogicOutcome, validate_logic};
