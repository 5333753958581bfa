//! Core types for Cosmic Whisper: the archetype catalog, spread layouts, and
//! the cards a reading produces.
//!
//! This crate is pure data. Randomness, session flow and persistence live in
//! `cw-reading`; everything here can be constructed by hand or deserialized
//! from a journal blob.

/// Archetypes, drawn cards, and position-bound cards.
pub mod card;
/// The static Major Arcana catalog.
pub mod catalog;
/// Error types used throughout the crate.
pub mod error;
/// Spread definitions and the shipped layouts.
pub mod spread;

/// Re-export card types.
pub use card::{Archetype, DrawnCard, PositionedCard};
/// Re-export the catalog.
pub use catalog::Catalog;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export spread types.
pub use spread::{Position, SpreadDefinition};
