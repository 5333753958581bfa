//! Reading session engine for Cosmic Whisper.
//!
//! Provides the draw engine (sampling without replacement plus independent
//! reversals), the session state machine that walks a querent from question
//! to interpretation, journal assembly and persistence, the collaborator
//! interfaces for keyword analysis and narrative generation, and an async
//! runtime that ties them together.

pub mod config;
pub mod draw;
pub mod error;
pub mod journal;
pub mod oracle;
pub mod runtime;
pub mod session;
pub mod theme;

pub use config::ReadingConfig;
pub use draw::{Deck, draw, pair_with_positions};
pub use error::{ReadingError, ReadingResult};
pub use journal::{Journal, JournalEntry, JournalStore};
pub use runtime::{Outcome, ReadingRuntime};
pub use session::{Effect, Event, Ignored, Phase, SessionState, transition};
