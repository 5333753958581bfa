//! Reading session state machine.
//!
//! A session walks one querent from question to interpretation. State only
//! changes through [`transition`], which is pure apart from drawing from the
//! deck; everything that touches the outside world is returned as an
//! [`Effect`] for the runtime to execute.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{NarrativeStatus, Phase, SessionState};
pub use transition::{Ignored, Transition, transition};
