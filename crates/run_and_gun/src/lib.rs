//! # Run and Gun
//!
//! Side-scrolling shooter built on `platformer_engine`: a player that runs,
//! jumps, ducks and shoots, stationary enemies that shoot back, and moving
//! platforms that carry whoever stands on them.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod demo;
pub mod entities;
pub mod session;
pub mod sprites;


pub use config::GameConfig;
pub use session::{GameSession, SessionError, StepOutcome};
