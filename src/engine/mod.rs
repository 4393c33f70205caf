//! The session state machine: sessions, scheduling, countdown, engine.
//!
//! ## Key Types
//!
//! - `GameSession`: one run of the game (board, counters, outcome)
//! - `MatchEngine`: consumes flips and elapsed time, resolves pairs
//! - `TaskScheduler`: cancellable delayed work, tagged by session
//! - `Countdown`: whole-second timer driving the loss transition
//!
//! Everything is single-threaded and event-driven; time enters only
//! through `MatchEngine::advance`.

pub mod machine;
pub mod scheduler;
pub mod session;
pub mod timer;

pub use machine::{EngineError, FlipOutcome, FlipRejection, MatchEngine, TimingConfig};
pub use scheduler::{ScheduledTask, TaskKind, TaskScheduler};
pub use session::{EventRecord, GameSession, Outcome, Phase, SessionId};
pub use timer::Countdown;
