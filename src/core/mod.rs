//! Core engine types: cards, gifts, level configuration, RNG.
//!
//! This module contains the fundamental building blocks shared by the
//! deck generator, the match engine, and the score ledger. Levels are
//! configured via `LevelTable` rather than hardcoded in the engine.

pub mod card;
pub mod config;
pub mod rng;

pub use card::{Card, GiftId};
pub use config::{LevelConfig, LevelId, LevelTable};
pub use rng::DeckRng;
