//! Animation layer boundary (message passing)
//!
//! ```text
//! core ──request_trigger──▶ Animator outbox ──drain──▶ host AnimationTree
//! host ──report_progress──▶ Animator (playing/progress)
//! host ──AnimationCallback event──▶ equipment systems (next tick)
//! ```
//!
//! Core никогда не предполагает синхронного завершения.

pub mod events;
pub mod oracle;
pub mod wait;

pub use events::*;
pub use oracle::*;
pub use wait::*;
