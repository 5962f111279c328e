//! focusd - time-boxed focus sessions that suspend distracting processes
//!
//! "Protect the sacred space of deep work."
//!
//! A focus session scans the process table for blacklisted names, suspends
//! every match, then rescans at a fixed cadence to catch newly launched
//! distractions until the session times out or is stopped. On exit every
//! suspended process is resumed and lifetime statistics are persisted.
//!
//! Commands:
//! - start [MINS]: Run a focus session (default: 25 minutes)
//! - processes: Show blacklist matches currently running
//! - stats: Show lifetime statistics
//! - blacklist: Show the active blacklist

pub mod blacklist;
pub mod engine;
pub mod ledger;
pub mod session;
pub mod stats;

pub use blacklist::Blacklist;
pub use engine::{EngineError, EngineStatus, FocusEngine, SessionSummary};
pub use ledger::Ledger;
pub use session::Session;
pub use stats::{SessionStats, StatsOrigin, StatsStore};
