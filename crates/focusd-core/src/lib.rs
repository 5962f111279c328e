//! Focusd Core - Shared functionality for focusd
//!
//! Standard paths and the OS process adapter (enumeration plus the
//! suspend/resume capability) consumed by the session engine.

pub mod paths;
pub mod process;

pub use paths::Paths;
pub use process::{
    ProcessControl, ProcessError, ProcessHost, ProcessInfo, ProcessSnapshot, ProcessStatus,
    SystemProcesses,
};
