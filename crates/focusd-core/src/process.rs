//! Process enumeration and suspend/resume control
//!
//! The session engine sees the OS through two small traits: `ProcessSnapshot`
//! enumerates the process table, `ProcessControl` pauses and unpauses a
//! single process by pid. `SystemProcesses` is the production implementation:
//! enumeration via sysinfo, suspension via SIGSTOP/SIGCONT.

use sysinfo::{ProcessesToUpdate, System};
use thiserror::Error;
use tracing::debug;

#[cfg(unix)]
const SIG_SUSPEND: i32 = libc::SIGSTOP;
#[cfg(unix)]
const SIG_RESUME: i32 = libc::SIGCONT;

// Placeholders so suspend/resume still compile where signals do not exist;
// send_signal rejects the call on those platforms.
#[cfg(not(unix))]
const SIG_SUSPEND: i32 = 0;
#[cfg(not(unix))]
const SIG_RESUME: i32 = 0;

/// Process control errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("process {0} not found")]
    NotFound(u32),

    #[error("permission denied for process {0}")]
    PermissionDenied(u32),

    #[error("process control failed: {0}")]
    Other(String),
}

/// Coarse process state, mapped from the host process table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Other,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Sleeping => "sleeping",
            Self::Stopped => "stopped",
            Self::Zombie => "zombie",
            Self::Other => "other",
        }
    }
}

impl From<sysinfo::ProcessStatus> for ProcessStatus {
    fn from(status: sysinfo::ProcessStatus) -> Self {
        match status {
            sysinfo::ProcessStatus::Run => Self::Running,
            sysinfo::ProcessStatus::Sleep | sysinfo::ProcessStatus::Idle => Self::Sleeping,
            sysinfo::ProcessStatus::Stop => Self::Stopped,
            sysinfo::ProcessStatus::Zombie => Self::Zombie,
            _ => Self::Other,
        }
    }
}

/// One observed process; re-derived on every scan, never cached across scans
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub status: ProcessStatus,
}

/// Enumerate currently running processes.
///
/// Implementations must skip processes they cannot read rather than failing
/// the whole snapshot.
pub trait ProcessSnapshot {
    fn processes(&self) -> Vec<ProcessInfo>;
}

/// Pause and unpause a single process by pid.
///
/// Both calls return the display name of the matched process on success.
pub trait ProcessControl {
    fn suspend(&self, pid: u32) -> Result<String, ProcessError>;
    fn resume(&self, pid: u32) -> Result<String, ProcessError>;
}

/// The full capability the engine consumes
pub trait ProcessHost: ProcessSnapshot + ProcessControl + Send + Sync {}

impl<T: ProcessSnapshot + ProcessControl + Send + Sync> ProcessHost for T {}

/// Host process table backed by sysinfo and Unix signals
#[derive(Debug, Default)]
pub struct SystemProcesses;

impl SystemProcesses {
    pub fn new() -> Self {
        Self
    }

    /// Look up a process's display name, or NotFound if it is gone.
    fn display_name(&self, pid: u32) -> Result<String, ProcessError> {
        let target = sysinfo::Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);

        sys.process(target)
            .map(|p| p.name().to_string_lossy().into_owned())
            .ok_or(ProcessError::NotFound(pid))
    }
}

impl ProcessSnapshot for SystemProcesses {
    fn processes(&self) -> Vec<ProcessInfo> {
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::All, true);

        sys.processes()
            .iter()
            .map(|(pid, proc_)| ProcessInfo {
                pid: pid.as_u32(),
                name: proc_.name().to_string_lossy().into_owned(),
                status: ProcessStatus::from(proc_.status()),
            })
            .collect()
    }
}

impl ProcessControl for SystemProcesses {
    fn suspend(&self, pid: u32) -> Result<String, ProcessError> {
        let name = self.display_name(pid)?;
        send_signal(pid, SIG_SUSPEND)?;
        debug!(pid, name = %name, "sent SIGSTOP");
        Ok(name)
    }

    fn resume(&self, pid: u32) -> Result<String, ProcessError> {
        let name = self.display_name(pid)?;
        send_signal(pid, SIG_RESUME)?;
        debug!(pid, name = %name, "sent SIGCONT");
        Ok(name)
    }
}

/// Send a signal to a process, mapping errno to a typed error.
#[cfg(unix)]
fn send_signal(pid: u32, signal: i32) -> Result<(), ProcessError> {
    let result = unsafe { libc::kill(pid as i32, signal) };
    if result == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(ProcessError::NotFound(pid)),
        Some(libc::EPERM) => Err(ProcessError::PermissionDenied(pid)),
        _ => Err(ProcessError::Other(err.to_string())),
    }
}

#[cfg(not(unix))]
fn send_signal(_pid: u32, _signal: i32) -> Result<(), ProcessError> {
    Err(ProcessError::Other(
        "process suspension is not supported on this platform".to_string(),
    ))
}
