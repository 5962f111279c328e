//! Session engine
//!
//! The state machine behind a focus session: initial scan and suspend,
//! periodic rescans for newly launched matches, cooperative cancellation,
//! resume-all on exit, and the stats commit. One engine runs at most one
//! session at a time; the session occupies the calling task while `status`,
//! `stats` and `stop_session` may be called from any other task holding the
//! same `Arc<FocusEngine>`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use focusd_core::{ProcessHost, ProcessInfo};
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::blacklist::Blacklist;
use crate::ledger::Ledger;
use crate::session::Session;
use crate::stats::{SessionStats, StatsOrigin, StatsStore};

/// How often the monitoring loop rescans the process table
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Shortest session a caller may request, in minutes
pub const MIN_SESSION_MINUTES: u64 = 1;
/// Longest session a caller may request, in minutes
pub const MAX_SESSION_MINUTES: u64 = 240;

/// Engine-level errors; all are caller mistakes, none change engine state
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("a focus session is already active")]
    AlreadyActive,

    #[error("no focus session is active")]
    NotActive,

    #[error("session duration must be between 1 and 240 minutes, got {0}")]
    InvalidDuration(u64),
}

/// Observer view of the engine
#[derive(Debug, Clone)]
pub struct EngineStatus {
    pub active: bool,
    /// Processes currently held suspended by this engine
    pub suspended_count: usize,
    /// Time left in the active session, if one is running
    pub remaining: Option<Duration>,
}

/// What a finished session looked like
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    /// Actual wall-clock minutes, start to end (fractional)
    pub elapsed_minutes: f64,
    /// Processes blocked during this session
    pub blocked: u64,
    /// True if the session was stopped before its deadline
    pub cancelled: bool,
}

/// The focus session engine
pub struct FocusEngine {
    blacklist: Blacklist,
    host: Box<dyn ProcessHost>,
    store: StatsStore,
    stats: Mutex<SessionStats>,
    ledger: Mutex<Ledger>,
    session: Mutex<Option<Session>>,
    active: AtomicBool,
    cancel: Notify,
    poll_interval: Duration,
}

impl FocusEngine {
    /// Build an engine. Loads persisted stats immediately; a missing or
    /// corrupt stats file degrades to zeroed counters (see `stats_origin`).
    pub fn new(blacklist: Blacklist, mut store: StatsStore, host: Box<dyn ProcessHost>) -> Self {
        let stats = store.load();
        Self {
            blacklist,
            host,
            store,
            stats: Mutex::new(stats),
            ledger: Mutex::new(Ledger::new()),
            session: Mutex::new(None),
            active: AtomicBool::new(false),
            cancel: Notify::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the rescan cadence
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run a focus session for `duration_minutes`, occupying the calling
    /// task until the session ends or `stop_session` is called elsewhere.
    pub async fn start_session(&self, duration_minutes: u64) -> Result<SessionSummary, EngineError> {
        if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(&duration_minutes) {
            return Err(EngineError::InvalidDuration(duration_minutes));
        }
        self.run_session(Duration::from_secs(duration_minutes * 60))
            .await
    }

    /// Request that the active session stop. The sleeping session task is
    /// woken immediately; it performs resume-all and the stats commit before
    /// its `start_session` call returns.
    pub fn stop_session(&self) -> Result<(), EngineError> {
        // CAS so concurrent stops race cleanly: exactly one wins
        if self
            .active
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineError::NotActive);
        }
        self.cancel.notify_one();
        info!("session stop requested");
        Ok(())
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            active: self.active.load(Ordering::SeqCst),
            suspended_count: self.ledger.lock().unwrap().len(),
            remaining: self
                .session
                .lock()
                .unwrap()
                .as_ref()
                .map(|s| s.remaining()),
        }
    }

    pub fn stats(&self) -> SessionStats {
        *self.stats.lock().unwrap()
    }

    pub fn blacklist(&self) -> &[String] {
        self.blacklist.entries()
    }

    /// Whether `stats()` reflects persisted counters or fallback defaults
    pub fn stats_origin(&self) -> StatsOrigin {
        self.store.origin()
    }

    /// The session lifecycle proper, with the duration already validated.
    pub(crate) async fn run_session(&self, duration: Duration) -> Result<SessionSummary, EngineError> {
        // Check-and-set must be atomic so two concurrent starts cannot both
        // believe they won.
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(EngineError::AlreadyActive);
        }

        let session = Session::begin(duration);
        *self.session.lock().unwrap() = Some(session.clone());
        let blocked_before = self.stats.lock().unwrap().processes_blocked;

        info!(
            minutes = duration.as_secs_f64() / 60.0,
            "focus session started"
        );

        // Initial scan: suspend everything already running
        let matches = self.scan();
        info!(count = matches.len(), "initial scan complete");
        for proc in &matches {
            if self.try_suspend(proc) {
                info!(pid = proc.pid, name = %proc.name, "blocked");
            }
        }

        // Monitor loop: sleep, then rescan for newly launched matches. The
        // sleep is the sole suspension point and must stay interruptible so
        // a stop request never waits out the full interval chain.
        while !session.expired() && self.active.load(Ordering::SeqCst) {
            debug!(
                remaining_secs = session.remaining().as_secs(),
                "waiting for next rescan"
            );
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = self.cancel.notified() => {}
            }
            if !self.active.load(Ordering::SeqCst) {
                break;
            }

            for proc in self.scan() {
                if self.ledger.lock().unwrap().contains(proc.pid) {
                    continue;
                }
                if self.try_suspend(&proc) {
                    info!(pid = proc.pid, name = %proc.name, "blocked new process");
                }
            }
        }

        let cancelled = !self.active.load(Ordering::SeqCst);
        Ok(self.finish(&session, blocked_before, cancelled))
    }

    /// Snapshot the process table and keep the blacklist matches. A snapshot
    /// that omits unreadable processes is fine; it never fails wholesale.
    fn scan(&self) -> Vec<ProcessInfo> {
        self.host
            .processes()
            .into_iter()
            .filter(|p| self.blacklist.is_blacklisted(&p.name))
            .collect()
    }

    /// Suspend one process and register it. Counts `processes_blocked`
    /// exactly once per newly tracked pid; a pid already in the ledger is
    /// left alone. Failure is logged and reported, never fatal.
    fn try_suspend(&self, proc: &ProcessInfo) -> bool {
        if self.ledger.lock().unwrap().contains(proc.pid) {
            return true;
        }

        match self.host.suspend(proc.pid) {
            Ok(name) => {
                let newly_tracked = self.ledger.lock().unwrap().insert(proc.pid);
                if newly_tracked {
                    self.stats.lock().unwrap().processes_blocked += 1;
                }
                debug!(pid = proc.pid, name = %name, "suspended");
                true
            }
            Err(err) => {
                warn!(pid = proc.pid, name = %proc.name, error = %err, "could not suspend process");
                false
            }
        }
    }

    /// Resume every tracked process. A failed resume leaves its pid in the
    /// ledger as a leak and is reported; the rest are still resumed.
    fn resume_all(&self) {
        let pids = self.ledger.lock().unwrap().pids();
        for pid in pids {
            match self.host.resume(pid) {
                Ok(name) => {
                    self.ledger.lock().unwrap().remove(pid);
                    debug!(pid, name = %name, "resumed");
                }
                Err(err) => {
                    warn!(pid, error = %err, "could not resume process, leaving it suspended");
                }
            }
        }

        let leaked = self.ledger.lock().unwrap().len();
        if leaked > 0 {
            warn!(count = leaked, "processes left suspended after resume pass");
        }
    }

    /// The Running -> Idle transition: resume everything, then commit stats.
    /// Runs exactly once per session; the session slot is the guard.
    fn finish(&self, session: &Session, blocked_before: u64, cancelled: bool) -> SessionSummary {
        self.active.store(false, Ordering::SeqCst);
        if self.session.lock().unwrap().take().is_none() {
            // Already finished
            return SessionSummary::default();
        }

        self.resume_all();

        let elapsed = session.elapsed_minutes();
        let stats = {
            let mut stats = self.stats.lock().unwrap();
            stats.total_sessions += 1;
            stats.total_minutes += elapsed.floor() as u64;
            *stats
        };
        self.store.save(&stats);

        info!(minutes = elapsed, cancelled, "focus session ended");

        SessionSummary {
            elapsed_minutes: elapsed,
            blocked: stats.processes_blocked - blocked_before,
            cancelled,
        }
    }
}
