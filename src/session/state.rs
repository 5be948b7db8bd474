//! Session gate: the state every scheduled continuation checks.
//!
//! Three orthogonal values:
//! - `enabled`: whether the session is active at all
//! - `epoch`: bumped whenever outstanding work becomes stale
//! - `prefix`: the configured prefix length
//!
//! Work scheduled for later holds a [`Ticket`] and checks
//! [`Ticket::is_live`] each time it resumes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use crate::bionic::PrefixLength;

#[derive(Debug)]
pub struct SessionGate {
    enabled: AtomicBool,
    epoch: AtomicU64,
    prefix: AtomicU8,
}

impl SessionGate {
    pub fn new(prefix: PrefixLength) -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            prefix: AtomicU8::new(prefix.as_u8()),
        })
    }

    // =========================================================================
    // enabled
    // =========================================================================

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Set enabled state; turning it off invalidates outstanding tickets.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.invalidate();
        }
    }

    // =========================================================================
    // epoch
    // =========================================================================

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Make every outstanding ticket stale.
    pub fn invalidate(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    // =========================================================================
    // prefix
    // =========================================================================

    pub fn prefix(&self) -> PrefixLength {
        PrefixLength::new(i64::from(self.prefix.load(Ordering::SeqCst))).unwrap_or_default()
    }

    pub fn set_prefix(&self, prefix: PrefixLength) {
        self.prefix.store(prefix.as_u8(), Ordering::SeqCst);
    }

    /// Snapshot for work about to be scheduled.
    pub fn ticket(self: &Arc<Self>) -> Ticket {
        Ticket {
            gate: Arc::clone(self),
            epoch: self.epoch(),
            prefix: self.prefix(),
        }
    }
}

/// Permission for one scheduled pass to keep going.
#[derive(Debug, Clone)]
pub struct Ticket {
    gate: Arc<SessionGate>,
    epoch: u64,
    prefix: PrefixLength,
}

impl Ticket {
    /// Session still enabled and nothing invalidated since issue.
    pub fn is_live(&self) -> bool {
        self.gate.is_enabled() && self.gate.epoch() == self.epoch
    }

    /// Prefix length in force when the ticket was issued.
    #[inline]
    pub fn prefix(&self) -> PrefixLength {
        self.prefix
    }
}
