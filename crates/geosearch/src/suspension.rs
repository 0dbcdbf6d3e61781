//! Temporary suspension of the host map's gesture handlers.
//!
//! While the pointer is over the search form, dragging or scrolling must not
//! move the map underneath it. [`HandlerSuspension`] records which handlers
//! were enabled, disables them, and later re-enables exactly those.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::map::{Handler, HostMap};

/// Enablement of every handler at the moment the pointer entered the form.
///
/// `None` marks a handler the host does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerSnapshot {
    states: [Option<bool>; Handler::ALL.len()],
}

impl HandlerSnapshot {
    /// Read the current handler table from the host.
    pub fn capture(map: &impl HostMap) -> Self {
        let mut states = [None; Handler::ALL.len()];
        for handler in Handler::ALL {
            states[handler.index()] = map.handler_enabled(handler);
        }
        Self { states }
    }

    pub const fn get(&self, handler: Handler) -> Option<bool> {
        self.states[handler.index()]
    }

    /// Handlers that were enabled and therefore need re-enabling.
    pub fn enabled(&self) -> impl Iterator<Item = Handler> + '_ {
        Handler::ALL
            .into_iter()
            .filter(|handler| self.get(*handler) == Some(true))
    }
}

impl fmt::Display for HandlerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.enabled().join(", "))
    }
}

/// Result of asking for a suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspendOutcome {
    Suspended,
    /// A snapshot was already outstanding and has been kept as is.
    AlreadySuspended,
}

/// Owns at most one outstanding [`HandlerSnapshot`].
#[derive(Debug, Default)]
pub struct HandlerSuspension {
    snapshot: Option<HandlerSnapshot>,
}

impl HandlerSuspension {
    pub const fn new() -> Self {
        Self { snapshot: None }
    }

    pub const fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    pub const fn snapshot(&self) -> Option<&HandlerSnapshot> {
        self.snapshot.as_ref()
    }

    /// Snapshot the handler table and disable every present handler.
    ///
    /// A second call before [`HandlerSuspension::restore`] is ignored, so the
    /// original state survives repeated enter events.
    pub fn suspend(&mut self, map: &mut impl HostMap) -> SuspendOutcome {
        if let Some(existing) = &self.snapshot {
            warn!(snapshot = %existing, "Handlers already suspended, keeping outstanding snapshot");
            return SuspendOutcome::AlreadySuspended;
        }

        let snapshot = HandlerSnapshot::capture(&*map);
        for handler in Handler::ALL {
            if snapshot.get(handler).is_some() {
                map.disable_handler(handler);
            }
        }
        debug!(restore = %snapshot, "Suspended map handlers");
        self.snapshot = Some(snapshot);
        SuspendOutcome::Suspended
    }

    /// Re-enable the handlers that were enabled at suspension time.
    ///
    /// Returns `false` when there was nothing to restore.
    pub fn restore(&mut self, map: &mut impl HostMap) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        for handler in snapshot.enabled() {
            map.enable_handler(handler);
        }
        debug!(restored = %snapshot, "Restored map handlers");
        true
    }
}
