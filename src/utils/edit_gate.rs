use crate::error::ProdeError;
use crate::models::Match;
use crate::utils::status::{display_status, DisplayStatus};
use std::collections::HashMap;
use tracing::debug;

/// Whether a match still accepts new or edited predictions.
///
/// Starts `Open` when the match is scheduled and locks for good the first time
/// the match is seen in any state other than upcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditGate {
    #[default]
    Open,
    Locked,
}

impl EditGate {
    pub fn scheduled() -> Self {
        EditGate::Open
    }

    /// Gate for a match seen for the first time with this wire status
    pub fn for_status(wire_status: &str) -> Self {
        EditGate::scheduled().observe(wire_status)
    }

    /// Advance with a freshly observed wire status. Unknown statuses lock too.
    pub fn observe(self, wire_status: &str) -> Self {
        match (self, display_status(wire_status)) {
            (EditGate::Open, Ok(DisplayStatus::Upcoming)) => EditGate::Open,
            _ => EditGate::Locked,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, EditGate::Open)
    }

    pub fn ensure_open(&self, match_id: &str) -> Result<(), ProdeError> {
        match self {
            EditGate::Open => Ok(()),
            EditGate::Locked => Err(ProdeError::PredictionLocked(match_id.to_string())),
        }
    }
}

/// Remembers one gate per match across refreshes so a match that once left
/// `upcoming` stays locked even if a later payload says otherwise
#[derive(Debug, Clone, Default)]
pub struct GateBook {
    gates: HashMap<String, EditGate>,
}

impl GateBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, m: &Match) -> EditGate {
        let gate = self.gates.entry(m.id.clone()).or_default();
        let next = gate.observe(&m.status);
        if *gate != next {
            debug!("Predictions locked for {} ({})", m.title(), m.status);
        }
        *gate = next;
        next
    }

    pub fn observe_all(&mut self, matches: &[Match]) {
        for m in matches {
            self.observe(m);
        }
    }

    /// Matches never observed are treated as freshly scheduled
    pub fn gate(&self, match_id: &str) -> EditGate {
        self.gates.get(match_id).copied().unwrap_or_default()
    }
}
