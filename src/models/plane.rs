//! Plane (task) model.
//!
//! A plane is one unit of work competing for a runway. Planes are immutable
//! inputs: the per-run countdown of remaining work lives in
//! [`RunState`](crate::dispatching::RunState), never on the plane itself, so
//! the same plane list can feed several independent runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Tick;

/// A plane waiting for a runway slot.
///
/// # Time Representation
/// All times are abstract ticks relative to the start of the run (t=0).
///
/// # JSON
/// Reads the generator format directly; `type` is accepted as an alias for
/// `kind`:
///
/// ```
/// use runway_schedule::models::{Plane, PlaneKind};
///
/// let plane: Plane = serde_json::from_str(
///     r#"{"id":"PL1001","type":"landing","priority":2,"arrival_time":14,"deadline":90}"#,
/// ).unwrap();
/// assert_eq!(plane.kind, PlaneKind::Landing);
/// assert_eq!(plane.deadline, Some(90));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plane {
    /// Unique plane identifier.
    pub id: String,
    /// Operation category.
    #[serde(alias = "type")]
    pub kind: PlaneKind,
    /// Urgency (lower = more urgent). Must be positive.
    pub priority: u32,
    /// Earliest tick at which the plane may be scheduled.
    pub arrival_time: Tick,
    /// Desired completion tick. Required by the deadline-ordered policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Tick>,
}

impl Plane {
    /// Creates a landing plane with priority 1 arriving at t=0.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: PlaneKind::Landing,
            priority: 1,
            arrival_time: 0,
            deadline: None,
        }
    }

    /// Sets the operation kind.
    pub fn with_kind(mut self, kind: PlaneKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the arrival tick.
    pub fn with_arrival(mut self, arrival_time: Tick) -> Self {
        self.arrival_time = arrival_time;
        self
    }

    /// Sets the deadline tick.
    pub fn with_deadline(mut self, deadline: Tick) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Initial work for round robin: quantum × the kind's service weight.
    pub fn round_robin_work(&self, quantum: Tick) -> Tick {
        quantum.saturating_mul(self.kind.service_weight())
    }
}

/// Plane operation category.
///
/// Parsed case-insensitively. Unrecognized categories are kept verbatim in
/// [`PlaneKind::Other`] and weighted like a regular movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaneKind {
    Landing,
    Takeoff,
    Cargo,
    Emergency,
    Other(String),
}

impl PlaneKind {
    /// Service-time class used by round robin, in quanta.
    ///
    /// Emergency = 1, cargo = 3, everything else = 2.
    pub fn service_weight(&self) -> Tick {
        match self {
            Self::Emergency => 1,
            Self::Cargo => 3,
            _ => 2,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Landing => "landing",
            Self::Takeoff => "takeoff",
            Self::Cargo => "cargo",
            Self::Emergency => "emergency",
            Self::Other(s) => s,
        }
    }
}

impl FromStr for PlaneKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "landing" => Self::Landing,
            "takeoff" => Self::Takeoff,
            "cargo" => Self::Cargo,
            "emergency" => Self::Emergency,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for PlaneKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<PlaneKind> for String {
    fn from(kind: PlaneKind) -> Self {
        match kind {
            PlaneKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
