//! Scheduling domain models.
//!
//! Core data types shared by every dispatch policy: the planes being
//! scheduled, the runway pool they compete for, and the schedule a run
//! produces.
//!
//! # Domain Mappings
//!
//! | runway-schedule | Generic scheduling | OS scheduling |
//! |-----------------|--------------------|---------------|
//! | Plane | Job | Process |
//! | Runway | Machine | CPU |
//! | Assignment | Operation slot | Time slice |
//! | Schedule | Production plan | Trace |

mod plane;
mod runway;
mod schedule;

pub use plane::{Plane, PlaneKind};
pub use runway::RunwayPool;
pub use schedule::{Assignment, Schedule};

/// Abstract discrete unit of scheduling time.
pub type Tick = u64;
