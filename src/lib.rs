//! Runway scheduling under interchangeable dispatch policies.
//!
//! Assigns arriving planes to a fixed pool of runways and reports
//! comparative timing and quality metrics. Clock units are abstract
//! discrete ticks.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Plane`, `PlaneKind`, `RunwayPool`,
//!   `Assignment`, `Schedule`
//! - **`dispatching`**: The `DispatchPolicy` trait and its five
//!   implementations (FCFS, Optimized, EDF, Round Robin, Priority
//!   Preemptive), progress observers and cancellation
//! - **`scheduler`**: `RunDriver` (in-line and worker runs) and `ScheduleKpi`
//! - **`validation`**: Input integrity checks (empty input, duplicate IDs,
//!   deadlines)
//! - **`config`**: `SchedulerConfig`
//! - **`io`**: JSON plane sources and the run-metrics log
//! - **`generate`**: Seeded synthetic plane sets
//!
//! # Example
//!
//! ```
//! use runway_schedule::config::SchedulerConfig;
//! use runway_schedule::dispatching::PolicyKind;
//! use runway_schedule::generate::PlaneGenerator;
//! use runway_schedule::scheduler::RunDriver;
//!
//! let planes = PlaneGenerator::new(42).generate(20);
//! let driver = RunDriver::new(SchedulerConfig::default()).unwrap();
//! for report in driver.run_all(&planes).unwrap() {
//!     assert_eq!(report.kpi.planes_scheduled, 20);
//! }
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod generate;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::SchedulerConfig;
pub use dispatching::{DispatchPolicy, PolicyKind, ProgressEvent, ProgressObserver};
pub use error::{ObserverError, SchedulerError};
pub use models::{Assignment, Plane, PlaneKind, Schedule, Tick};
pub use scheduler::{RunDriver, RunReport, ScheduleKpi};
