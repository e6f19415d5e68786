//! Job-shop domain models.
//!
//! Provides the immutable problem description (`Instance`, `Job`,
//! `Operation`) and the write-once solution records (`Schedule`,
//! `ScheduledOp`).
//!
//! # Domain Mappings
//!
//! | jobshop-fcfs | Manufacturing | Healthcare | Logistics |
//! |--------------|--------------|------------|-----------|
//! | Job | Order | Patient Case | Shipment |
//! | Operation | Operation | Procedure | Transport Leg |
//! | Machine | Machine/Cell | Room | Dock/Truck |
//! | Schedule | Production Plan | OR Schedule | Route Plan |

mod instance;
mod schedule;

pub use instance::{Instance, InstanceBuilder, Job, Operation, RawOperation};
pub use schedule::{Schedule, ScheduledOp, NO_SOLUTION};
