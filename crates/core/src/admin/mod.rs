//! Simulated system operations for the admin panel

mod operations;

pub use operations::{OperationHandle, OperationOutcome, OperationStatus, SystemOperation};
