//! Application layer - Use cases that coordinate domain services.
//!
//! This layer contains the application-specific business rules and orchestrates
//! the flow of data between the CLI layer and the catalog.

mod sync;

pub use sync::{SyncOptions, SyncOutcome, SyncUseCase, UpdateSummary};
