//! Dealflow: an event-sourced sales pipeline engine
//!
//! Dealflow derives a company's position in a fixed sales pipeline
//! from an append-only log of business events, and enforces
//! preconditions on which events may legally be recorded next. The
//! pipeline stage is never stored as truth: it is a projection of the
//! event log, recomputed whenever the log changes.
//!
//! # Core Concepts
//!
//! - **Stage**: derived pipeline position, from `Ice` to `Activated`
//! - **Event log**: append-only per-company history, sole source of truth
//! - **Guard**: precondition check gating creation of a new event
//! - **Actions**: the event types currently permitted, derived by
//!   probing the guard so availability can never drift from enforcement
//!
//! # Example
//!
//! ```rust
//! use dealflow::core::{ActionResolver, EventType, Stage, StageCalculator};
//!
//! let calculator = StageCalculator::new();
//! let resolver = ActionResolver::new();
//!
//! // A company with no history sits at the bottom of the pipeline,
//! // and the only permitted move is attempting contact.
//! assert_eq!(calculator.calculate(&[]), Stage::Ice);
//!
//! let actions = resolver.available_actions(&[]);
//! assert_eq!(actions.len(), 1);
//! assert_eq!(actions[0].event_type, EventType::ContactAttempted);
//! ```

pub mod core;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use core::{
    ActionResolver, AvailableAction, Event, EventGuard, EventType, GuardError, Stage,
    StageCalculator,
};
pub use service::{PipelineService, ServiceError};
pub use store::{Company, InMemoryStore};
