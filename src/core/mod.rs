//! Pure pipeline core.
//!
//! This module contains the computational heart of the crate:
//! - [`Stage`] and [`EventType`] enums with their pipeline metadata
//! - [`StageCalculator`]: event history -> current stage
//! - [`EventGuard`]: preconditions gating event creation
//! - [`ActionResolver`]: currently permitted actions, derived by
//!   probing the guard
//!
//! Everything here is a pure function of its inputs plus an injected
//! [`Clock`]; no I/O and no shared mutable state.

mod actions;
mod calculator;
mod clock;
mod event;
mod guard;
mod stage;

pub use actions::{ActionResolver, AvailableAction};
pub use calculator::{StageCalculator, DEMO_VALIDITY_DAYS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use event::{payload, Event, EventData, EventType};
pub use guard::{EventGuard, GuardError};
pub use stage::Stage;
