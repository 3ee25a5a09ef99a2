//! Pipeline stages a company progresses through.
//!
//! A [`Stage`] is a derived value: it is always recomputed from the
//! event log by the calculator and must never be treated as source of
//! truth. The enum's declaration order is the pipeline order, so the
//! derived `Ord` impl gives "further along" comparisons for free.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a company in the sales pipeline.
///
/// Totally ordered by pipeline progress: `Ice` is the entry point,
/// `Activated` is terminal.
///
/// # Example
///
/// ```rust
/// use dealflow::core::Stage;
///
/// assert!(Stage::Ice < Stage::Customer);
/// assert_eq!(Stage::Ice.next(), Some(Stage::Touched));
/// assert_eq!(Stage::Activated.next(), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ice,
    Touched,
    Aware,
    Interested,
    DemoPlanned,
    DemoDone,
    Committed,
    Customer,
    Activated,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 9] = [
        Stage::Ice,
        Stage::Touched,
        Stage::Aware,
        Stage::Interested,
        Stage::DemoPlanned,
        Stage::DemoDone,
        Stage::Committed,
        Stage::Customer,
        Stage::Activated,
    ];

    /// Stable snake_case key, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ice => "ice",
            Self::Touched => "touched",
            Self::Aware => "aware",
            Self::Interested => "interested",
            Self::DemoPlanned => "demo_planned",
            Self::DemoDone => "demo_done",
            Self::Committed => "committed",
            Self::Customer => "customer",
            Self::Activated => "activated",
        }
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ice => "Ice",
            Self::Touched => "Touched",
            Self::Aware => "Aware",
            Self::Interested => "Interested",
            Self::DemoPlanned => "Demo Planned",
            Self::DemoDone => "Demo Done",
            Self::Committed => "Committed",
            Self::Customer => "Customer",
            Self::Activated => "Activated",
        }
    }

    /// What a salesperson should do while the company sits at this stage.
    pub fn instructions(self) -> &'static str {
        match self {
            Self::Ice => "Initial contact needed. Attempt to reach out to the company.",
            Self::Touched => "Contact established. Schedule a call with decision maker.",
            Self::Aware => "Decision maker aware. Complete discovery to understand needs.",
            Self::Interested => "Interest confirmed. Schedule a product demo.",
            Self::DemoPlanned => "Demo scheduled. Prepare materials and conduct the demo.",
            Self::DemoDone => "Demo completed. Follow up and move towards commitment.",
            Self::Committed => "Company committed. Issue invoice for payment.",
            Self::Customer => "Payment received. Issue first credentials to activate.",
            Self::Activated => "Customer activated. Monitor usage and provide support.",
        }
    }

    /// The next stage in the pipeline, or `None` for `Activated`.
    pub fn next(self) -> Option<Stage> {
        match self {
            Self::Ice => Some(Self::Touched),
            Self::Touched => Some(Self::Aware),
            Self::Aware => Some(Self::Interested),
            Self::Interested => Some(Self::DemoPlanned),
            Self::DemoPlanned => Some(Self::DemoDone),
            Self::DemoDone => Some(Self::Committed),
            Self::Committed => Some(Self::Customer),
            Self::Customer => Some(Self::Activated),
            Self::Activated => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
