use serde::{Deserialize, Serialize};

/// Controls what scale the timeline displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimelineScale {
    #[default]
    Days,
    Weeks,
    Months,
}

impl TimelineScale {
    /// Horizontal pixels allotted per calendar day at this scale.
    ///
    /// Presentation constants, not scheduling facts: the day view is widest
    /// so per-day labels stay legible, the month view packs long projects
    /// onto one screen.
    pub fn pixels_per_day(&self) -> f32 {
        match self {
            TimelineScale::Days => 18.0,
            TimelineScale::Weeks => 6.0,
            TimelineScale::Months => 2.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimelineScale::Days => "Days",
            TimelineScale::Weeks => "Weeks",
            TimelineScale::Months => "Months",
        }
    }
}
