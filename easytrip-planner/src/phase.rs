//! Planner phases.

/// Where the planner currently is in a flow.
///
/// A planning flow walks `Validating → Geocoding → Recommending → Optimizing
/// → Persisting` and always ends back in [`PlannerPhase::Idle`]; a restore
/// flow passes through [`PlannerPhase::Restoring`] only.
///
/// There is no separate error phase. A failed flow returns straight to
/// [`PlannerPhase::Idle`]; the stage it failed in is reported through
/// `PlannerSnapshot::last_failure` and the error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlannerPhase {
    /// No flow in progress.
    #[default]
    Idle,
    /// Checking the submitted form.
    Validating,
    /// Resolving free-text endpoints.
    Geocoding,
    /// Waiting for candidate points.
    Recommending,
    /// Waiting for the optimised route.
    Optimizing,
    /// Drawing and saving the new route.
    Persisting,
    /// Loading the last saved route.
    Restoring,
}

impl PlannerPhase {
    /// Whether the loading indicator should be shown.
    ///
    /// True for the `Validating..=Persisting` span of a planning flow only.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Validating
                | Self::Geocoding
                | Self::Recommending
                | Self::Optimizing
                | Self::Persisting
        )
    }

    /// Lowercase stage name used in logs and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Geocoding => "geocoding",
            Self::Recommending => "recommending",
            Self::Optimizing => "optimizing",
            Self::Persisting => "persisting",
            Self::Restoring => "restoring",
        }
    }
}

impl std::fmt::Display for PlannerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlannerPhase::Idle, false)]
    #[case(PlannerPhase::Validating, true)]
    #[case(PlannerPhase::Geocoding, true)]
    #[case(PlannerPhase::Recommending, true)]
    #[case(PlannerPhase::Optimizing, true)]
    #[case(PlannerPhase::Persisting, true)]
    #[case(PlannerPhase::Restoring, false)]
    fn loading_spans_the_planning_stages(#[case] phase: PlannerPhase, #[case] busy: bool) {
        assert_eq!(phase.is_busy(), busy);
    }
}
