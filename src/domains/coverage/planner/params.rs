use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// What the detour builder does when an expanded obstacle reaches past the wall edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Waypoints may leave the work area.
    #[default]
    Permit,
    /// Prefer the route on the side that fits, otherwise clamp waypoints to the edge.
    Clamp,
    /// Fail the plan with `DomainError::DetourOutOfBounds`.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanningParams {
    pub row_step: f64,
    pub sample_step: f64,
    pub margin: f64,
    #[serde(default)]
    pub boundary_policy: BoundaryPolicy,
}

impl Default for PlanningParams {
    fn default() -> Self {
        Self {
            row_step: 0.35,
            sample_step: 0.12,
            margin: 0.06,
            boundary_policy: BoundaryPolicy::Permit,
        }
    }
}

impl PlanningParams {
    pub fn new(row_step: f64, sample_step: f64, margin: f64) -> Self {
        Self {
            row_step,
            sample_step,
            margin,
            boundary_policy: BoundaryPolicy::default(),
        }
    }

    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.row_step.is_finite() && self.row_step > 0.0) {
            return Err(DomainError::invalid(format!(
                "row_step must be positive, got {}",
                self.row_step
            )));
        }
        if !(self.sample_step.is_finite() && self.sample_step > 0.0) {
            return Err(DomainError::invalid(format!(
                "sample_step must be positive, got {}",
                self.sample_step
            )));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(DomainError::invalid(format!(
                "margin must be zero or positive, got {}",
                self.margin
            )));
        }
        Ok(())
    }
}
