// ABOUTME: Declarative step plans for the booking wizard
// The number and order of steps is configuration, not control flow; the
// observed 4/5/6-step booking pages become flow presets over one machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One screen of the wizard, corresponding to one category of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// Pick car vs motorcycle (only in flows that filter the catalog)
    VehicleCategory,
    /// Pick a service package
    Service,
    /// Pick a date, then a time slot fetched for it
    Schedule,
    /// Enter vehicle details
    VehicleDetails,
    /// Pick a payment method
    Payment,
    /// Review everything and confirm
    Review,
}

impl StepKind {
    /// Display title for this step
    pub const fn title(&self) -> &'static str {
        match self {
            Self::VehicleCategory => "Select Vehicle Type",
            Self::Service => "Choose Your Service Package",
            Self::Schedule => "Select Date & Time",
            Self::VehicleDetails => "Enter Vehicle Details",
            Self::Payment => "Choose Payment Method",
            Self::Review => "Review & Confirm",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Problems constructing a flow plan.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlowPlanError {
    #[error("a flow plan needs at least one step")]
    Empty,
    #[error("step {0} appears more than once")]
    Duplicate(StepKind),
    #[error("the last step must be the review step")]
    ReviewNotLast,
}

impl FlowPlanError {
    fn check(steps: &[StepKind]) -> Result<(), Self> {
        if steps.is_empty() {
            return Err(Self::Empty);
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].contains(step) {
                return Err(Self::Duplicate(*step));
            }
        }
        if steps.last() != Some(&StepKind::Review) {
            return Err(Self::ReviewNotLast);
        }
        Ok(())
    }
}

/// An ordered, duplicate-free list of wizard steps ending in review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPlan {
    steps: Vec<StepKind>,
}

impl FlowPlan {
    /// Build a custom plan, validating the step list
    pub fn new(steps: Vec<StepKind>) -> Result<Self, FlowPlanError> {
        FlowPlanError::check(&steps)?;
        Ok(Self { steps })
    }

    /// The 5-step flow of the shipped booking page:
    /// service, schedule, vehicle details, payment, review.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                StepKind::Service,
                StepKind::Schedule,
                StepKind::VehicleDetails,
                StepKind::Payment,
                StepKind::Review,
            ],
        }
    }

    /// The 6-step flow that filters the service catalog by vehicle type
    pub fn with_vehicle_category() -> Self {
        Self {
            steps: vec![
                StepKind::VehicleCategory,
                StepKind::Service,
                StepKind::Schedule,
                StepKind::VehicleDetails,
                StepKind::Payment,
                StepKind::Review,
            ],
        }
    }

    /// The 4-step express flow; payment is fixed to cash
    pub fn express() -> Self {
        Self {
            steps: vec![
                StepKind::Service,
                StepKind::Schedule,
                StepKind::VehicleDetails,
                StepKind::Review,
            ],
        }
    }

    /// Number of steps in this flow
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; plans cannot be empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at the given zero-based index
    pub fn get(&self, index: usize) -> Option<StepKind> {
        self.steps.get(index).copied()
    }

    /// Whether this flow contains the given step
    pub fn contains(&self, step: StepKind) -> bool {
        self.steps.contains(&step)
    }

    /// Zero-based position of a step in this flow
    pub fn position(&self, step: StepKind) -> Option<usize> {
        self.steps.iter().position(|s| *s == step)
    }

    /// Iterate the steps in order
    pub fn iter(&self) -> impl Iterator<Item = StepKind> + '_ {
        self.steps.iter().copied()
    }
}

impl Default for FlowPlan {
    fn default() -> Self {
        Self::standard()
    }
}

/// Named flow preset, selectable from config or the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowChoice {
    /// 5 steps: service, schedule, vehicle, payment, review
    #[default]
    Standard,
    /// 6 steps: vehicle category first
    VehicleCategory,
    /// 4 steps: no payment step, cash implied
    Express,
}

impl FlowChoice {
    /// Materialize the preset into a plan
    pub fn to_plan(self) -> FlowPlan {
        match self {
            Self::Standard => FlowPlan::standard(),
            Self::VehicleCategory => FlowPlan::with_vehicle_category(),
            Self::Express => FlowPlan::express(),
        }
    }
}

impl fmt::Display for FlowChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::VehicleCategory => "vehicle-category",
            Self::Express => "express",
        };
        f.write_str(name)
    }
}

impl FromStr for FlowChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "vehicle-category" | "vehicle_category" => Ok(Self::VehicleCategory),
            "express" => Ok(Self::Express),
            other => Err(format!("unknown flow: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_expected_shapes() {
        assert_eq!(FlowPlan::express().len(), 4);
        assert_eq!(FlowPlan::standard().len(), 5);
        assert_eq!(FlowPlan::with_vehicle_category().len(), 6);

        for plan in [
            FlowPlan::express(),
            FlowPlan::standard(),
            FlowPlan::with_vehicle_category(),
        ] {
            assert_eq!(plan.get(plan.len() - 1), Some(StepKind::Review));
            assert!(FlowPlan::new(plan.iter().collect()).is_ok());
        }
    }

    #[test]
    fn express_flow_skips_payment() {
        assert!(!FlowPlan::express().contains(StepKind::Payment));
        assert!(FlowPlan::standard().contains(StepKind::Payment));
    }

    #[test]
    fn plan_validation_rejects_bad_lists() {
        assert_eq!(FlowPlan::new(vec![]), Err(FlowPlanError::Empty));
        assert_eq!(
            FlowPlan::new(vec![StepKind::Service, StepKind::Service, StepKind::Review]),
            Err(FlowPlanError::Duplicate(StepKind::Service))
        );
        assert_eq!(
            FlowPlan::new(vec![StepKind::Review, StepKind::Service]),
            Err(FlowPlanError::ReviewNotLast)
        );
    }

    #[test]
    fn flow_choice_parses() {
        assert_eq!("standard".parse::<FlowChoice>(), Ok(FlowChoice::Standard));
        assert_eq!(
            "vehicle-category".parse::<FlowChoice>(),
            Ok(FlowChoice::VehicleCategory)
        );
        assert_eq!("express".parse::<FlowChoice>(), Ok(FlowChoice::Express));
        assert!("bogus".parse::<FlowChoice>().is_err());
    }
}
