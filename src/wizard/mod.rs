// ABOUTME: Booking wizard state machine and its declarative step plans

pub mod state;
pub mod steps;

pub use state::{BookingWizard, CatalogBoard, Fetch, SlotBoard, WizardError};
pub use steps::{FlowChoice, FlowPlan, FlowPlanError, StepKind};
