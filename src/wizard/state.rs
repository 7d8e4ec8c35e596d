// ABOUTME: The booking wizard state machine
// Owns the draft, validates each step against it, and applies collaborator
// responses with staleness checks so the draft stays the single source of
// truth for what is selected.

use crate::models::{BookingDraft, CompletedDraft, PaymentMethod, ServiceOffering, VehicleCategory, VehicleDetails};
use crate::wizard::steps::{FlowPlan, StepKind};
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::debug;

/// Recoverable wizard-level failures, surfaced inline to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// A step's required fields are incomplete or an input is unacceptable
    #[error("{0}")]
    Validation(String),

    /// A submission is already in flight; wait for it to settle
    #[error("submission already in flight")]
    SubmissionInFlight,

    /// The booking was already submitted; the session is over
    #[error("booking already submitted")]
    AlreadySubmitted,

    /// `begin_submit` called away from the review step
    #[error("submission is only possible from the review step")]
    NotAtReview,
}

/// A collaborator fetch the caller should perform as a result of a
/// transition. The wizard never does I/O itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// Load the service catalog for a vehicle category
    Services(VehicleCategory),
    /// Load available time slots for a date
    Slots(NaiveDate),
}

/// Time slots last fetched for a specific date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBoard {
    /// The date the slots were fetched for
    pub date: NaiveDate,
    /// Available slots, ascending
    pub times: Vec<NaiveTime>,
}

/// Service catalog last fetched for a specific category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBoard {
    /// The category the catalog was fetched for
    pub category: VehicleCategory,
    /// Offerings returned by the backend; empty is a valid "no services" state
    pub services: Vec<ServiceOffering>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    InProgress,
    Submitting,
    Submitted(String),
}

/// In-memory state machine driving the multi-step booking flow.
///
/// Steps come from a [`FlowPlan`]; transitions are `advance`/`retreat`,
/// selectors record values into the draft without advancing, and
/// `begin_submit`/`submit_succeeded`/`submit_failed` bracket the final
/// confirmation round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingWizard {
    plan: FlowPlan,
    step_index: usize,
    draft: BookingDraft,
    slots: Option<SlotBoard>,
    catalog: Option<CatalogBoard>,
    phase: Phase,
    last_error: Option<String>,
}

impl BookingWizard {
    /// Start a fresh wizard session at step 1 with an empty draft
    pub fn new(plan: FlowPlan) -> Self {
        Self {
            plan,
            step_index: 0,
            draft: BookingDraft::default(),
            slots: None,
            catalog: None,
            phase: Phase::InProgress,
            last_error: None,
        }
    }

    /// The step the wizard is currently on
    pub fn current_step(&self) -> StepKind {
        self.plan.get(self.step_index).unwrap_or(StepKind::Review)
    }

    /// 1-based step number for display
    pub fn step_number(&self) -> usize {
        self.step_index + 1
    }

    /// Total number of steps in this flow
    pub fn total_steps(&self) -> usize {
        self.plan.len()
    }

    /// The flow this wizard runs
    pub fn plan(&self) -> &FlowPlan {
        &self.plan
    }

    /// The draft being assembled; canonical over any rendering of it
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Slots last applied for the currently selected date, if any
    pub fn slots(&self) -> Option<&SlotBoard> {
        self.slots.as_ref()
    }

    /// Catalog last applied, if any
    pub fn catalog(&self) -> Option<&CatalogBoard> {
        self.catalog.as_ref()
    }

    /// Most recent user-facing error, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a submission round-trip is currently in flight
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Booking id once the session reached the submitted pseudo-state
    pub fn booking_id(&self) -> Option<&str> {
        match &self.phase {
            Phase::Submitted(id) => Some(id),
            _ => None,
        }
    }

    fn ensure_active(&self) -> Result<(), WizardError> {
        match self.phase {
            Phase::InProgress => Ok(()),
            Phase::Submitting => Err(WizardError::SubmissionInFlight),
            Phase::Submitted(_) => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Pure validity predicate over the draft for any step of this flow.
    /// Calling it twice without mutating the draft yields the same result.
    pub fn is_step_valid(&self, step: StepKind) -> bool {
        match step {
            StepKind::VehicleCategory => self.draft.vehicle_category.is_some(),
            StepKind::Service => self
                .draft
                .service
                .as_ref()
                .is_some_and(ServiceOffering::has_valid_id),
            StepKind::Schedule => {
                let (Some(date), Some(time)) = (self.draft.date, self.draft.time) else {
                    return false;
                };
                // The time must belong to the slot set last fetched for the
                // selected date; a stale stored time does not count.
                self.slots
                    .as_ref()
                    .is_some_and(|board| board.date == date && board.times.contains(&time))
            }
            StepKind::VehicleDetails => self.draft.vehicle.is_complete(),
            StepKind::Payment => {
                // Flows without a payment step imply cash
                !self.plan.contains(StepKind::Payment) || self.draft.payment_method.is_some()
            }
            StepKind::Review => self
                .plan
                .iter()
                .filter(|s| *s != StepKind::Review)
                .all(|s| self.is_step_valid(s)),
        }
    }

    fn requirement(step: StepKind) -> &'static str {
        match step {
            StepKind::VehicleCategory => "select a vehicle type first",
            StepKind::Service => "select a service package first",
            StepKind::Schedule => "pick a date and an available time slot",
            StepKind::VehicleDetails => "fill in all vehicle details",
            StepKind::Payment => "choose a payment method",
            StepKind::Review => "complete all previous steps before confirming",
        }
    }

    /// Move to the next step if the current one validates. Returns a fetch
    /// the caller should perform when entering the new step requires one.
    /// Invalid steps leave the position unchanged and surface an error.
    pub fn advance(&mut self) -> Result<Option<Fetch>, WizardError> {
        self.ensure_active()?;

        let current = self.current_step();
        if !self.is_step_valid(current) {
            let message = Self::requirement(current).to_string();
            self.last_error = Some(message.clone());
            return Err(WizardError::Validation(message));
        }

        // Review's only exits are submit and go-back.
        if self.step_index + 1 >= self.plan.len() {
            return Ok(None);
        }

        self.step_index += 1;
        self.last_error = None;

        Ok(self.entry_fetch(self.current_step()))
    }

    /// Fetch needed on entering `step`, if any. Entering the service step
    /// triggers a catalog lookup when the flow gates services on vehicle
    /// category and no catalog for the chosen category has been applied yet.
    /// The schedule step fetches nothing until a date is chosen.
    fn entry_fetch(&self, step: StepKind) -> Option<Fetch> {
        if step != StepKind::Service || !self.plan.contains(StepKind::VehicleCategory) {
            return None;
        }
        let category = self.draft.vehicle_category?;
        let already_loaded = self
            .catalog
            .as_ref()
            .is_some_and(|board| board.category == category);
        (!already_loaded).then_some(Fetch::Services(category))
    }

    /// Go back one step. No lower bound below step 1; never clears data.
    pub fn retreat(&mut self) -> Result<bool, WizardError> {
        self.ensure_active()?;
        if self.step_index == 0 {
            return Ok(false);
        }
        self.step_index -= 1;
        self.last_error = None;
        Ok(true)
    }

    /// Record the vehicle category. Does not advance.
    pub fn select_vehicle_category(&mut self, category: VehicleCategory) -> Result<(), WizardError> {
        self.ensure_active()?;
        self.draft.vehicle_category = Some(category);
        self.last_error = None;
        Ok(())
    }

    /// Record a service selection. Does not advance; the derived total
    /// follows the selection automatically.
    pub fn select_service(&mut self, service: ServiceOffering) -> Result<(), WizardError> {
        self.ensure_active()?;
        if !service.has_valid_id() {
            let message = "that service has no identifier".to_string();
            self.last_error = Some(message.clone());
            return Err(WizardError::Validation(message));
        }
        self.draft.service = Some(service);
        self.last_error = None;
        Ok(())
    }

    /// Record a date. Rejects past dates, clears any previously chosen time
    /// and slot set, and asks the caller to fetch slots for the new date.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<Fetch, WizardError> {
        self.ensure_active()?;
        if date < today {
            let message = format!("{date} is in the past");
            self.last_error = Some(message.clone());
            return Err(WizardError::Validation(message));
        }
        self.draft.set_date(date);
        self.slots = None;
        self.last_error = None;
        Ok(Fetch::Slots(date))
    }

    /// Record a time. The time must be one of the slots last applied for
    /// the currently selected date.
    pub fn select_time(&mut self, time: NaiveTime) -> Result<(), WizardError> {
        self.ensure_active()?;
        let on_board = self.slots.as_ref().is_some_and(|board| {
            Some(board.date) == self.draft.date && board.times.contains(&time)
        });
        if !on_board {
            let message = format!("{} is not among the available slots", time.format("%H:%M"));
            self.last_error = Some(message.clone());
            return Err(WizardError::Validation(message));
        }
        self.draft.time = Some(time);
        self.last_error = None;
        Ok(())
    }

    /// Record the vehicle details. Completeness is checked at validation
    /// time, not here, so partial edits can be stored as the user types.
    pub fn set_vehicle_details(&mut self, vehicle: VehicleDetails) -> Result<(), WizardError> {
        self.ensure_active()?;
        self.draft.vehicle = vehicle;
        self.last_error = None;
        Ok(())
    }

    /// Record free-text notes
    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_active()?;
        self.draft.notes = notes.into();
        Ok(())
    }

    /// Record the payment method. Does not advance.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), WizardError> {
        self.ensure_active()?;
        self.draft.payment_method = Some(method);
        self.last_error = None;
        Ok(())
    }

    /// Apply a slot-availability response. Responses for a date that is no
    /// longer selected are stale and dropped; returns whether it applied.
    pub fn apply_slots(&mut self, date: NaiveDate, times: Vec<NaiveTime>) -> bool {
        if self.draft.date != Some(date) {
            debug!(%date, "discarding stale slot response");
            return false;
        }
        self.slots = Some(SlotBoard { date, times });
        true
    }

    /// Apply a service-catalog response. In flows with a vehicle-category
    /// step, responses for a category that is no longer selected are stale
    /// and dropped; returns whether it applied.
    pub fn apply_service_catalog(
        &mut self,
        category: VehicleCategory,
        services: Vec<ServiceOffering>,
    ) -> bool {
        if self.plan.contains(StepKind::VehicleCategory)
            && self.draft.vehicle_category != Some(category)
        {
            debug!(%category, "discarding stale service catalog response");
            return false;
        }
        self.catalog = Some(CatalogBoard { category, services });
        true
    }

    /// Begin submission from the review step. Validates the whole draft,
    /// marks a submission in flight (a second submit is refused until the
    /// first settles), and returns the snapshot to transmit.
    pub fn begin_submit(&mut self) -> Result<CompletedDraft, WizardError> {
        self.ensure_active()?;
        if self.current_step() != StepKind::Review {
            return Err(WizardError::NotAtReview);
        }
        if !self.is_step_valid(StepKind::Review) {
            let message = Self::requirement(StepKind::Review).to_string();
            self.last_error = Some(message.clone());
            return Err(WizardError::Validation(message));
        }
        let completed = self.draft.try_complete().ok_or_else(|| {
            WizardError::Validation("the draft is missing required fields".to_string())
        })?;
        self.phase = Phase::Submitting;
        self.last_error = None;
        Ok(completed)
    }

    /// Settle an in-flight submission as accepted. The wizard enters the
    /// terminal submitted pseudo-state; the session is over.
    pub fn submit_succeeded(&mut self, booking_id: String) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::Submitted(booking_id);
        }
    }

    /// Settle an in-flight submission as failed. The wizard stays on the
    /// review step with the draft intact and surfaces the given message.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        if self.phase == Phase::Submitting {
            self.phase = Phase::InProgress;
            self.last_error = Some(message.into());
        }
    }
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new(FlowPlan::standard())
    }
}

// Include the test module inline
#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
