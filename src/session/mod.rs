// ABOUTME: Booking session driving the wizard against a backend
// Translates wizard transitions into collaborator fetches, keeps stale
// responses out, and guards submission so one booking goes out at most once.

use crate::api::{ApiError, BookingApiClient, CreateBookingRequest, CreateBookingResponse};
use crate::models::{PaymentMethod, ServiceOffering, VehicleCategory, VehicleDetails};
use crate::wizard::{BookingWizard, Fetch, FlowPlan, WizardError};
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Failures surfaced to the user while driving a booking session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Local validation failure; fix the input and retry
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// A collaborator fetch failed; the step is unchanged and can be retried
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server rejected a structurally valid draft; message is verbatim
    #[error("{0}")]
    Rejected(String),
}

/// The three collaborator operations a session needs. The HTTP client
/// implements this; tests script a fake.
#[allow(async_fn_in_trait)]
pub trait BookingBackend {
    /// Service catalog filtered by vehicle category
    async fn services_by_vehicle_type(
        &self,
        category: VehicleCategory,
    ) -> Result<Vec<ServiceOffering>, ApiError>;

    /// Bookable time slots for a date
    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, ApiError>;

    /// Submit a completed draft
    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<CreateBookingResponse, ApiError>;
}

impl BookingBackend for BookingApiClient {
    async fn services_by_vehicle_type(
        &self,
        category: VehicleCategory,
    ) -> Result<Vec<ServiceOffering>, ApiError> {
        Self::services_by_vehicle_type(self, category).await
    }

    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, ApiError> {
        Self::available_slots(self, date).await
    }

    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<CreateBookingResponse, ApiError> {
        Self::create_booking(self, request).await
    }
}

/// One user's booking attempt: a wizard plus the backend that feeds it.
///
/// Everything runs on one task; the only ordering hazard is a fetch
/// settling after its key stopped being current, which the wizard's
/// apply methods filter out.
#[derive(Debug)]
pub struct BookingSession<B: BookingBackend> {
    id: Uuid,
    backend: B,
    wizard: BookingWizard,
}

impl<B: BookingBackend> BookingSession<B> {
    /// Start a session over the given flow
    pub fn new(backend: B, plan: FlowPlan) -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, steps = plan.len(), "booking session started");
        Self {
            id,
            backend,
            wizard: BookingWizard::new(plan),
        }
    }

    /// Session identifier for log correlation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The wizard this session drives; views render from it
    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    /// The backend this session talks to
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Advance to the next step, performing the entry fetch if the new step
    /// needs one. On fetch failure the wizard is returned to the pre-fetch
    /// step so the same transition can be retried.
    pub async fn advance(&mut self) -> Result<(), SessionError> {
        let Some(fetch) = self.wizard.advance()? else {
            return Ok(());
        };
        match fetch {
            Fetch::Services(category) => {
                if let Err(e) = self.fetch_and_apply_catalog(category).await {
                    warn!(session_id = %self.id, error = %e, "catalog fetch failed; staying put");
                    let _ = self.wizard.retreat();
                    return Err(e);
                }
            }
            Fetch::Slots(date) => {
                // Advancing never requires slots today, but handle it the
                // same way if a flow ever asks for it.
                if let Err(e) = self.fetch_and_apply_slots(date).await {
                    let _ = self.wizard.retreat();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Go back one step; never clears entered data
    pub fn go_back(&mut self) -> Result<bool, SessionError> {
        Ok(self.wizard.retreat()?)
    }

    /// Record the vehicle category
    pub fn choose_vehicle_category(&mut self, category: VehicleCategory) -> Result<(), SessionError> {
        Ok(self.wizard.select_vehicle_category(category)?)
    }

    /// Fetch and apply the catalog for a category, returning what is now
    /// renderable. Useful for flows where the category is only a display
    /// filter rather than a wizard step.
    pub async fn load_services(
        &mut self,
        category: VehicleCategory,
    ) -> Result<&[ServiceOffering], SessionError> {
        self.fetch_and_apply_catalog(category).await?;
        Ok(self
            .wizard
            .catalog()
            .map_or(&[][..], |board| board.services.as_slice()))
    }

    /// Record a service selection
    pub fn choose_service(&mut self, service: ServiceOffering) -> Result<(), SessionError> {
        Ok(self.wizard.select_service(service)?)
    }

    /// Record a date and fetch its slots. A newer date selection supersedes
    /// any earlier in-flight slot fetch; the superseded result is dropped
    /// when it settles. On fetch failure the date stays selected with no
    /// slots, and re-selecting the date retries the fetch.
    pub async fn choose_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), SessionError> {
        self.wizard.select_date(date, today)?;
        self.fetch_and_apply_slots(date).await
    }

    /// Record a time from the fetched slot set
    pub fn choose_time(&mut self, time: NaiveTime) -> Result<(), SessionError> {
        Ok(self.wizard.select_time(time)?)
    }

    /// Record the vehicle details
    pub fn set_vehicle_details(&mut self, vehicle: VehicleDetails) -> Result<(), SessionError> {
        Ok(self.wizard.set_vehicle_details(vehicle)?)
    }

    /// Record free-text notes
    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), SessionError> {
        Ok(self.wizard.set_notes(notes)?)
    }

    /// Record the payment method
    pub fn choose_payment_method(&mut self, method: PaymentMethod) -> Result<(), SessionError> {
        Ok(self.wizard.select_payment_method(method)?)
    }

    /// Submit the completed draft. Exactly one request goes out per call;
    /// a second submit while one is in flight is refused by the wizard.
    /// On rejection or transport failure the draft and the review step are
    /// kept so the user can retry.
    pub async fn submit(&mut self) -> Result<String, SessionError> {
        let completed = self.wizard.begin_submit()?;
        let request = CreateBookingRequest::from(&completed);

        match self.backend.create_booking(&request).await {
            Err(e) => {
                self.wizard.submit_failed(e.to_string());
                Err(e.into())
            }
            Ok(response) if response.success => match response.booking_id {
                Some(id) if !id.is_empty() => {
                    info!(session_id = %self.id, booking_id = %id, "booking confirmed");
                    self.wizard.submit_succeeded(id.clone());
                    Ok(id)
                }
                _ => {
                    let message = "backend accepted the booking but returned no id".to_string();
                    self.wizard.submit_failed(message.clone());
                    Err(SessionError::Rejected(message))
                }
            },
            Ok(response) => {
                self.wizard.submit_failed(response.message.clone());
                Err(SessionError::Rejected(response.message))
            }
        }
    }

    async fn fetch_and_apply_catalog(&mut self, category: VehicleCategory) -> Result<(), SessionError> {
        let services = self.backend.services_by_vehicle_type(category).await?;
        if !self.wizard.apply_service_catalog(category, services) {
            debug!(session_id = %self.id, %category, "catalog response was stale");
        }
        Ok(())
    }

    async fn fetch_and_apply_slots(&mut self, date: NaiveDate) -> Result<(), SessionError> {
        let times = self.backend.available_slots(date).await?;

        // The wizard drops responses for a date that is no longer selected.
        if !self.wizard.apply_slots(date, times) {
            debug!(session_id = %self.id, %date, "slot response was stale");
        }
        Ok(())
    }
}
