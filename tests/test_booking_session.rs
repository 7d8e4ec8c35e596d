// ABOUTME: Tests for the booking session against a scripted fake backend,
// covering fetch-on-advance, failure recovery, and submission semantics

use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use washbook::api::{ApiError, CreateBookingRequest, CreateBookingResponse};
use washbook::models::{PaymentMethod, ServiceOffering, VehicleCategory, VehicleDetails};
use washbook::session::{BookingBackend, BookingSession, SessionError};
use washbook::wizard::{FlowPlan, StepKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn premium_wash() -> ServiceOffering {
    ServiceOffering {
        id: "5".to_string(),
        name: "Premium Wash".to_string(),
        price: 50_000,
        duration_minutes: 30,
    }
}

fn avanza() -> VehicleDetails {
    VehicleDetails {
        vehicle_type: "MOBIL".to_string(),
        brand: "Toyota".to_string(),
        model: "Avanza".to_string(),
        license_plate: "B1234CD".to_string(),
        color: "Silver".to_string(),
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "boom".to_string(),
    }
}

/// Fake backend driven by per-test scripts. Counters use interior
/// mutability because the backend trait takes `&self`.
#[derive(Default)]
struct ScriptedBackend {
    services: HashMap<&'static str, Vec<ServiceOffering>>,
    slots: HashMap<NaiveDate, Vec<NaiveTime>>,
    fail_service_fetches: Cell<u32>,
    fail_slot_fetches: Cell<u32>,
    booking_reply: RefCell<Option<CreateBookingResponse>>,
    created: RefCell<Vec<CreateBookingRequest>>,
}

impl ScriptedBackend {
    fn with_slots(date: NaiveDate, times: Vec<NaiveTime>) -> Self {
        let mut backend = Self::default();
        backend.slots.insert(date, times);
        backend
    }

    fn created_requests(&self) -> Vec<CreateBookingRequest> {
        self.created.borrow().clone()
    }
}

impl BookingBackend for ScriptedBackend {
    async fn services_by_vehicle_type(
        &self,
        category: VehicleCategory,
    ) -> Result<Vec<ServiceOffering>, ApiError> {
        let remaining = self.fail_service_fetches.get();
        if remaining > 0 {
            self.fail_service_fetches.set(remaining - 1);
            return Err(server_error());
        }
        Ok(self
            .services
            .get(category.as_wire_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, ApiError> {
        let remaining = self.fail_slot_fetches.get();
        if remaining > 0 {
            self.fail_slot_fetches.set(remaining - 1);
            return Err(server_error());
        }
        Ok(self.slots.get(&date).cloned().unwrap_or_default())
    }

    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<CreateBookingResponse, ApiError> {
        self.created.borrow_mut().push(request.clone());
        Ok(self.booking_reply.borrow_mut().take().unwrap_or(CreateBookingResponse {
            success: true,
            booking_id: Some("CW-20250615-042".to_string()),
            message: "Booking created".to_string(),
        }))
    }
}

const TODAY: (i32, u32, u32) = (2025, 6, 1);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

/// Drive a standard-flow session to the review step over the given backend
async fn session_at_review(backend: ScriptedBackend) -> BookingSession<ScriptedBackend> {
    let mut session = BookingSession::new(backend, FlowPlan::standard());
    session.choose_service(premium_wash()).unwrap();
    session.advance().await.unwrap();

    session.choose_date(date(2025, 6, 15), today()).await.unwrap();
    session.choose_time(time(10, 0)).unwrap();
    session.advance().await.unwrap();

    session.set_vehicle_details(avanza()).unwrap();
    session.advance().await.unwrap();

    session.choose_payment_method(PaymentMethod::Cash).unwrap();
    session.advance().await.unwrap();

    assert_eq!(session.wizard().current_step(), StepKind::Review);
    session
}

#[tokio::test]
async fn entering_the_service_step_loads_the_catalog() {
    let mut backend = ScriptedBackend::default();
    backend.services.insert("MOBIL", vec![premium_wash()]);

    let mut session = BookingSession::new(backend, FlowPlan::with_vehicle_category());
    session.choose_vehicle_category(VehicleCategory::Mobil).unwrap();
    session.advance().await.unwrap();

    let catalog = session.wizard().catalog().expect("catalog applied");
    assert_eq!(catalog.category, VehicleCategory::Mobil);
    assert_eq!(catalog.services, vec![premium_wash()]);
}

#[tokio::test]
async fn failed_catalog_fetch_leaves_the_wizard_on_the_prior_step() {
    let mut backend = ScriptedBackend::default();
    backend.services.insert("MOBIL", vec![premium_wash()]);
    backend.fail_service_fetches.set(1);

    let mut session = BookingSession::new(backend, FlowPlan::with_vehicle_category());
    session.choose_vehicle_category(VehicleCategory::Mobil).unwrap();

    let err = session.advance().await.unwrap_err();
    assert!(matches!(err, SessionError::Api(_)));
    assert_eq!(session.wizard().current_step(), StepKind::VehicleCategory);

    // Re-invoking the same transition retries the fetch
    session.advance().await.unwrap();
    assert_eq!(session.wizard().current_step(), StepKind::Service);
    assert!(session.wizard().catalog().is_some());
}

#[tokio::test]
async fn empty_catalog_is_recoverable_by_loading_another_category() {
    let mut backend = ScriptedBackend::default();
    backend.services.insert("MOTOR", vec![premium_wash()]);

    let mut session = BookingSession::new(backend, FlowPlan::standard());

    // The first category has nothing on offer; that is a state to render,
    // not a dead end.
    let services = session.load_services(VehicleCategory::Mobil).await.unwrap();
    assert!(services.is_empty());
    let board = session.wizard().catalog().expect("empty board still applies");
    assert!(board.services.is_empty());

    let services = session.load_services(VehicleCategory::Motor).await.unwrap();
    assert_eq!(services, &[premium_wash()][..]);
    assert_eq!(
        session.wizard().catalog().unwrap().category,
        VehicleCategory::Motor
    );
}

#[tokio::test]
async fn choosing_a_date_applies_its_slots() {
    let backend = ScriptedBackend::with_slots(date(2025, 6, 15), vec![time(9, 0), time(10, 0)]);
    let mut session = BookingSession::new(backend, FlowPlan::standard());

    session.choose_date(date(2025, 6, 15), today()).await.unwrap();
    let board = session.wizard().slots().expect("slots applied");
    assert_eq!(board.times, vec![time(9, 0), time(10, 0)]);
}

#[tokio::test]
async fn empty_slot_response_renders_the_no_slots_state() {
    let backend = ScriptedBackend::default();
    let mut session = BookingSession::new(backend, FlowPlan::standard());
    session.choose_service(premium_wash()).unwrap();
    session.advance().await.unwrap();

    session.choose_date(date(2025, 6, 15), today()).await.unwrap();
    let board = session.wizard().slots().expect("empty board still applies");
    assert!(board.times.is_empty());
    assert!(!session.wizard().is_step_valid(StepKind::Schedule));
}

#[tokio::test]
async fn failed_slot_fetch_keeps_the_date_and_allows_retry() {
    let mut backend = ScriptedBackend::with_slots(date(2025, 6, 15), vec![time(10, 0)]);
    backend.fail_slot_fetches.set(1);
    let mut session = BookingSession::new(backend, FlowPlan::standard());

    let err = session.choose_date(date(2025, 6, 15), today()).await.unwrap_err();
    assert!(matches!(err, SessionError::Api(_)));
    assert_eq!(session.wizard().draft().date, Some(date(2025, 6, 15)));
    assert!(session.wizard().slots().is_none());

    session.choose_date(date(2025, 6, 15), today()).await.unwrap();
    assert_eq!(session.wizard().slots().unwrap().times, vec![time(10, 0)]);
}

#[tokio::test]
async fn submit_issues_exactly_one_request_with_the_draft_fields() {
    let backend = ScriptedBackend::with_slots(
        date(2025, 6, 15),
        vec![time(9, 0), time(10, 0), time(11, 0)],
    );
    let mut session = session_at_review(backend).await;

    let booking_id = session.submit().await.unwrap();
    assert_eq!(booking_id, "CW-20250615-042");
    assert_eq!(session.wizard().booking_id(), Some("CW-20250615-042"));

    let requests = session.backend().created_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.service_id, "5");
    assert_eq!(request.date, "2025-06-15");
    assert_eq!(request.time, "10:00");
    assert_eq!(request.payment_method, "CASH");
}

#[tokio::test]
async fn rejected_submission_keeps_the_draft_and_surfaces_the_message() {
    let backend = ScriptedBackend::with_slots(date(2025, 6, 15), vec![time(10, 0)]);
    *backend.booking_reply.borrow_mut() = Some(CreateBookingResponse {
        success: false,
        booking_id: None,
        message: "Slot no longer available".to_string(),
    });
    let mut session = session_at_review(backend).await;
    let draft_before = session.wizard().draft().clone();

    let err = session.submit().await.unwrap_err();
    match err {
        SessionError::Rejected(message) => assert_eq!(message, "Slot no longer available"),
        other => panic!("expected rejection, got {other}"),
    }

    assert_eq!(session.wizard().current_step(), StepKind::Review);
    assert_eq!(session.wizard().draft(), &draft_before);
    assert_eq!(
        session.wizard().last_error(),
        Some("Slot no longer available")
    );

    // The draft is intact, so a retry can go straight out
    let booking_id = session.submit().await.unwrap();
    assert_eq!(booking_id, "CW-20250615-042");
}

#[tokio::test]
async fn transport_failure_during_submit_is_recoverable() {
    // Wraps the scripted backend so only the create call itself errors
    struct FailingOnce {
        inner: ScriptedBackend,
        fail_creates: Cell<u32>,
    }

    impl BookingBackend for FailingOnce {
        async fn services_by_vehicle_type(
            &self,
            category: VehicleCategory,
        ) -> Result<Vec<ServiceOffering>, ApiError> {
            self.inner.services_by_vehicle_type(category).await
        }

        async fn available_slots(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, ApiError> {
            self.inner.available_slots(date).await
        }

        async fn create_booking(
            &self,
            request: &CreateBookingRequest,
        ) -> Result<CreateBookingResponse, ApiError> {
            let remaining = self.fail_creates.get();
            if remaining > 0 {
                self.fail_creates.set(remaining - 1);
                return Err(server_error());
            }
            self.inner.create_booking(request).await
        }
    }

    let backend = FailingOnce {
        inner: ScriptedBackend::with_slots(date(2025, 6, 15), vec![time(10, 0)]),
        fail_creates: Cell::new(1),
    };

    let mut session = BookingSession::new(backend, FlowPlan::standard());
    session.choose_service(premium_wash()).unwrap();
    session.advance().await.unwrap();
    session.choose_date(date(2025, 6, 15), today()).await.unwrap();
    session.choose_time(time(10, 0)).unwrap();
    session.advance().await.unwrap();
    session.set_vehicle_details(avanza()).unwrap();
    session.advance().await.unwrap();
    session.choose_payment_method(PaymentMethod::Cash).unwrap();
    session.advance().await.unwrap();

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, SessionError::Api(_)));
    assert!(!session.wizard().is_submitting());
    assert_eq!(session.wizard().current_step(), StepKind::Review);

    let booking_id = session.submit().await.unwrap();
    assert_eq!(booking_id, "CW-20250615-042");
}
