// ABOUTME: Core data models for booking drafts, services, and payment methods

pub mod draft;

pub use draft::{
    BookingDraft, CompletedDraft, PaymentMethod, ServiceOffering, VehicleCategory, VehicleDetails,
};
