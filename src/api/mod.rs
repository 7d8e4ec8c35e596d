// ABOUTME: Booking backend API client and wire types

pub mod client;
pub mod types;

pub use client::{ApiError, BookingApiClient};
pub use types::{CreateBookingRequest, CreateBookingResponse, ServiceDto};
