// ABOUTME: Wire types for the booking backend's customer endpoints
// Field names mirror the server's JSON/form bindings (camelCase).

use crate::models::{CompletedDraft, ServiceOffering};
use serde::{Deserialize, Serialize};

/// One catalog entry as returned by `GET api/services-by-vehicle-type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDto {
    pub id: i64,
    pub service_name: String,
    pub price: u32,
    pub estimated_duration_minutes: u32,
    #[serde(default)]
    pub description: String,
}

impl From<ServiceDto> for ServiceOffering {
    fn from(dto: ServiceDto) -> Self {
        Self {
            id: dto.id.to_string(),
            name: dto.service_name,
            price: dto.price,
            duration_minutes: dto.estimated_duration_minutes,
        }
    }
}

/// Form parameters for `POST booking/create`. The server binds request
/// params, so this is sent form-encoded rather than as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: String,
    /// ISO calendar date, e.g. `2025-06-15`
    pub date: String,
    /// 24-hour clock, e.g. `10:00`
    pub time: String,
    pub notes: String,
    pub vehicle_type: String,
    pub vehicle_brand: String,
    pub vehicle_model: String,
    pub license_plate: String,
    pub vehicle_color: String,
    pub payment_method: String,
}

impl From<&CompletedDraft> for CreateBookingRequest {
    fn from(draft: &CompletedDraft) -> Self {
        Self {
            service_id: draft.service.id.clone(),
            date: draft.date.format("%Y-%m-%d").to_string(),
            time: draft.time.format("%H:%M").to_string(),
            notes: draft.notes.clone(),
            vehicle_type: draft.vehicle.vehicle_type.clone(),
            vehicle_brand: draft.vehicle.brand.clone(),
            vehicle_model: draft.vehicle.model.clone(),
            license_plate: draft.vehicle.license_plate.clone(),
            vehicle_color: draft.vehicle.color.clone(),
            payment_method: draft.payment_method.as_wire_str().to_string(),
        }
    }
}

/// Outcome of `POST booking/create`. On failure `message` carries the
/// server's user-facing explanation verbatim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub success: bool,
    #[serde(default)]
    pub booking_id: Option<String>,
    #[serde(default)]
    pub message: String,
}
