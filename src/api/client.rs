// ABOUTME: HTTP client for the booking backend's customer endpoints

use crate::api::types::{CreateBookingRequest, CreateBookingResponse, ServiceDto};
use crate::models::{ServiceOffering, VehicleCategory};
use chrono::{NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Transport-level failures talking to the booking backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid backend base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not parse backend response: {0}")]
    Body(#[from] serde_json::Error),
}

/// Client for the three collaborator endpoints the wizard consumes:
/// service catalog, slot availability, and booking creation.
#[derive(Debug, Clone)]
pub struct BookingApiClient {
    client: Client,
    base_url: Url,
}

impl BookingApiClient {
    /// Build a client against a base URL such as
    /// `http://localhost:8080/customer/` (endpoint paths are joined onto it).
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ApiError> {
        // A base without a trailing slash would swallow its last path
        // segment on join.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)?;

        let client = Client::builder()
            .user_agent(concat!("washbook/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// `GET api/services-by-vehicle-type?vehicleType=...`
    /// An empty list is a valid "no services" state.
    pub async fn services_by_vehicle_type(
        &self,
        category: VehicleCategory,
    ) -> Result<Vec<ServiceOffering>, ApiError> {
        let url = self.base_url.join("api/services-by-vehicle-type")?;
        debug!(%category, "fetching service catalog");

        let response = self
            .client
            .get(url)
            .query(&[("vehicleType", category.as_wire_str())])
            .send()
            .await?;
        let body = Self::read_success_body(response).await?;

        let services: Vec<ServiceDto> = serde_json::from_slice(&body)?;
        debug!(count = services.len(), "service catalog received");
        Ok(services.into_iter().map(ServiceOffering::from).collect())
    }

    /// `GET api/available-slots?date=...`. Slots come back as `"HH:MM"`
    /// strings; entries that fail to parse are skipped with a warning.
    pub async fn available_slots(&self, date: NaiveDate) -> Result<Vec<NaiveTime>, ApiError> {
        let url = self.base_url.join("api/available-slots")?;
        debug!(%date, "fetching available slots");

        let response = self
            .client
            .get(url)
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;
        let body = Self::read_success_body(response).await?;

        let raw: Vec<String> = serde_json::from_slice(&body)?;
        let times = raw
            .iter()
            .filter_map(|slot| match NaiveTime::parse_from_str(slot, "%H:%M") {
                Ok(time) => Some(time),
                Err(_) => {
                    warn!(%slot, "skipping unparsable time slot");
                    None
                }
            })
            .collect::<Vec<_>>();
        debug!(count = times.len(), "slots received");
        Ok(times)
    }

    /// `POST booking/create` with form parameters, matching the server's
    /// request-param binding. Rejections with a parseable body are returned
    /// as a response (the caller surfaces the server message); anything
    /// else is a transport error.
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<CreateBookingResponse, ApiError> {
        let url = self.base_url.join("booking/create")?;
        debug!(service_id = %request.service_id, date = %request.date, time = %request.time,
               "submitting booking");

        let response = self.client.post(url).form(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<CreateBookingResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
            Err(e) => Err(ApiError::Body(e)),
        }
    }

    async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
