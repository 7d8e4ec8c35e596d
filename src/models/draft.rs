// ABOUTME: Booking draft data model accumulating one booking's fields across wizard steps

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle category a service applies to.
///
/// Wire values match the backend's `VehicleType` enum (`MOBIL`/`MOTOR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleCategory {
    /// Car ("Mobil")
    Mobil,
    /// Motorcycle ("Motor")
    Motor,
}

impl VehicleCategory {
    /// Value sent as the `vehicleType` query/form parameter
    pub const fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Mobil => "MOBIL",
            Self::Motor => "MOTOR",
        }
    }

    /// Human-readable label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mobil => "Mobil",
            Self::Motor => "Motor",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobil" | "car" => Ok(Self::Mobil),
            "motor" | "motorcycle" => Ok(Self::Motor),
            other => Err(format!("unknown vehicle type: {other}")),
        }
    }
}

/// How the customer pays for the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Pay at the counter
    Cash,
    /// Bank transfer
    Transfer,
    /// Credit/debit card
    Card,
    /// E-wallet
    EWallet,
}

impl PaymentMethod {
    /// All supported methods, in display order
    pub fn all() -> &'static [PaymentMethod] {
        &[Self::Cash, Self::Transfer, Self::Card, Self::EWallet]
    }

    /// Value sent as the `paymentMethod` form parameter
    pub const fn as_wire_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Transfer => "TRANSFER",
            Self::Card => "CARD",
            Self::EWallet => "E_WALLET",
        }
    }

    /// Human-readable label, matching the backend's display names
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash Payment",
            Self::Transfer => "Bank Transfer",
            Self::Card => "Credit/Debit Card",
            Self::EWallet => "E-Wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "card" => Ok(Self::Card),
            "e-wallet" | "e_wallet" | "ewallet" => Ok(Self::EWallet),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// A selectable service offering from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    /// Catalog identifier, sent back as `serviceId` on submission
    pub id: String,
    /// Display name
    pub name: String,
    /// Price in minor currency units (rupiah)
    pub price: u32,
    /// Estimated duration in minutes
    pub duration_minutes: u32,
}

impl ServiceOffering {
    /// A selection is usable only with a real identifier
    pub fn has_valid_id(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Vehicle details collected on the vehicle step. All fields are required
/// non-empty strings once that step must validate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    pub color: String,
}

impl VehicleDetails {
    /// All five fields filled in (whitespace does not count)
    pub fn is_complete(&self) -> bool {
        [
            &self.vehicle_type,
            &self.brand,
            &self.model,
            &self.license_plate,
            &self.color,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// The in-memory record accumulating one booking's fields across wizard
/// steps. The draft is the single source of truth: views render it, never
/// the other way around.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub vehicle_category: Option<VehicleCategory>,
    pub service: Option<ServiceOffering>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub vehicle: VehicleDetails,
    pub notes: String,
    pub payment_method: Option<PaymentMethod>,
}

impl BookingDraft {
    /// Derived total: always the selected service's price, 0 when no
    /// service is selected. Never stored or independently mutated.
    pub fn total_amount(&self) -> u32 {
        self.service.as_ref().map_or(0, |s| s.price)
    }

    /// Record a new date. Picking a new date always clears the time; slots
    /// for the old date no longer apply.
    pub fn set_date(&mut self, date: NaiveDate) {
        if self.date != Some(date) {
            self.time = None;
        }
        self.date = Some(date);
    }

    /// Snapshot the draft into a submission-ready record, or `None` when a
    /// required field is still missing. A draft without an explicit payment
    /// method falls back to cash, matching the backend's default.
    pub fn try_complete(&self) -> Option<CompletedDraft> {
        let service = self.service.clone().filter(ServiceOffering::has_valid_id)?;
        let date = self.date?;
        let time = self.time?;
        if !self.vehicle.is_complete() {
            return None;
        }
        Some(CompletedDraft {
            service,
            date,
            time,
            vehicle: self.vehicle.clone(),
            notes: self.notes.clone(),
            payment_method: self.payment_method.unwrap_or(PaymentMethod::Cash),
        })
    }
}

/// A fully populated draft, produced only once every required field is
/// present. Submission code works from this so missing fields are
/// unrepresentable past the validation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedDraft {
    pub service: ServiceOffering,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub vehicle: VehicleDetails,
    pub notes: String,
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_service() -> ServiceOffering {
        ServiceOffering {
            id: "5".to_string(),
            name: "Premium Wash".to_string(),
            price: 50_000,
            duration_minutes: 30,
        }
    }

    fn complete_vehicle() -> VehicleDetails {
        VehicleDetails {
            vehicle_type: "MOBIL".to_string(),
            brand: "Toyota".to_string(),
            model: "Avanza".to_string(),
            license_plate: "B1234CD".to_string(),
            color: "Silver".to_string(),
        }
    }

    #[test]
    fn total_amount_follows_selected_service() {
        let mut draft = BookingDraft::default();
        assert_eq!(draft.total_amount(), 0);

        draft.service = Some(sample_service());
        assert_eq!(draft.total_amount(), 50_000);

        draft.service = None;
        assert_eq!(draft.total_amount(), 0);
    }

    #[test]
    fn new_date_clears_time() {
        let mut draft = BookingDraft::default();
        draft.set_date(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        draft.time = NaiveTime::from_hms_opt(10, 0, 0);

        draft.set_date(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
        assert!(draft.time.is_none());
    }

    #[test]
    fn same_date_keeps_time() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut draft = BookingDraft::default();
        draft.set_date(date);
        draft.time = NaiveTime::from_hms_opt(10, 0, 0);

        draft.set_date(date);
        assert!(draft.time.is_some());
    }

    #[test]
    fn vehicle_details_require_all_fields() {
        let mut vehicle = complete_vehicle();
        assert!(vehicle.is_complete());

        vehicle.color = "  ".to_string();
        assert!(!vehicle.is_complete());
    }

    #[test]
    fn try_complete_requires_every_field() {
        let mut draft = BookingDraft::default();
        assert!(draft.try_complete().is_none());

        draft.service = Some(sample_service());
        draft.date = NaiveDate::from_ymd_opt(2025, 6, 15);
        draft.time = NaiveTime::from_hms_opt(10, 0, 0);
        assert!(draft.try_complete().is_none(), "vehicle still incomplete");

        draft.vehicle = complete_vehicle();
        let completed = draft.try_complete().expect("draft is complete");
        assert_eq!(completed.payment_method, PaymentMethod::Cash);
        assert_eq!(completed.service.id, "5");
    }

    #[test]
    fn try_complete_rejects_blank_service_id() {
        let mut draft = BookingDraft::default();
        draft.service = Some(ServiceOffering {
            id: "  ".to_string(),
            name: "Ghost".to_string(),
            price: 1,
            duration_minutes: 1,
        });
        draft.date = NaiveDate::from_ymd_opt(2025, 6, 15);
        draft.time = NaiveTime::from_hms_opt(10, 0, 0);
        draft.vehicle = complete_vehicle();
        assert!(draft.try_complete().is_none());
    }

    #[test]
    fn wire_values_match_backend_enums() {
        assert_eq!(VehicleCategory::Mobil.as_wire_str(), "MOBIL");
        assert_eq!(VehicleCategory::Motor.as_wire_str(), "MOTOR");
        assert_eq!(PaymentMethod::EWallet.as_wire_str(), "E_WALLET");
        assert_eq!("motorcycle".parse::<VehicleCategory>(), Ok(VehicleCategory::Motor));
        assert_eq!("e-wallet".parse::<PaymentMethod>(), Ok(PaymentMethod::EWallet));
    }
}
