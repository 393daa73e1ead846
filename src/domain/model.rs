use crate::domain::catalog::{SupplierCatalogEntry, VenueCatalogEntry};
use crate::utils::error::Result;
use crate::utils::validation::validate_money;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;

pub const CLIENT_NAME: &str = "client_name";
pub const CLIENT_ADDRESS: &str = "client_address";
pub const CLIENT_CONTACT: &str = "client_contact";
pub const RESORT_TYPE: &str = "resort_type";
pub const IS_DAY: &str = "is_day";
pub const DAY_START_TIME: &str = "day_start_time";
pub const DAY_END_TIME: &str = "day_end_time";
pub const IS_NIGHT: &str = "is_night";
pub const NIGHT_START_TIME: &str = "night_start_time";
pub const NIGHT_END_TIME: &str = "night_end_time";
pub const EVENT_NAME: &str = "event_name";
pub const EVENT_DATE: &str = "event_date";
pub const VENUE_TOTAL: &str = "venue_total";

pub const SCALAR_KEYS: [&str; 13] = [
    CLIENT_NAME,
    CLIENT_ADDRESS,
    CLIENT_CONTACT,
    RESORT_TYPE,
    IS_DAY,
    DAY_START_TIME,
    DAY_END_TIME,
    IS_NIGHT,
    NIGHT_START_TIME,
    NIGHT_END_TIME,
    EVENT_NAME,
    EVENT_DATE,
    VENUE_TOTAL,
];

/// Non-negative amount, kept as the text the client typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money(String);

impl Money {
    pub fn parse(field: &str, raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        validate_money(field, trimmed)?;
        Ok(Money(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResortType {
    VP1,
    VP2,
}

impl ResortType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "VP1" => Some(ResortType::VP1),
            "VP2" => Some(ResortType::VP2),
            _ => None,
        }
    }
}

/// Day or night booking window. Times only exist when the slot is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduleSlot {
    Disabled,
    Enabled { start: NaiveTime, end: NaiveTime },
}

impl ScheduleSlot {
    pub fn is_enabled(&self) -> bool {
        matches!(self, ScheduleSlot::Enabled { .. })
    }

    /// `HH:MM - HH:MM`, or `None` for a disabled slot.
    pub fn time_range(&self) -> Option<String> {
        match self {
            ScheduleSlot::Disabled => None,
            ScheduleSlot::Enabled { start, end } => {
                Some(format!("{} - {}", start.format("%H:%M"), end.format("%H:%M")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSelection {
    pub venue: &'static VenueCatalogEntry,
    pub checked: bool,
    pub note: String,
    pub amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierSelection {
    pub supplier: &'static SupplierCatalogEntry,
    pub checked: bool,
    pub amount: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientDetails {
    pub name: String,
    pub address: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetails {
    pub name: String,
    pub date: NaiveDate,
}

/// One contract request after normalization.
///
/// Built only by [`crate::core::normalizer::Normalizer`]; the venue and supplier
/// lists always hold exactly one entry per catalog item, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRecord {
    client: ClientDetails,
    resort_type: ResortType,
    day: ScheduleSlot,
    night: ScheduleSlot,
    event: EventDetails,
    venues: Vec<VenueSelection>,
    suppliers: Vec<SupplierSelection>,
    venue_total: Money,
}

/// Normalized pieces handed to [`BookingRecord::assemble`].
pub(crate) struct BookingParts {
    pub client: ClientDetails,
    pub resort_type: ResortType,
    pub day: ScheduleSlot,
    pub night: ScheduleSlot,
    pub event: EventDetails,
    pub venues: Vec<VenueSelection>,
    pub suppliers: Vec<SupplierSelection>,
    pub venue_total: Money,
}

impl BookingRecord {
    pub(crate) fn assemble(parts: BookingParts) -> Self {
        Self {
            client: parts.client,
            resort_type: parts.resort_type,
            day: parts.day,
            night: parts.night,
            event: parts.event,
            venues: parts.venues,
            suppliers: parts.suppliers,
            venue_total: parts.venue_total,
        }
    }

    pub fn client(&self) -> &ClientDetails {
        &self.client
    }

    pub fn resort_type(&self) -> ResortType {
        self.resort_type
    }

    pub fn day(&self) -> ScheduleSlot {
        self.day
    }

    pub fn night(&self) -> ScheduleSlot {
        self.night
    }

    pub fn event(&self) -> &EventDetails {
        &self.event
    }

    pub fn venues(&self) -> &[VenueSelection] {
        &self.venues
    }

    pub fn suppliers(&self) -> &[SupplierSelection] {
        &self.suppliers
    }

    pub fn venue_total(&self) -> &Money {
        &self.venue_total
    }

    pub fn venue(&self, name: &str) -> Option<&VenueSelection> {
        self.venues.iter().find(|v| v.venue.name == name)
    }

    pub fn supplier(&self, id: &str) -> Option<&SupplierSelection> {
        self.suppliers.iter().find(|s| s.supplier.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_keeps_trimmed_text() {
        let money = Money::parse("venue_total", " 1,500 ").unwrap();
        assert_eq!(money.as_str(), "1,500");
        assert!(Money::parse("venue_total", "-1").is_err());
    }

    #[test]
    fn test_resort_type_is_exact() {
        assert_eq!(ResortType::parse("VP1"), Some(ResortType::VP1));
        assert_eq!(ResortType::parse("VP2"), Some(ResortType::VP2));
        assert_eq!(ResortType::parse("vp1"), None);
        assert_eq!(ResortType::parse(""), None);
    }

    #[test]
    fn test_schedule_slot_time_range() {
        let slot = ScheduleSlot::Enabled {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        };
        assert!(slot.is_enabled());
        assert_eq!(slot.time_range().as_deref(), Some("09:00 - 17:00"));
        assert_eq!(ScheduleSlot::Disabled.time_range(), None);
    }
}
