//! Turns a raw flat submission into a [`BookingRecord`].
//!
//! Required scalars are validated strictly: an absent or blank value fails with
//! `MalformedRequest` naming the field. Venue and supplier entries never fail for
//! being absent; they default to unchecked with no note or amount.

use crate::domain::catalog::{SUPPLIERS, VENUES};
use crate::domain::model::{
    self, BookingParts, BookingRecord, ClientDetails, EventDetails, Money, ResortType,
    ScheduleSlot, SupplierSelection, VenueSelection,
};
use crate::domain::submission::Submission;
use crate::utils::error::{ContractError, Result};
use crate::utils::validation::{parse_event_date, parse_time_of_day};

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, submission: &Submission) -> Result<BookingRecord> {
        let unknown = submission.unrecognized_keys();
        if !unknown.is_empty() {
            tracing::warn!(
                "⚠️ Ignoring {} unrecognized submission key(s): {:?}",
                unknown.len(),
                unknown
            );
        }

        let client = ClientDetails {
            name: required(submission, model::CLIENT_NAME)?.to_string(),
            address: required(submission, model::CLIENT_ADDRESS)?.to_string(),
            contact: required(submission, model::CLIENT_CONTACT)?.to_string(),
        };

        let resort_raw = required(submission, model::RESORT_TYPE)?;
        let resort_type = ResortType::parse(resort_raw).ok_or_else(|| {
            ContractError::malformed(
                model::RESORT_TYPE,
                format!("must be VP1 or VP2, got '{}'", resort_raw),
            )
        })?;

        let day = schedule_slot(
            submission,
            model::IS_DAY,
            model::DAY_START_TIME,
            model::DAY_END_TIME,
        )?;
        let night = schedule_slot(
            submission,
            model::IS_NIGHT,
            model::NIGHT_START_TIME,
            model::NIGHT_END_TIME,
        )?;

        let event = EventDetails {
            name: required(submission, model::EVENT_NAME)?.to_string(),
            date: parse_event_date(model::EVENT_DATE, required(submission, model::EVENT_DATE)?)?,
        };

        let venues = VENUES
            .iter()
            .map(|venue| {
                let keys = venue.keys();
                Ok(VenueSelection {
                    venue,
                    checked: submission.checkbox(&keys.selected),
                    note: submission.text(&keys.note).trim().to_string(),
                    amount: optional_money(submission, &keys.amount)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let suppliers = SUPPLIERS
            .iter()
            .map(|supplier| {
                let keys = supplier.keys();
                Ok(SupplierSelection {
                    supplier,
                    checked: submission.checkbox(&keys.checked),
                    amount: optional_money(submission, &keys.amount)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let venue_total = Money::parse(
            model::VENUE_TOTAL,
            required(submission, model::VENUE_TOTAL)?,
        )?;

        tracing::debug!(
            "Normalized booking: {} venue(s) checked, {} supplier(s) checked",
            venues.iter().filter(|v| v.checked).count(),
            suppliers.iter().filter(|s| s.checked).count()
        );

        Ok(BookingRecord::assemble(BookingParts {
            client,
            resort_type,
            day,
            night,
            event,
            venues,
            suppliers,
            venue_total,
        }))
    }
}

fn required<'a>(submission: &'a Submission, key: &str) -> Result<&'a str> {
    submission
        .non_blank(key)
        .ok_or_else(|| ContractError::malformed(key, "is required"))
}

fn optional_money(submission: &Submission, key: &str) -> Result<Option<Money>> {
    submission
        .non_blank(key)
        .map(|raw| Money::parse(key, raw))
        .transpose()
}

fn schedule_slot(
    submission: &Submission,
    enabled_key: &str,
    start_key: &str,
    end_key: &str,
) -> Result<ScheduleSlot> {
    // 未勾選時完全忽略時間欄位，即使格式錯誤也不檢查
    if !submission.checkbox(enabled_key) {
        return Ok(ScheduleSlot::Disabled);
    }

    let start = parse_time_of_day(start_key, required(submission, start_key)?)?;
    let end = parse_time_of_day(end_key, required(submission, end_key)?)?;
    Ok(ScheduleSlot::Enabled { start, end })
}
