//! Placeholder substitution for the contract template.
//!
//! Tokens look like `{{NAME}}` where `NAME` is made of `A-Z`, `0-9` and `_`.
//! The template is scanned once, left to right: substituted values are copied
//! into the output and never scanned again, so client text that happens to
//! contain braces, `$`, `&` or another token's spelling comes through verbatim.
//! Any other `{{...}}` sequence (CSS, inline scripts) is copied unchanged.

use crate::domain::catalog::SUPPLIERS;
use crate::domain::model::{BookingRecord, ResortType, ScheduleSlot, VenueSelection};
use crate::utils::error::{ContractError, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Version of the token vocabulary below. Bump together with the template asset.
pub const TEMPLATE_VOCABULARY_VERSION: u32 = 1;

pub const CONTRACT_DATE: &str = "CONTRACT_DATE";
pub const VP1_CHECKED: &str = "VP1_CHECKED";
pub const VP2_CHECKED: &str = "VP2_CHECKED";
pub const EVENT_DATE: &str = "EVENT_DATE";
pub const EVENT_NAME: &str = "EVENT_NAME";
pub const CLIENT_NAME: &str = "CLIENT_NAME";
pub const CLIENT_ADDRESS: &str = "CLIENT_ADDRESS";
pub const CLIENT_CONTACT: &str = "CLIENT_CONTACT";
pub const DAY_CHECKED: &str = "DAY_CHECKED";
pub const DAY_TIME: &str = "DAY_TIME";
pub const NIGHT_CHECKED: &str = "NIGHT_CHECKED";
pub const NIGHT_TIME: &str = "NIGHT_TIME";
pub const VENUE_ITEMS: &str = "VENUE_ITEMS";
pub const VENUE_TOTAL: &str = "VENUE_TOTAL";

const CHECK_MARK: &str = "checked";
const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Every token name of the current vocabulary.
pub fn vocabulary() -> Vec<String> {
    let mut names: Vec<String> = [
        CONTRACT_DATE,
        VP1_CHECKED,
        VP2_CHECKED,
        EVENT_DATE,
        EVENT_NAME,
        CLIENT_NAME,
        CLIENT_ADDRESS,
        CLIENT_CONTACT,
        DAY_CHECKED,
        DAY_TIME,
        NIGHT_CHECKED,
        NIGHT_TIME,
        VENUE_ITEMS,
        VENUE_TOTAL,
    ]
    .iter()
    .map(|t| t.to_string())
    .collect();

    for supplier in SUPPLIERS.iter() {
        names.push(supplier.checked_token());
        names.push(supplier.amount_token());
        names.push(supplier.fee_token());
    }
    names
}

/// Output of one substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub markup: String,
    /// Tokens found in the template with no value, in order of first appearance.
    pub unresolved: Vec<String>,
}

impl RenderedTemplate {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// 有未解析的 token 時回傳 TemplateMismatch
    pub fn into_markup(self) -> Result<String> {
        if self.unresolved.is_empty() {
            Ok(self.markup)
        } else {
            Err(ContractError::TemplateMismatch {
                tokens: self.unresolved,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// 以本地時鐘的今天作為合約日期
    pub fn render(&self, template: &str, record: &BookingRecord) -> RenderedTemplate {
        let today = chrono::Local::now().date_naive();
        self.render_on(template, record, today)
    }

    pub fn render_on(
        &self,
        template: &str,
        record: &BookingRecord,
        contract_date: NaiveDate,
    ) -> RenderedTemplate {
        let values = token_values(record, contract_date);
        let rendered = substitute(template, &values);

        if !rendered.is_complete() {
            tracing::warn!(
                "⚠️ Template (vocabulary v{}) has {} unresolved token(s): {:?}",
                TEMPLATE_VOCABULARY_VERSION,
                rendered.unresolved.len(),
                rendered.unresolved
            );
        }
        rendered
    }
}

/// Computes the textual value of every token for one booking.
pub fn token_values(record: &BookingRecord, contract_date: NaiveDate) -> HashMap<String, String> {
    let mut values = HashMap::new();
    let mut put = |name: &str, value: String| {
        values.insert(name.to_string(), value);
    };

    put(CONTRACT_DATE, contract_date.format("%B %-d, %Y").to_string());
    put(VP1_CHECKED, mark(record.resort_type() == ResortType::VP1));
    put(VP2_CHECKED, mark(record.resort_type() == ResortType::VP2));
    put(EVENT_DATE, record.event().date.format("%Y-%m-%d").to_string());
    put(EVENT_NAME, record.event().name.clone());
    put(CLIENT_NAME, record.client().name.clone());
    put(CLIENT_ADDRESS, record.client().address.clone());
    put(CLIENT_CONTACT, record.client().contact.clone());
    put(DAY_CHECKED, mark(record.day().is_enabled()));
    put(DAY_TIME, slot_text(record.day()));
    put(NIGHT_CHECKED, mark(record.night().is_enabled()));
    put(NIGHT_TIME, slot_text(record.night()));
    put(VENUE_ITEMS, venue_items(record.venues()));
    put(VENUE_TOTAL, record.venue_total().to_string());

    for selection in record.suppliers() {
        let supplier = selection.supplier;
        put(&supplier.checked_token(), mark(selection.checked));
        put(
            &supplier.amount_token(),
            selection
                .amount
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_default(),
        );
        put(&supplier.fee_token(), supplier.default_fee.to_string());
    }

    values
}

fn mark(on: bool) -> String {
    if on {
        CHECK_MARK.to_string()
    } else {
        String::new()
    }
}

fn slot_text(slot: ScheduleSlot) -> String {
    slot.time_range().unwrap_or_default()
}

fn venue_items(venues: &[VenueSelection]) -> String {
    venues
        .iter()
        .map(|selection| {
            let checkbox_class = if selection.checked {
                "venue-checkbox checked"
            } else {
                "venue-checkbox"
            };
            let amount = selection
                .amount
                .as_ref()
                .map(|m| m.as_str())
                .unwrap_or_default();
            format!(
                "\n      <div class=\"venue-item\">\n        <div class=\"{}\"></div>\n        <span class=\"venue-name\">{}</span>\n        <span class=\"venue-note\">{}</span>\n        <span class=\"venue-amount\">Php {}</span>\n      </div>\n    ",
                checkbox_class,
                selection.venue.display_label(),
                selection.note,
                amount
            )
        })
        .collect()
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Single left-to-right pass replacing known tokens with their values.
pub fn substitute(template: &str, values: &HashMap<String, String>) -> RenderedTemplate {
    let mut markup = String::with_capacity(template.len() + 1024);
    let mut unresolved: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find(OPEN) {
        markup.push_str(&rest[..open]);
        let after_open = &rest[open + OPEN.len()..];

        let name = after_open
            .find(CLOSE)
            .map(|close| &after_open[..close])
            .filter(|name| is_token_name(name));

        match name {
            Some(name) => {
                match values.get(name) {
                    Some(value) => markup.push_str(value),
                    None => {
                        // 保留原樣並回報
                        markup.push_str(OPEN);
                        markup.push_str(name);
                        markup.push_str(CLOSE);
                        if !unresolved.iter().any(|u| u == name) {
                            unresolved.push(name.to_string());
                        }
                    }
                }
                rest = &after_open[name.len() + CLOSE.len()..];
            }
            None => {
                // 不是 token：只輸出一個 '{'，讓 "{{{NAME}}" 之類的情況仍能對齊
                markup.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    markup.push_str(rest);

    RenderedTemplate { markup, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::Normalizer;
    use crate::domain::submission::Submission;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn record(extra: &[(&str, &str)]) -> BookingRecord {
        let mut submission = Submission::from_pairs([
            ("client_name", "Juan Dela Cruz"),
            ("client_address", "Quezon City"),
            ("client_contact", "0917 000 0000"),
            ("resort_type", "VP1"),
            ("event_name", "Birthday"),
            ("event_date", "2026-12-24"),
            ("venue_total", "1500"),
        ]);
        for (k, v) in extra {
            submission = submission.with_text(*k, *v);
        }
        Normalizer::new().normalize(&submission).unwrap()
    }

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let rendered = substitute(
            "<p>{{CLIENT_NAME}}</p><i>{{CLIENT_NAME}}</i>",
            &values(&[("CLIENT_NAME", "Ana")]),
        );
        assert_eq!(rendered.markup, "<p>Ana</p><i>Ana</i>");
        assert!(rendered.is_complete());
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let rendered = substitute(
            "{{CLIENT_NAME}}|{{EVENT_NAME}}",
            &values(&[("CLIENT_NAME", "{{EVENT_NAME}} $1 \\d+ (.*)"), ("EVENT_NAME", "Party")]),
        );
        assert_eq!(rendered.markup, "{{EVENT_NAME}} $1 \\d+ (.*)|Party");
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn test_unknown_token_is_kept_and_reported_once() {
        let rendered = substitute(
            "{{PAX_COUNT}} and {{CLIENT_NAME}} and {{PAX_COUNT}}",
            &values(&[("CLIENT_NAME", "Ana")]),
        );
        assert_eq!(rendered.markup, "{{PAX_COUNT}} and Ana and {{PAX_COUNT}}");
        assert_eq!(rendered.unresolved, vec!["PAX_COUNT".to_string()]);

        match rendered.into_markup() {
            Err(ContractError::TemplateMismatch { tokens }) => assert_eq!(tokens, vec!["PAX_COUNT"]),
            other => panic!("expected TemplateMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_non_token_braces_are_copied() {
        let template = "a {{ not a token }} b {{lower}} c {{{CLIENT_NAME}}} d {{ e }}";
        let rendered = substitute(template, &values(&[("CLIENT_NAME", "X")]));
        assert_eq!(rendered.markup, "a {{ not a token }} b {{lower}} c {X} d {{ e }}");
        assert!(rendered.is_complete());
    }

    #[test]
    fn test_unterminated_token_is_copied() {
        let rendered = substitute("tail {{CLIENT_NAME", &values(&[("CLIENT_NAME", "X")]));
        assert_eq!(rendered.markup, "tail {{CLIENT_NAME");
    }

    #[test]
    fn test_unused_values_are_ignored() {
        let rendered = substitute("static", &values(&[("CLIENT_NAME", "X")]));
        assert_eq!(rendered.markup, "static");
        assert!(rendered.is_complete());
    }

    #[test]
    fn test_token_values_cover_vocabulary() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let map = token_values(&record(&[]), date);
        let mut expected = vocabulary();
        expected.sort();
        let mut actual: Vec<String> = map.keys().cloned().collect();
        actual.sort();
        assert_eq!(actual, expected);
        assert_eq!(map[CONTRACT_DATE], "October 19, 2026");
        assert_eq!(map[VP1_CHECKED], "checked");
        assert_eq!(map[VP2_CHECKED], "");
        assert_eq!(map["CATERING_FEE"], "3000");
    }

    #[test]
    fn test_disabled_slot_renders_nothing() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let map = token_values(
            &record(&[("day_start_time", "09:00"), ("day_end_time", "17:00")]),
            date,
        );
        assert_eq!(map[DAY_CHECKED], "");
        assert_eq!(map[DAY_TIME], "");
    }

    #[test]
    fn test_unchecked_venue_still_shows_amount() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let map = token_values(&record(&[("amount_Room 1", "800")]), date);
        let items = &map[VENUE_ITEMS];
        let room_line = items
            .split("<div class=\"venue-item\">")
            .find(|chunk| chunk.contains("ROOM 1"))
            .unwrap();
        assert!(room_line.contains("<div class=\"venue-checkbox\"></div>"));
        assert!(room_line.contains("Php 800"));
        assert!(!room_line.contains("checked"));
    }

    #[test]
    fn test_venue_items_follow_catalog_order() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let map = token_values(&record(&[]), date);
        let items = &map[VENUE_ITEMS];
        let positions: Vec<usize> = crate::domain::catalog::VENUES
            .iter()
            .map(|v| items.find(&format!(">{}<", v.display_label())).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert_eq!(items.matches("class=\"venue-item\"").count(), 7);
    }
}
