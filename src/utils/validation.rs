use crate::utils::error::{ContractError, Result};
use chrono::{NaiveDate, NaiveTime};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ContractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ContractError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ContractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ContractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ContractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ContractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// CSS 長度：數字加上 px / mm / cm / in
pub fn validate_css_length(field_name: &str, value: &str) -> Result<()> {
    let value = value.trim();
    let unit_at = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(unit_at);

    let number_ok = !number.is_empty() && number.parse::<f64>().map(|n| n >= 0.0).unwrap_or(false);
    if !number_ok || !matches!(unit, "px" | "mm" | "cm" | "in") {
        return Err(ContractError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a length such as 20px, 10mm, 1cm or 0.5in".to_string(),
        });
    }
    Ok(())
}

/// 金額必須是非負數字 (允許千分位逗號與小數)
pub fn validate_money(field_name: &str, value: &str) -> Result<()> {
    let digits: String = value.chars().filter(|c| *c != ',').collect();
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let whole_ok = !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit());
    let fraction_ok = fraction
        .map(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(true);

    if whole_ok && fraction_ok {
        Ok(())
    } else {
        Err(ContractError::malformed(
            field_name,
            format!("must be a non-negative amount, got '{}'", value),
        ))
    }
}

/// 解析 HH:MM (24 小時制) 時間
pub fn parse_time_of_day(field_name: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        ContractError::malformed(
            field_name,
            format!("must be a time of day in HH:MM format, got '{}'", value),
        )
    })
}

pub fn parse_event_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ContractError::malformed(
            field_name,
            format!("must be a date in YYYY-MM-DD format, got '{}'", value),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("render.endpoint", "https://example.com").is_ok());
        assert!(validate_url("render.endpoint", "http://localhost:3000").is_ok());
        assert!(validate_url("render.endpoint", "").is_err());
        assert!(validate_url("render.endpoint", "invalid-url").is_err());
        assert!(validate_url("render.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_css_length() {
        assert!(validate_css_length("margin", "20px").is_ok());
        assert!(validate_css_length("margin", "12.5mm").is_ok());
        assert!(validate_css_length("margin", "0in").is_ok());
        assert!(validate_css_length("margin", "20").is_err());
        assert!(validate_css_length("margin", "px").is_err());
        assert!(validate_css_length("margin", "-3px").is_err());
        assert!(validate_css_length("margin", "3em").is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money("venue_total", "1500").is_ok());
        assert!(validate_money("venue_total", "1,500.50").is_ok());
        assert!(validate_money("venue_total", "0").is_ok());
        assert!(validate_money("venue_total", "-100").is_err());
        assert!(validate_money("venue_total", "abc").is_err());
        assert!(validate_money("venue_total", "15.").is_err());
        assert!(validate_money("venue_total", "").is_err());
    }

    #[test]
    fn test_parse_time_and_date() {
        assert!(parse_time_of_day("day_start_time", "09:00").is_ok());
        assert!(parse_time_of_day("day_start_time", "9am").is_err());
        assert!(parse_time_of_day("day_start_time", "25:00").is_err());
        assert!(parse_event_date("event_date", "2026-12-24").is_ok());
        assert!(parse_event_date("event_date", "12/24/2026").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("render.timeout_seconds", 30, 1, 600).is_ok());
        assert!(validate_range("render.timeout_seconds", 0, 1, 600).is_err());
    }
}
