use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConsolidationError, Result};

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/.-](\d{1,2})[/.-](\d{4})").unwrap());

static IN_FULL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})º?\s+de\s+([a-záàâãéêíóôõúç]+)\s+de\s+(\d{4})").unwrap()
});

/// Parse a case/death count as scraped from a bulletin.
///
/// Counts arrive either as plain integers or as pt-BR formatted strings
/// ("12.345", "1 234"). Anything that is not clearly a number comes back
/// as `None` so the caller can record the field as absent.
pub fn parse_count(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == ' ' || c == '\u{a0}')
    {
        return None;
    }
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Map a pt-BR month name to its number, tolerating the unaccented
/// spelling of "março".
pub fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "janeiro" => Some(1),
        "fevereiro" => Some(2),
        "março" | "marco" => Some(3),
        "abril" => Some(4),
        "maio" => Some(5),
        "junho" => Some(6),
        "julho" => Some(7),
        "agosto" => Some(8),
        "setembro" => Some(9),
        "outubro" => Some(10),
        "novembro" => Some(11),
        "dezembro" => Some(12),
        _ => None,
    }
}

/// Find a numeric day/month/year date ("14/06/2021", "14-06-2021") in free text.
pub fn extract_numeric_date(text: &str) -> Option<NaiveDate> {
    let captures = NUMERIC_DATE.captures(text)?;
    let day: u32 = captures[1].parse().ok()?;
    let month: u32 = captures[2].parse().ok()?;
    let year: i32 = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Find a written-out pt-BR date ("14 de junho de 2021") in free text.
pub fn extract_in_full_date(text: &str) -> Option<NaiveDate> {
    let captures = IN_FULL_DATE.captures(text)?;
    let day: u32 = captures[1].parse().ok()?;
    let month = month_number(&captures[2])?;
    let year: i32 = captures[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a date in any of the formats bulletins and CLI arguments use:
/// ISO ("2021-06-14"), numeric pt-BR ("14/06/2021") or written out
/// ("14 de junho de 2021").
pub fn parse_date_flexible(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    extract_numeric_date(trimmed)
        .or_else(|| extract_in_full_date(trimmed))
        .ok_or_else(|| ConsolidationError::InvalidDate(text.to_string()))
}
