use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConsolidationError;

/// Fixed vocabulary shared across the consolidation pipeline.
/// These constants define the source and row labels embedded in exported reports.

// Source label attached to the running total a report maintains itself
pub const AUTO_CALCULATED_SOURCE: &str = "auto-sum";

// Source label used when a scraper found no imported/undefined figures
pub const NOT_FOUND_SOURCE: &str = "not found";

// Labels for the two synthetic rows appended to every exported report
pub const IMPORTED_UNDEFINED_ROW_LABEL: &str = "Imported/Undefined";
pub const STATE_TOTAL_ROW_LABEL: &str = "State total";

/// Brazilian federative units, identified by their two-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Ac,
    Al,
    Am,
    Ap,
    Ba,
    Ce,
    Df,
    Es,
    Go,
    Ma,
    Mg,
    Ms,
    Mt,
    Pa,
    Pb,
    Pe,
    Pi,
    Pr,
    Rj,
    Rn,
    Ro,
    Rr,
    Rs,
    Sc,
    Se,
    Sp,
    To,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Ac => "AC",
            State::Al => "AL",
            State::Am => "AM",
            State::Ap => "AP",
            State::Ba => "BA",
            State::Ce => "CE",
            State::Df => "DF",
            State::Es => "ES",
            State::Go => "GO",
            State::Ma => "MA",
            State::Mg => "MG",
            State::Ms => "MS",
            State::Mt => "MT",
            State::Pa => "PA",
            State::Pb => "PB",
            State::Pe => "PE",
            State::Pi => "PI",
            State::Pr => "PR",
            State::Rj => "RJ",
            State::Rn => "RN",
            State::Ro => "RO",
            State::Rr => "RR",
            State::Rs => "RS",
            State::Sc => "SC",
            State::Se => "SE",
            State::Sp => "SP",
            State::To => "TO",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for State {
    type Err = ConsolidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "AC" => Ok(State::Ac),
            "AL" => Ok(State::Al),
            "AM" => Ok(State::Am),
            "AP" => Ok(State::Ap),
            "BA" => Ok(State::Ba),
            "CE" => Ok(State::Ce),
            "DF" => Ok(State::Df),
            "ES" => Ok(State::Es),
            "GO" => Ok(State::Go),
            "MA" => Ok(State::Ma),
            "MG" => Ok(State::Mg),
            "MS" => Ok(State::Ms),
            "MT" => Ok(State::Mt),
            "PA" => Ok(State::Pa),
            "PB" => Ok(State::Pb),
            "PE" => Ok(State::Pe),
            "PI" => Ok(State::Pi),
            "PR" => Ok(State::Pr),
            "RJ" => Ok(State::Rj),
            "RN" => Ok(State::Rn),
            "RO" => Ok(State::Ro),
            "RR" => Ok(State::Rr),
            "RS" => Ok(State::Rs),
            "SC" => Ok(State::Sc),
            "SE" => Ok(State::Se),
            "SP" => Ok(State::Sp),
            "TO" => Ok(State::To),
            other => Err(ConsolidationError::UnknownState(other.to_string())),
        }
    }
}

/// What kind of data a state's scraper is expected to deliver.
/// Reports are validated against the qualities registered for their state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportQuality {
    CountyBulletins,
    UndefinedOrImportedCases,
    OnlyTotal,
}

impl ReportQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportQuality::CountyBulletins => "county_bulletins",
            ReportQuality::UndefinedOrImportedCases => "undefined_or_imported_cases",
            ReportQuality::OnlyTotal => "only_total",
        }
    }
}
