use serde::{Deserialize, Serialize};

/// Data problems a report can carry without being rejected.
///
/// The catalog is kept deliberately small: every kind that fires gets
/// concatenated into the name of the exported file, so reviewers can spot
/// troubled reports from a directory listing alone.
///
/// Variants are declared in slug order, so ordered iteration yields the
/// slugs already sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    MissingConfirmedCases,
    MissingCountyBulletins,
    MissingDeaths,
    MissingImportedUndefinedCases,
    NoOfficialTotal,
    OnlyTotal,
    SourcesDontMatch,
    TotalDontMatch,
}

impl WarningKind {
    pub fn as_slug(&self) -> &'static str {
        match self {
            WarningKind::MissingConfirmedCases => "MISSING_CONFIRMED_CASES",
            WarningKind::MissingCountyBulletins => "MISSING_COUNTY_BULLETINS",
            WarningKind::MissingDeaths => "MISSING_DEATHS",
            WarningKind::MissingImportedUndefinedCases => "MISSING_IMPORTED_UNDEFINED_CASES",
            WarningKind::NoOfficialTotal => "NO_OFFICIAL_TOTAL",
            WarningKind::OnlyTotal => "ONLY_TOTAL",
            WarningKind::SourcesDontMatch => "SOURCES_DONT_MATCH",
            WarningKind::TotalDontMatch => "TOTAL_DONT_MATCH",
        }
    }
}

/// A single warning attached to a report, with an optional free-form
/// description giving reviewers the figures behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub description: Option<String>,
}

impl Warning {
    pub fn new(kind: WarningKind, description: Option<String>) -> Self {
        Self { kind, description }
    }
}
