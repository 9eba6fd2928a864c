use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    State, IMPORTED_UNDEFINED_ROW_LABEL, NOT_FOUND_SOURCE, STATE_TOTAL_ROW_LABEL,
};
use crate::normalization::parse_count;

/// Shared behavior of every bulletin variant.
///
/// A count is "present" whenever it is `Some`, including `Some(0)`: a
/// scraper reporting zero deaths is reporting data, not missing it.
pub trait BulletinData {
    fn confirmed_cases(&self) -> Option<u64>;
    fn deaths(&self) -> Option<u64>;
    fn sources(&self) -> &[String];

    fn has_confirmed_cases(&self) -> bool {
        self.confirmed_cases().is_some()
    }

    fn has_deaths(&self) -> bool {
        self.deaths().is_some()
    }

    fn is_empty(&self) -> bool {
        !self.has_confirmed_cases() && !self.has_deaths()
    }

    fn is_complete(&self) -> bool {
        self.has_confirmed_cases() && self.has_deaths()
    }

    fn sources_label(&self) -> String {
        self.sources().join(" | ")
    }
}

/// One row of an exported report. `None` counts serialize as empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub city: String,
    pub confirmed: Option<u64>,
    pub deaths: Option<u64>,
}

/// Identity of a county within a report. City comes first so the derived
/// ordering sorts report rows alphabetically by city.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountyKey {
    pub city: String,
    pub state: State,
}

/// Case and death counts scraped for a single county.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountyBulletin {
    pub date: NaiveDate,
    pub state: State,
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub confirmed_cases: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub deaths: Option<u64>,
    pub sources: Vec<String>,
}

impl CountyBulletin {
    pub fn new(
        date: NaiveDate,
        state: State,
        city: impl Into<String>,
        confirmed_cases: Option<u64>,
        deaths: Option<u64>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date,
            state,
            city: city.into(),
            confirmed_cases,
            deaths,
            sources: vec![source.into()],
        }
    }

    pub fn key(&self) -> CountyKey {
        CountyKey {
            city: self.city.clone(),
            state: self.state,
        }
    }

    /// Combine two bulletins for the same county into one. Counts already
    /// present are never overwritten; sources are unioned in arrival order.
    pub fn merged_with(&self, other: &CountyBulletin) -> CountyBulletin {
        let mut merged = self.clone();
        if merged.confirmed_cases.is_none() {
            merged.confirmed_cases = other.confirmed_cases;
        }
        if merged.deaths.is_none() {
            merged.deaths = other.deaths;
        }
        for source in &other.sources {
            if !merged.sources.contains(source) {
                merged.sources.push(source.clone());
            }
        }
        merged
    }

    pub fn to_report_row(&self) -> ReportRow {
        ReportRow {
            city: self.city.clone(),
            confirmed: self.confirmed_cases,
            deaths: self.deaths,
        }
    }
}

// Sources never participate in equality: two scrapers reporting the same
// figures for the same county count as agreeing.
impl PartialEq for CountyBulletin {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.state == other.state
            && self.city == other.city
            && self.confirmed_cases == other.confirmed_cases
            && self.deaths == other.deaths
    }
}

impl Eq for CountyBulletin {}

impl BulletinData for CountyBulletin {
    fn confirmed_cases(&self) -> Option<u64> {
        self.confirmed_cases
    }

    fn deaths(&self) -> Option<u64> {
        self.deaths
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }
}

/// State-wide totals, either scraped from an official source or maintained
/// by the report itself as counties are folded in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTotalBulletin {
    pub date: NaiveDate,
    pub state: State,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub confirmed_cases: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub deaths: Option<u64>,
    pub sources: Vec<String>,
}

impl StateTotalBulletin {
    pub fn new(
        date: NaiveDate,
        state: State,
        confirmed_cases: Option<u64>,
        deaths: Option<u64>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date,
            state,
            confirmed_cases,
            deaths,
            sources: vec![source.into()],
        }
    }

    pub fn increase_confirmed_cases(&mut self, amount: u64) {
        self.confirmed_cases = Some(self.confirmed_cases.unwrap_or(0) + amount);
    }

    pub fn decrease_confirmed_cases(&mut self, amount: u64) {
        self.confirmed_cases = self.confirmed_cases.map(|count| count.saturating_sub(amount));
    }

    pub fn increase_deaths(&mut self, amount: u64) {
        self.deaths = Some(self.deaths.unwrap_or(0) + amount);
    }

    pub fn decrease_deaths(&mut self, amount: u64) {
        self.deaths = self.deaths.map(|count| count.saturating_sub(amount));
    }

    pub fn to_report_row(&self) -> ReportRow {
        ReportRow {
            city: STATE_TOTAL_ROW_LABEL.to_string(),
            confirmed: self.confirmed_cases,
            deaths: self.deaths,
        }
    }
}

impl PartialEq for StateTotalBulletin {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.state == other.state
            && self.confirmed_cases == other.confirmed_cases
            && self.deaths == other.deaths
    }
}

impl Eq for StateTotalBulletin {}

impl BulletinData for StateTotalBulletin {
    fn confirmed_cases(&self) -> Option<u64> {
        self.confirmed_cases
    }

    fn deaths(&self) -> Option<u64> {
        self.deaths
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }
}

/// Cases a state attributes to no county: imported from abroad or still
/// under investigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedUndefinedBulletin {
    pub date: NaiveDate,
    pub state: State,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub confirmed_cases: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub deaths: Option<u64>,
    pub sources: Vec<String>,
}

impl ImportedUndefinedBulletin {
    pub fn new(
        date: NaiveDate,
        state: State,
        confirmed_cases: Option<u64>,
        deaths: Option<u64>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date,
            state,
            confirmed_cases,
            deaths,
            sources: vec![source.into()],
        }
    }

    /// Placeholder for states whose scraper looked for imported/undefined
    /// figures and found none.
    pub fn not_found(date: NaiveDate, state: State) -> Self {
        Self::new(date, state, None, None, NOT_FOUND_SOURCE)
    }

    pub fn to_report_row(&self) -> ReportRow {
        ReportRow {
            city: IMPORTED_UNDEFINED_ROW_LABEL.to_string(),
            confirmed: self.confirmed_cases,
            deaths: self.deaths,
        }
    }
}

impl PartialEq for ImportedUndefinedBulletin {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.state == other.state
            && self.confirmed_cases == other.confirmed_cases
            && self.deaths == other.deaths
    }
}

impl Eq for ImportedUndefinedBulletin {}

impl BulletinData for ImportedUndefinedBulletin {
    fn confirmed_cases(&self) -> Option<u64> {
        self.confirmed_cases
    }

    fn deaths(&self) -> Option<u64> {
        self.deaths
    }

    fn sources(&self) -> &[String] {
        &self.sources
    }
}

/// Every bulletin shape a scraper can hand to the consolidator. The `kind`
/// tag on the wire selects the variant; records with an unrecognized tag
/// fail deserialization and get skipped upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bulletin {
    County(CountyBulletin),
    StateTotal(StateTotalBulletin),
    ImportedUndefined(ImportedUndefinedBulletin),
}

impl Bulletin {
    pub fn date(&self) -> NaiveDate {
        match self {
            Bulletin::County(bulletin) => bulletin.date,
            Bulletin::StateTotal(bulletin) => bulletin.date,
            Bulletin::ImportedUndefined(bulletin) => bulletin.date,
        }
    }

    pub fn state(&self) -> State {
        match self {
            Bulletin::County(bulletin) => bulletin.state,
            Bulletin::StateTotal(bulletin) => bulletin.state,
            Bulletin::ImportedUndefined(bulletin) => bulletin.state,
        }
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(u64),
        Text(String),
    }

    let raw = Option::<RawCount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawCount::Number(count)) => Some(count),
        Some(RawCount::Text(text)) => parse_count(&text),
        None => None,
    })
}
