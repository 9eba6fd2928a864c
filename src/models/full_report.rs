use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use tracing::debug;

use crate::constants::{ReportQuality, State, AUTO_CALCULATED_SOURCE};
use crate::error::{ConsolidationError, Result};
use crate::models::bulletin::{
    Bulletin, BulletinData, CountyBulletin, CountyKey, ImportedUndefinedBulletin, ReportRow,
    StateTotalBulletin,
};
use crate::warnings::{Warning, WarningKind};

/// Everything known about one state on one reference date, reconciled from
/// however many bulletins the scrapers produced.
///
/// Counties are folded into a running auto-calculated total as they arrive.
/// Officially published totals are collected separately and only used to
/// cross-check the running total, never to feed it.
#[derive(Debug)]
pub struct FullReport {
    pub reference_date: NaiveDate,
    pub published_at: NaiveDate,
    pub state: State,
    county_bulletins: BTreeMap<CountyKey, CountyBulletin>,
    official_total_bulletins: Vec<StateTotalBulletin>,
    auto_calculated_total: StateTotalBulletin,
    undefined_or_imported_bulletin: ImportedUndefinedBulletin,
    expected_qualities: Vec<ReportQuality>,
    warnings: BTreeMap<WarningKind, Warning>,
}

impl FullReport {
    pub fn new(
        reference_date: NaiveDate,
        published_at: NaiveDate,
        state: State,
        expected_qualities: Vec<ReportQuality>,
    ) -> Result<Self> {
        if expected_qualities.is_empty() {
            return Err(ConsolidationError::BadReport(
                "a report can't have no qualities".to_string(),
            ));
        }
        Ok(Self {
            reference_date,
            published_at,
            state,
            county_bulletins: BTreeMap::new(),
            official_total_bulletins: Vec::new(),
            auto_calculated_total: StateTotalBulletin::new(
                reference_date,
                state,
                None,
                None,
                AUTO_CALCULATED_SOURCE,
            ),
            undefined_or_imported_bulletin: ImportedUndefinedBulletin::not_found(
                reference_date,
                state,
            ),
            expected_qualities,
            warnings: BTreeMap::new(),
        })
    }

    /// The total the report stands behind: the first officially published
    /// total when there is one, the auto-calculated sum otherwise.
    pub fn total_bulletin(&self) -> &StateTotalBulletin {
        self.official_total_bulletins
            .first()
            .unwrap_or(&self.auto_calculated_total)
    }

    pub fn county_bulletins(&self) -> impl Iterator<Item = &CountyBulletin> {
        self.county_bulletins.values()
    }

    pub fn county_bulletin_count(&self) -> usize {
        self.county_bulletins.len()
    }

    pub fn undefined_or_imported_bulletin(&self) -> &ImportedUndefinedBulletin {
        &self.undefined_or_imported_bulletin
    }

    pub fn has_undefined_or_imported_cases(&self) -> bool {
        !self.undefined_or_imported_bulletin.is_empty()
    }

    pub fn auto_calculated_total(&self) -> &StateTotalBulletin {
        &self.auto_calculated_total
    }

    pub fn official_total_bulletins(&self) -> &[StateTotalBulletin] {
        &self.official_total_bulletins
    }

    pub fn expected_qualities(&self) -> &[ReportQuality] {
        &self.expected_qualities
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.values()
    }

    /// Fold one more scraped bulletin into the report.
    pub fn add_new_bulletin(&mut self, bulletin: Bulletin) {
        match bulletin {
            Bulletin::County(county) => self.add_county_bulletin(county),
            Bulletin::ImportedUndefined(undefined) => {
                self.add_undefined_or_imported_bulletin(undefined)
            }
            Bulletin::StateTotal(total) => self.add_total_bulletin(total),
        }
    }

    fn add_county_bulletin(&mut self, incoming: CountyBulletin) {
        let resolved = match self.pop_county_bulletin(&incoming) {
            Some(existing) => self.reconcile_county_bulletins(existing, incoming),
            None => incoming,
        };
        if let Some(cases) = resolved.confirmed_cases {
            self.auto_calculated_total.increase_confirmed_cases(cases);
        }
        if let Some(deaths) = resolved.deaths {
            self.auto_calculated_total.increase_deaths(deaths);
        }
        self.county_bulletins.insert(resolved.key(), resolved);
    }

    /// Remove the stored bulletin for the incoming bulletin's county, if any,
    /// backing its figures out of the running total.
    fn pop_county_bulletin(&mut self, incoming: &CountyBulletin) -> Option<CountyBulletin> {
        let existing = self.county_bulletins.remove(&incoming.key())?;
        if let Some(cases) = existing.confirmed_cases {
            self.auto_calculated_total.decrease_confirmed_cases(cases);
        }
        if let Some(deaths) = existing.deaths {
            self.auto_calculated_total.decrease_deaths(deaths);
        }
        Some(existing)
    }

    /// Decide which figures survive when two bulletins describe the same
    /// county: identical data keeps the stored bulletin, a complete bulletin
    /// beats a partial one (earlier-seen wins when both are complete), and
    /// two partial bulletins get merged. Disagreeing numbers warn but never
    /// block the resolution.
    fn reconcile_county_bulletins(
        &mut self,
        existing: CountyBulletin,
        incoming: CountyBulletin,
    ) -> CountyBulletin {
        if existing == incoming {
            return existing;
        }
        if Self::counts_conflict(&existing, &incoming) {
            debug!(
                "Conflicting figures for {}: {} vs {}",
                existing.city,
                existing.sources_label(),
                incoming.sources_label()
            );
            self.add_warning(
                WarningKind::SourcesDontMatch,
                Some(format!(
                    "County case/death counts disagree between two data sources.\nSource 1: {}\nSource 2: {}",
                    existing.sources_label(),
                    incoming.sources_label()
                )),
            );
        }
        if existing.is_complete() {
            return existing;
        }
        if incoming.is_complete() {
            return incoming;
        }
        existing.merged_with(&incoming)
    }

    fn counts_conflict(first: &CountyBulletin, second: &CountyBulletin) -> bool {
        let confirmed_conflict = first.has_confirmed_cases()
            && second.has_confirmed_cases()
            && first.confirmed_cases != second.confirmed_cases;
        let deaths_conflict =
            first.has_deaths() && second.has_deaths() && first.deaths != second.deaths;
        confirmed_conflict || deaths_conflict
    }

    fn add_undefined_or_imported_bulletin(&mut self, bulletin: ImportedUndefinedBulletin) {
        if let Some(cases) = bulletin.confirmed_cases {
            self.auto_calculated_total.increase_confirmed_cases(cases);
        }
        if let Some(deaths) = bulletin.deaths {
            self.auto_calculated_total.increase_deaths(deaths);
        }
        // Unlike counties, the replaced bucket is not backed out of the
        // running total first: a state sending this bucket twice gets its
        // figures counted twice. Scrapers send at most one per report.
        self.undefined_or_imported_bulletin = bulletin;
    }

    fn add_total_bulletin(&mut self, bulletin: StateTotalBulletin) {
        // Official totals are cross-check input, they never feed the running total.
        if !bulletin.is_empty() {
            self.official_total_bulletins.push(bulletin);
        }
    }

    fn add_warning(&mut self, kind: WarningKind, description: Option<String>) {
        self.warnings
            .entry(kind)
            .or_insert_with(|| Warning::new(kind, description));
    }

    /// True when every official total agrees with the auto-calculated
    /// confirmed case count. A report without official totals can't be
    /// cross-checked, so it never passes.
    pub fn check_total_confirmed_cases(&self) -> bool {
        if self.official_total_bulletins.is_empty() {
            return false;
        }
        let expected = self.auto_calculated_total.confirmed_cases;
        self.official_total_bulletins
            .iter()
            .all(|bulletin| bulletin.confirmed_cases == expected)
    }

    pub fn check_total_death_cases(&self) -> bool {
        if self.official_total_bulletins.is_empty() {
            return false;
        }
        let expected = self.auto_calculated_total.deaths;
        self.official_total_bulletins
            .iter()
            .all(|bulletin| bulletin.deaths == expected)
    }

    /// Inspect the finished report and record whatever warnings apply.
    /// Safe to call repeatedly: a kind that already fired keeps its first
    /// description.
    fn auto_detect_warnings(&mut self) {
        if self.expects(ReportQuality::CountyBulletins) && self.county_bulletins.is_empty() {
            self.add_warning(WarningKind::MissingCountyBulletins, None);
        }
        if self.expects(ReportQuality::UndefinedOrImportedCases)
            && !self.has_undefined_or_imported_cases()
        {
            self.add_warning(WarningKind::MissingImportedUndefinedCases, None);
        }
        if self.expects(ReportQuality::OnlyTotal) {
            self.add_warning(WarningKind::OnlyTotal, None);
        }
        if !self.total_bulletin().has_confirmed_cases() {
            self.add_warning(WarningKind::MissingConfirmedCases, None);
        }
        if !self.total_bulletin().has_deaths() {
            self.add_warning(WarningKind::MissingDeaths, None);
        }
        if self.official_total_bulletins.is_empty() {
            self.add_warning(WarningKind::NoOfficialTotal, None);
        } else if !self.auto_calculated_total.is_empty()
            && (!self.check_total_confirmed_cases() || !self.check_total_death_cases())
        {
            let description = self.total_mismatch_description();
            self.add_warning(WarningKind::TotalDontMatch, Some(description));
        }
    }

    fn expects(&self, quality: ReportQuality) -> bool {
        self.expected_qualities.contains(&quality)
    }

    fn total_mismatch_description(&self) -> String {
        let mut lines = vec![
            "Auto-calculated and official totals disagree.".to_string(),
            format!(
                "{}: confirmed={}, deaths={}",
                self.auto_calculated_total.sources_label(),
                fmt_count(self.auto_calculated_total.confirmed_cases),
                fmt_count(self.auto_calculated_total.deaths)
            ),
        ];
        for bulletin in &self.official_total_bulletins {
            lines.push(format!(
                "{}: confirmed={}, deaths={}",
                bulletin.sources_label(),
                fmt_count(bulletin.confirmed_cases),
                fmt_count(bulletin.deaths)
            ));
        }
        lines.join("\n")
    }

    /// Slug appended to exported file names so troubled reports stand out in
    /// a directory listing: empty for a clean report, otherwise the sorted
    /// warning slugs joined by double underscores.
    pub fn warnings_slug(&mut self) -> String {
        self.auto_detect_warnings();
        if self.warnings.is_empty() {
            return String::new();
        }
        // Keys iterate in slug order already.
        let slugs: Vec<&str> = self.warnings.keys().map(|kind| kind.as_slug()).collect();
        format!("__{}", slugs.join("__"))
    }

    /// Rows of the exported report: counties with data sorted by city, then
    /// the imported/undefined bucket, then the chosen state total. The two
    /// trailing rows are always present, empty or not.
    pub fn to_rows(&self) -> Vec<ReportRow> {
        let mut rows: Vec<ReportRow> = self
            .county_bulletins
            .values()
            .filter(|bulletin| !bulletin.is_empty())
            .map(CountyBulletin::to_report_row)
            .collect();
        rows.push(self.undefined_or_imported_bulletin.to_report_row());
        rows.push(self.total_bulletin().to_report_row());
        rows
    }
}

impl fmt::Display for FullReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FullReport(state={}, reference_date={}, published_at={}, counties={}, undefined_or_imported={}, total: confirmed={}, deaths={})",
            self.state,
            self.reference_date.format("%d/%m/%Y"),
            self.published_at.format("%d/%m/%Y"),
            self.county_bulletins.len(),
            self.has_undefined_or_imported_cases(),
            fmt_count(self.total_bulletin().confirmed_cases),
            fmt_count(self.total_bulletin().deaths),
        )
    }
}

fn fmt_count(count: Option<u64>) -> String {
    count.map(|value| value.to_string()).unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::constants::NOT_FOUND_SOURCE;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, 1).unwrap()
    }

    fn create_test_report(qualities: Vec<ReportQuality>) -> FullReport {
        FullReport::new(test_date(), test_date(), State::Ro, qualities).unwrap()
    }

    fn create_county_report() -> FullReport {
        create_test_report(vec![
            ReportQuality::CountyBulletins,
            ReportQuality::UndefinedOrImportedCases,
        ])
    }

    fn county(city: &str, confirmed_cases: Option<u64>, deaths: Option<u64>) -> Bulletin {
        county_from(city, confirmed_cases, deaths, "http://source-a.ro.gov.br")
    }

    fn county_from(
        city: &str,
        confirmed_cases: Option<u64>,
        deaths: Option<u64>,
        source: &str,
    ) -> Bulletin {
        Bulletin::County(CountyBulletin::new(
            test_date(),
            State::Ro,
            city,
            confirmed_cases,
            deaths,
            source,
        ))
    }

    fn official_total(confirmed_cases: Option<u64>, deaths: Option<u64>) -> Bulletin {
        Bulletin::StateTotal(StateTotalBulletin::new(
            test_date(),
            State::Ro,
            confirmed_cases,
            deaths,
            "http://saude.ro.gov.br",
        ))
    }

    fn undefined(confirmed_cases: Option<u64>, deaths: Option<u64>) -> Bulletin {
        Bulletin::ImportedUndefined(ImportedUndefinedBulletin::new(
            test_date(),
            State::Ro,
            confirmed_cases,
            deaths,
            "http://saude.ro.gov.br",
        ))
    }

    #[test]
    fn test_report_requires_at_least_one_quality() {
        let result = FullReport::new(test_date(), test_date(), State::Ro, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_report_starts_with_placeholders() {
        let report = create_county_report();

        assert_eq!(report.county_bulletin_count(), 0);
        assert_eq!(report.official_total_bulletins().len(), 0);
        assert!(report.auto_calculated_total().is_empty());
        assert!(!report.has_undefined_or_imported_cases());
        assert_eq!(
            report.undefined_or_imported_bulletin().sources,
            vec![NOT_FOUND_SOURCE.to_string()]
        );
    }

    #[test]
    fn test_counties_feed_the_running_total() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(county("Jaru", Some(5), None));

        assert_eq!(report.auto_calculated_total().confirmed_cases, Some(15));
        assert_eq!(report.auto_calculated_total().deaths, Some(1));
        assert_eq!(report.county_bulletin_count(), 2);
    }

    #[test]
    fn test_replacing_a_county_backs_out_the_old_figures() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), None));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            None,
            Some(2),
            "http://source-b.ro.gov.br",
        ));

        assert_eq!(report.county_bulletin_count(), 1);
        assert_eq!(report.auto_calculated_total().confirmed_cases, Some(10));
        assert_eq!(report.auto_calculated_total().deaths, Some(2));
    }

    #[test]
    fn test_identical_bulletins_are_deduplicated_silently() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(10),
            Some(1),
            "http://source-b.ro.gov.br",
        ));

        assert_eq!(report.auto_calculated_total().confirmed_cases, Some(10));
        assert_eq!(report.auto_calculated_total().deaths, Some(1));
        assert_eq!(report.warnings().count(), 0);

        // The first bulletin survives untouched.
        let stored = report.county_bulletins().next().unwrap();
        assert_eq!(stored.sources, vec!["http://source-a.ro.gov.br".to_string()]);
    }

    #[test]
    fn test_conflicting_sources_warn_and_keep_the_stored_bulletin() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(12),
            Some(1),
            "http://source-b.ro.gov.br",
        ));

        assert_eq!(report.auto_calculated_total().confirmed_cases, Some(10));
        let warning = report.warnings().next().unwrap();
        assert_eq!(warning.kind, WarningKind::SourcesDontMatch);
        let description = warning.description.as_deref().unwrap();
        assert!(description.contains("http://source-a.ro.gov.br"));
        assert!(description.contains("http://source-b.ro.gov.br"));
    }

    #[test]
    fn test_conflicting_sources_keep_the_completest_bulletin() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), None));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(12),
            Some(3),
            "http://source-b.ro.gov.br",
        ));

        assert_eq!(report.auto_calculated_total().confirmed_cases, Some(12));
        assert_eq!(report.auto_calculated_total().deaths, Some(3));
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_conflicting_death_counts_also_warn() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(10),
            Some(2),
            "http://source-b.ro.gov.br",
        ));

        assert_eq!(report.warnings().next().unwrap().kind, WarningKind::SourcesDontMatch);
        assert_eq!(report.auto_calculated_total().deaths, Some(1));
    }

    #[test]
    fn test_conflicting_partial_bulletins_are_still_merged() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), None));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(12),
            None,
            "http://source-b.ro.gov.br",
        ));

        // The warning flags the disagreement but the merge still happens.
        let stored = report.county_bulletins().next().unwrap();
        assert_eq!(stored.confirmed_cases, Some(10));
        assert_eq!(stored.sources.len(), 2);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_complete_bulletin_survives_a_later_partial_one() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(10),
            None,
            "http://source-b.ro.gov.br",
        ));

        let stored = report.county_bulletins().next().unwrap();
        assert_eq!(stored.deaths, Some(1));
        assert_eq!(stored.sources, vec!["http://source-a.ro.gov.br".to_string()]);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_first_conflict_description_is_kept() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(12),
            Some(1),
            "http://source-b.ro.gov.br",
        ));
        report.add_new_bulletin(county_from("Jaru", Some(4), Some(0), "http://source-c.ro.gov.br"));
        report.add_new_bulletin(county_from("Jaru", Some(5), Some(0), "http://source-d.ro.gov.br"));

        assert_eq!(report.warnings().count(), 1);
        let description = report.warnings().next().unwrap().description.as_deref().unwrap();
        assert!(description.contains("http://source-b.ro.gov.br"));
        assert!(!description.contains("http://source-d.ro.gov.br"));
    }

    #[test]
    fn test_partial_bulletins_without_conflicts_are_merged() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), None));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            None,
            Some(2),
            "http://source-b.ro.gov.br",
        ));

        let stored = report.county_bulletins().next().unwrap();
        assert_eq!(stored.confirmed_cases, Some(10));
        assert_eq!(stored.deaths, Some(2));
        assert_eq!(stored.sources.len(), 2);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_complete_bulletin_beats_agreeing_partial_one() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), None));
        report.add_new_bulletin(county_from(
            "Porto Velho",
            Some(10),
            Some(1),
            "http://source-b.ro.gov.br",
        ));

        // Chosen, not merged: only the winner's sources survive.
        let stored = report.county_bulletins().next().unwrap();
        assert_eq!(stored.deaths, Some(1));
        assert_eq!(stored.sources, vec!["http://source-b.ro.gov.br".to_string()]);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_imported_undefined_replaces_without_backing_out() {
        let mut report = create_county_report();
        report.add_new_bulletin(undefined(Some(2), Some(0)));
        report.add_new_bulletin(undefined(Some(2), Some(0)));

        assert_eq!(report.undefined_or_imported_bulletin().confirmed_cases, Some(2));
        assert_eq!(report.auto_calculated_total().confirmed_cases, Some(4));
    }

    #[test]
    fn test_empty_official_totals_are_dropped() {
        let mut report = create_county_report();
        report.add_new_bulletin(official_total(None, None));

        assert!(report.official_total_bulletins().is_empty());
        assert_eq!(report.total_bulletin().sources_label(), AUTO_CALCULATED_SOURCE);
    }

    #[test]
    fn test_first_official_total_is_the_reports_total() {
        let mut report = create_county_report();
        report.add_new_bulletin(official_total(Some(12), Some(1)));
        report.add_new_bulletin(official_total(Some(13), Some(1)));

        assert_eq!(report.total_bulletin().confirmed_cases, Some(12));
    }

    #[test]
    fn test_checks_fail_without_official_totals() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));

        assert!(!report.check_total_confirmed_cases());
        assert!(!report.check_total_death_cases());
    }

    #[test]
    fn test_checks_pass_when_every_source_agrees() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(undefined(Some(2), Some(0)));
        report.add_new_bulletin(official_total(Some(12), Some(1)));

        assert!(report.check_total_confirmed_cases());
        assert!(report.check_total_death_cases());
    }

    #[test]
    fn test_checks_fail_when_any_official_disagrees() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(12), Some(1)));
        report.add_new_bulletin(official_total(Some(12), Some(1)));
        report.add_new_bulletin(official_total(Some(13), Some(1)));

        assert!(!report.check_total_confirmed_cases());
        assert!(report.check_total_death_cases());
    }

    #[test]
    fn test_missing_counts_agree_when_missing_everywhere() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), None));
        report.add_new_bulletin(official_total(Some(10), None));

        assert!(report.check_total_confirmed_cases());
        assert!(report.check_total_death_cases());
    }

    #[test]
    fn test_warnings_slug_is_empty_for_a_clean_report() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(undefined(Some(2), Some(0)));
        report.add_new_bulletin(official_total(Some(12), Some(1)));

        assert_eq!(report.warnings_slug(), "");
    }

    #[test]
    fn test_warnings_slug_lists_detected_problems_sorted() {
        let mut report = create_county_report();

        assert_eq!(
            report.warnings_slug(),
            "__MISSING_CONFIRMED_CASES__MISSING_COUNTY_BULLETINS__MISSING_DEATHS\
             __MISSING_IMPORTED_UNDEFINED_CASES__NO_OFFICIAL_TOTAL"
        );
    }

    #[test]
    fn test_warnings_slug_is_idempotent() {
        let mut report = create_county_report();
        let first = report.warnings_slug();
        let second = report.warnings_slug();

        assert_eq!(first, second);
        assert_eq!(report.warnings().count(), 5);
    }

    #[test]
    fn test_total_mismatch_warning_carries_the_figures() {
        let mut report = create_test_report(vec![ReportQuality::CountyBulletins]);
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));
        report.add_new_bulletin(official_total(Some(12), Some(2)));

        assert_eq!(report.warnings_slug(), "__TOTAL_DONT_MATCH");
        let warning = report.warnings().next().unwrap();
        let description = warning.description.as_deref().unwrap();
        assert!(description.contains("auto-sum: confirmed=10, deaths=1"));
        assert!(description.contains("http://saude.ro.gov.br: confirmed=12, deaths=2"));
    }

    #[test]
    fn test_only_total_states_always_warn_but_skip_the_cross_check() {
        let mut report = create_test_report(vec![ReportQuality::OnlyTotal]);
        report.add_new_bulletin(official_total(Some(12), Some(1)));

        // The auto total is empty here, so no mismatch warning fires.
        assert_eq!(report.warnings_slug(), "__ONLY_TOTAL");
    }

    #[test]
    fn test_to_rows_sorts_counties_and_appends_fixed_rows() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Vilhena", Some(5), Some(0)));
        report.add_new_bulletin(county("Ariquemes", Some(3), Some(1)));
        report.add_new_bulletin(county("Jaru", None, None));
        report.add_new_bulletin(undefined(Some(2), Some(0)));
        report.add_new_bulletin(official_total(Some(10), Some(1)));

        let rows = report.to_rows();
        let cities: Vec<&str> = rows.iter().map(|row| row.city.as_str()).collect();
        assert_eq!(
            cities,
            vec!["Ariquemes", "Vilhena", "Imported/Undefined", "State total"]
        );
        assert_eq!(rows.last().unwrap().confirmed, Some(10));
    }

    #[test]
    fn test_to_rows_keeps_the_empty_undefined_placeholder() {
        let mut report = create_county_report();
        report.add_new_bulletin(county("Porto Velho", Some(10), Some(1)));

        let rows = report.to_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].city, "Imported/Undefined");
        assert_eq!(rows[1].confirmed, None);
        assert_eq!(rows[1].deaths, None);
    }

    #[test]
    fn test_display_uses_day_first_dates() {
        let report = create_county_report();
        let rendered = report.to_string();

        assert!(rendered.contains("state=RO"));
        assert!(rendered.contains("01/05/2021"));
    }
}
