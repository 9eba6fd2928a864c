use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::constants::{ReportQuality, State};

/// Which states have a working scraper, and what each one is expected to
/// deliver. Consolidation refuses bulletins for states missing from this
/// catalog.
static QUALITY_CATALOG: Lazy<BTreeMap<State, Vec<ReportQuality>>> = Lazy::new(|| {
    BTreeMap::from([
        (State::Ac, vec![ReportQuality::CountyBulletins]),
        (State::Ba, vec![ReportQuality::OnlyTotal]),
        (State::Ma, vec![ReportQuality::CountyBulletins]),
        (
            State::Pr,
            vec![
                ReportQuality::CountyBulletins,
                ReportQuality::UndefinedOrImportedCases,
            ],
        ),
        (State::Ro, vec![ReportQuality::CountyBulletins]),
        (
            State::Sp,
            vec![
                ReportQuality::CountyBulletins,
                ReportQuality::UndefinedOrImportedCases,
            ],
        ),
    ])
});

/// Qualities registered for a state, or `None` when no scraper covers it.
pub fn expected_qualities(state: State) -> Option<&'static [ReportQuality]> {
    QUALITY_CATALOG.get(&state).map(|qualities| qualities.as_slice())
}

/// All covered states with their qualities, in state code order.
pub fn supported_states() -> impl Iterator<Item = (State, &'static [ReportQuality])> {
    QUALITY_CATALOG
        .iter()
        .map(|(state, qualities)| (*state, qualities.as_slice()))
}
