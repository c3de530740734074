/*!
 * Session controller for the doctor directory
 *
 * `DirectorySession` owns the single `FilterState`, the page URL, the
 * catalog load state, and the search box. Every committed change runs the
 * same step: write the state into the URL (replacing the current history
 * entry) and recompute the visible results. The URL therefore always
 * reflects the last committed state.
 */

use url::Url;

use crate::autocomplete::SearchBox;
use crate::catalog::{Catalog, LoadState};
use crate::data_types::{ConsultationType, DoctorRecord, FilterState, SortBy};
use crate::{engine, query_string, Result};

/// What the UI should show right now
#[derive(Debug)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Ready(ReadyView<'a>),
}

/// Everything needed to render a loaded directory
#[derive(Debug)]
pub struct ReadyView<'a> {
    pub results: Vec<&'a DoctorRecord>,
    pub specialties: &'a [String],
    pub suggestions: Vec<&'a DoctorRecord>,
    pub state: &'a FilterState,
    pub search_input: &'a str,
    pub url: &'a Url,
}

/// Controller owning filter state, URL, and catalog for one session
#[derive(Debug)]
pub struct DirectorySession {
    load_state: LoadState,
    state: FilterState,
    url: Url,
    search_box: SearchBox,
    visible: Vec<usize>,
}

impl DirectorySession {
    /// Start a session at `url`, seeding the filter state from its query
    pub fn new(url: Url) -> Self {
        Self::with_suggestion_limit(url, crate::constants::SUGGESTION_LIMIT)
    }

    pub fn with_suggestion_limit(url: Url, limit: usize) -> Self {
        let state = query_string::decode_url(&url);
        tracing::debug!(?state, "filter state decoded from url");
        let search_box = SearchBox::with_limit(limit).with_input(state.search_term.clone());
        let mut session = Self {
            load_state: LoadState::Loading,
            state,
            url,
            search_box,
            visible: Vec::new(),
        };
        session.commit();
        session
    }

    /// Resolve the single catalog load
    pub fn catalog_loaded(&mut self, outcome: Result<Catalog>) {
        let current = std::mem::take(&mut self.load_state);
        self.load_state = current.resolve(outcome);
        self.recompute();
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.load_state.catalog()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Current page URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.search_box.sync_committed(&self.state.search_term);
        self.commit();
    }

    pub fn set_consultation_type(&mut self, consultation: ConsultationType) {
        self.state.consultation_type = consultation;
        self.commit();
    }

    /// Check or uncheck a specialty in the filter panel
    pub fn toggle_specialty(&mut self, specialty: &str, checked: bool) {
        if checked {
            self.state.selected_specialties.insert(specialty.to_string());
        } else {
            self.state.selected_specialties.remove(specialty);
        }
        self.commit();
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.state.sort_by = sort_by;
        self.commit();
    }

    /// Replace the whole filter state at once
    pub fn apply_state(&mut self, state: FilterState) {
        self.state = state;
        self.search_box.sync_committed(&self.state.search_term);
        self.commit();
    }

    pub fn reset_filters(&mut self) {
        self.apply_state(FilterState::default());
    }

    /// The user typed into the search box; only suggestions change
    pub fn type_input(&mut self, value: impl Into<String>) {
        let catalog = self.load_state.catalog().map(Catalog::records).unwrap_or(&[]);
        self.search_box.input_changed(catalog, value);
    }

    pub fn focus_input(&mut self) {
        let catalog = self.load_state.catalog().map(Catalog::records).unwrap_or(&[]);
        self.search_box.focus(catalog);
    }

    pub fn click_outside(&mut self) {
        self.search_box.click_outside();
    }

    /// Commit the raw search box text as the search term
    pub fn submit_search(&mut self) {
        let term = self.search_box.submit();
        self.set_search_term(term);
    }

    /// Commit the chosen suggestion's name; returns false if none was shown
    pub fn choose_suggestion(&mut self, position: usize) -> bool {
        let catalog = self.load_state.catalog().map(Catalog::records).unwrap_or(&[]);
        match self.search_box.select(catalog, position) {
            Some(name) => {
                self.set_search_term(name);
                true
            }
            None => false,
        }
    }

    /// Back/forward navigation: adopt the state carried by `url`
    pub fn navigate(&mut self, url: Url) {
        self.state = query_string::decode_url(&url);
        self.search_box.sync_committed(&self.state.search_term);
        self.url = url;
        self.recompute();
    }

    /// Visible results for the committed state
    pub fn results(&self) -> Vec<&DoctorRecord> {
        match self.load_state.catalog() {
            Some(catalog) => self
                .visible
                .iter()
                .filter_map(|&idx| catalog.records().get(idx))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn view(&self) -> View<'_> {
        match &self.load_state {
            LoadState::Loading => View::Loading,
            LoadState::Failed(message) => View::Error(message),
            LoadState::Ready(catalog) => View::Ready(ReadyView {
                results: self.results(),
                specialties: catalog.specialties(),
                suggestions: self.search_box.visible_suggestions(catalog.records()),
                state: &self.state,
                search_input: self.search_box.input(),
                url: &self.url,
            }),
        }
    }

    fn commit(&mut self) {
        query_string::replace_query(&mut self.url, &self.state);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = match self.load_state.catalog() {
            Some(catalog) => engine::apply_indices(catalog.records(), &self.state),
            None => Vec::new(),
        };
        tracing::debug!(visible = self.visible.len(), "results recomputed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Specialty;
    use crate::DirectoryError;

    fn doctor(name: &str, video: bool, exp: &str) -> DoctorRecord {
        DoctorRecord {
            name: Some(name.to_string()),
            video_consult: video,
            in_clinic: !video,
            experience: Some(exp.to_string()),
            specialities: vec![Specialty::named("Dentist")],
            ..Default::default()
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                doctor("Dr. Anita Rao", true, "5 Years"),
                doctor("Dr. Sandeep", false, "20 Years"),
                doctor("Dr. Anil Kumar", true, "1 Years"),
                doctor("Dr. Meera", false, "9 Years"),
                doctor("Dr. Kavya", false, "3 Years"),
            ],
            "test",
        )
    }

    fn session(query: &str) -> DirectorySession {
        let url = Url::parse(&format!("http://localhost:3000/{}", query)).unwrap();
        DirectorySession::new(url)
    }

    #[test]
    fn test_initial_state_from_url() {
        let session = session("?search=rao&sortBy=experience&consultationType=bogus");
        assert_eq!(session.state().search_term, "rao");
        assert_eq!(session.state().sort_by, SortBy::Experience);
        assert_eq!(session.state().consultation_type, ConsultationType::None);
        // The unrecognized value is dropped from the URL on the first commit
        assert_eq!(session.url().query(), Some("search=rao&sortBy=experience"));
        assert!(matches!(session.view(), View::Loading));
    }

    #[test]
    fn test_video_consult_scenario() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.set_consultation_type(ConsultationType::VideoConsult);

        assert_eq!(session.results().len(), 2);
        assert!(session.url().as_str().contains("consultationType=Video+Consult"));
    }

    #[test]
    fn test_experience_sort_scenario() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.set_search_term("an");
        session.set_sort_by(SortBy::Experience);

        let years: Vec<u64> = session.results().iter().map(|r| r.experience_years()).collect();
        assert_eq!(years, [20, 5, 1]);
        assert_eq!(session.url().query(), Some("search=an&sortBy=experience"));
    }

    #[test]
    fn test_state_committed_before_load_applies_after() {
        let mut session = session("");
        session.toggle_specialty("Dentist", true);
        session.set_consultation_type(ConsultationType::InClinic);
        assert!(session.results().is_empty());

        session.catalog_loaded(Ok(catalog()));
        assert_eq!(session.results().len(), 3);
    }

    #[test]
    fn test_toggle_specialty_off_clears_param() {
        let mut session = session("?specialties=Dentist,Cardiologist");
        session.toggle_specialty("Cardiologist", false);
        assert_eq!(session.url().query(), Some("specialties=Dentist"));
        session.toggle_specialty("Dentist", false);
        assert_eq!(session.url().query(), None);
    }

    #[test]
    fn test_failed_load_is_terminal() {
        let mut session = session("");
        session.catalog_loaded(Err(DirectoryError::http_status("http://x", 500)));
        assert!(matches!(session.view(), View::Error(_)));

        session.catalog_loaded(Ok(catalog()));
        assert!(matches!(session.view(), View::Error(_)));
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_typing_does_not_commit() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.type_input("ani");

        assert_eq!(session.state().search_term, "");
        assert_eq!(session.url().query(), None);
        match session.view() {
            View::Ready(view) => {
                assert_eq!(view.suggestions.len(), 2);
                assert_eq!(view.results.len(), 5);
                assert_eq!(view.search_input, "ani");
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_choose_suggestion_commits_name() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.type_input("kumar");
        assert!(session.choose_suggestion(0));

        assert_eq!(session.state().search_term, "Dr. Anil Kumar");
        assert_eq!(session.url().query(), Some("search=Dr.+Anil+Kumar"));
        assert_eq!(session.results().len(), 1);
        assert!(!session.choose_suggestion(0));
    }

    #[test]
    fn test_submit_search_commits_raw_text() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.type_input("dr. a");
        session.submit_search();
        assert_eq!(session.state().search_term, "dr. a");
        assert_eq!(session.results().len(), 2);
    }

    #[test]
    fn test_navigate_restores_state() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.set_sort_by(SortBy::Fees);
        let earlier = Url::parse("http://localhost:3000/?consultationType=In+Clinic").unwrap();

        session.navigate(earlier.clone());
        assert_eq!(session.url(), &earlier);
        assert_eq!(session.state().sort_by, SortBy::None);
        assert_eq!(session.results().len(), 3);
    }

    #[test]
    fn test_suggestions_never_exceed_three() {
        let records = ["Ana", "Anand", "Anaya", "Ananya", "Dhanashree"]
            .iter()
            .map(|name| doctor(name, true, "1 Years"))
            .collect();
        let url = Url::parse("http://localhost:3000/").unwrap();
        let mut session = DirectorySession::with_suggestion_limit(url, 5);
        session.catalog_loaded(Ok(Catalog::new(records, "test")));
        session.type_input("an");

        match session.view() {
            View::Ready(view) => assert_eq!(view.suggestions.len(), 3),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_results_follow_sorted_catalog_positions() {
        let mut session = session("");
        session.catalog_loaded(Ok(catalog()));
        session.set_sort_by(SortBy::Experience);

        let catalog = session.catalog().unwrap();
        let expected = engine::apply(catalog.records(), session.state());
        let results = session.results();
        assert_eq!(results.len(), expected.len());
        assert!(results.iter().zip(&expected).all(|(a, b)| std::ptr::eq(*a, *b)));
        assert_eq!(results[0].display_name(), "Dr. Sandeep");
    }

    #[test]
    fn test_reset_filters() {
        let mut session = session("?search=x&sortBy=fees");
        session.reset_filters();
        assert!(session.state().is_default());
        assert_eq!(session.url().as_str(), "http://localhost:3000/");
    }
}
