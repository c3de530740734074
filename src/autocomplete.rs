/*!
 * Name autocomplete for the search box
 *
 * Suggestions are recomputed in full on every keystroke and on focus. They
 * are independent of the committed filter state and never reach the URL.
 */

use crate::constants::SUGGESTION_LIMIT;
use crate::data_types::DoctorRecord;

/// Suggest up to `SUGGESTION_LIMIT` doctors whose name contains the input
pub fn suggest<'a>(catalog: &'a [DoctorRecord], raw_input: &str) -> Vec<&'a DoctorRecord> {
    suggest_with_limit(catalog, raw_input, SUGGESTION_LIMIT)
}

/// Suggest up to `limit` doctors whose name contains the input
///
/// `limit` is clamped to `1..=SUGGESTION_LIMIT`. Blank input yields no suggestions. Matching is a case-insensitive
/// substring test on the untrimmed input, in catalog order.
pub fn suggest_with_limit<'a>(catalog: &'a [DoctorRecord], raw_input: &str, limit: usize) -> Vec<&'a DoctorRecord> {
    matching_indices(catalog, raw_input, limit)
        .into_iter()
        .map(|idx| &catalog[idx])
        .collect()
}

fn matching_indices(catalog: &[DoctorRecord], raw_input: &str, limit: usize) -> Vec<usize> {
    if raw_input.trim().is_empty() {
        return Vec::new();
    }
    let limit = clamp_limit(limit);
    let needle = raw_input.to_lowercase();
    catalog
        .iter()
        .enumerate()
        .filter(|(_, r)| r.name_contains(&needle))
        .map(|(idx, _)| idx)
        .take(limit)
        .collect()
}

/// Keep a requested suggestion count within `1..=SUGGESTION_LIMIT`
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, SUGGESTION_LIMIT)
}

/// State of the search input and its suggestion dropdown
///
/// Suggestions are held as catalog positions so the box does not borrow the
/// catalog between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBox {
    input: String,
    suggestions: Vec<usize>,
    focused: bool,
    limit: usize,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::with_limit(SUGGESTION_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            input: String::new(),
            suggestions: Vec::new(),
            focused: false,
            limit: clamp_limit(limit),
        }
    }

    /// Start with the committed search term shown in the input
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    /// Current raw input text
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Suggestions currently shown; empty while the dropdown is hidden
    pub fn visible_suggestions<'a>(&self, catalog: &'a [DoctorRecord]) -> Vec<&'a DoctorRecord> {
        if !self.focused {
            return Vec::new();
        }
        self.suggestions.iter().filter_map(|&idx| catalog.get(idx)).collect()
    }

    /// The user typed; recompute suggestions from the new text
    pub fn input_changed(&mut self, catalog: &[DoctorRecord], value: impl Into<String>) {
        self.input = value.into();
        self.focused = true;
        self.suggestions = matching_indices(catalog, &self.input, self.limit);
    }

    /// The input gained focus; re-show suggestions for non-blank text
    pub fn focus(&mut self, catalog: &[DoctorRecord]) {
        self.focused = true;
        if !self.input.trim().is_empty() {
            self.suggestions = matching_indices(catalog, &self.input, self.limit);
        }
    }

    /// A click landed outside the input and the dropdown
    pub fn click_outside(&mut self) {
        self.focused = false;
    }

    /// The user submitted the form; returns the term to commit
    pub fn submit(&mut self) -> String {
        self.suggestions.clear();
        self.focused = false;
        self.input.clone()
    }

    /// The user picked the `position`-th visible suggestion
    ///
    /// Returns the doctor's exact name as the term to commit, or `None` when
    /// no suggestion is shown at that position.
    pub fn select(&mut self, catalog: &[DoctorRecord], position: usize) -> Option<String> {
        if !self.focused {
            return None;
        }
        let idx = *self.suggestions.get(position)?;
        let name = catalog.get(idx)?.name.clone()?;
        self.input = name.clone();
        self.suggestions.clear();
        self.focused = false;
        Some(name)
    }

    /// Mirror a search term committed elsewhere (e.g. URL navigation)
    pub fn sync_committed(&mut self, term: &str) {
        self.input = term.to_string();
    }
}
