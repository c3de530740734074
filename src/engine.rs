/*!
 * Filtering and sorting of the doctor catalog
 *
 * `apply` maps a catalog and a `FilterState` to the visible result list.
 * Stages run in a fixed order (search, consultation, specialty, sort); each
 * is a pure function over borrowed records, so the catalog is never touched.
 * `apply_indices` runs the same pipeline but yields catalog positions.
 */

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::data_types::{ConsultationType, DoctorRecord, FilterState, SortBy};

/// Compute the visible result list for a filter state
pub fn apply<'a>(catalog: &'a [DoctorRecord], state: &FilterState) -> Vec<&'a DoctorRecord> {
    DoctorQuery::from_state(catalog, state).execute()
}

/// Catalog positions of the visible results, in display order
pub fn apply_indices(catalog: &[DoctorRecord], state: &FilterState) -> Vec<usize> {
    DoctorQuery::from_state(catalog, state).execute_indices()
}

/// Keep records whose name contains `term`, ignoring case
///
/// An empty term keeps everything; otherwise nameless records are dropped.
pub fn filter_by_search<'a>(records: Vec<&'a DoctorRecord>, term: &str) -> Vec<&'a DoctorRecord> {
    let needle = term.to_lowercase();
    records.into_iter().filter(|r| matches_search(r, &needle)).collect()
}

/// Keep records supporting the consultation mode
pub fn filter_by_consultation<'a>(
    records: Vec<&'a DoctorRecord>,
    consultation: ConsultationType,
) -> Vec<&'a DoctorRecord> {
    records.into_iter().filter(|r| r.supports(consultation)).collect()
}

/// Keep records having any of the selected specialties
pub fn filter_by_specialties<'a>(
    records: Vec<&'a DoctorRecord>,
    selected: &BTreeSet<String>,
) -> Vec<&'a DoctorRecord> {
    records
        .into_iter()
        .filter(|r| matches_specialties(r, selected))
        .collect()
}

/// Stable sort: fees ascending, experience descending
pub fn sort_records(mut records: Vec<&DoctorRecord>, sort_by: SortBy) -> Vec<&DoctorRecord> {
    sort_by_order(&mut records, sort_by, |r| *r);
    records
}

fn matches_search(record: &DoctorRecord, needle_lower: &str) -> bool {
    needle_lower.is_empty() || record.name_contains(needle_lower)
}

fn matches_specialties(record: &DoctorRecord, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || record.specialty_names().any(|name| selected.contains(name))
}

fn sort_by_order<T, F>(items: &mut [T], sort_by: SortBy, record: F)
where
    F: Fn(&T) -> &DoctorRecord,
{
    match sort_by {
        SortBy::None => {}
        SortBy::Fees => items.sort_by_key(|item| record(item).fee_amount()),
        SortBy::Experience => items.sort_by_key(|item| Reverse(record(item).experience_years())),
    }
}

/// Query builder over a borrowed catalog
///
/// # Example
/// ```
/// # use docsearch::prelude::*;
/// # let catalog: Vec<DoctorRecord> = Vec::new();
/// let dentists_by_fee = DoctorQuery::new(&catalog)
///     .specialty("Dentist")
///     .consultation(ConsultationType::InClinic)
///     .sort_by(SortBy::Fees)
///     .execute();
/// # assert!(dentists_by_fee.is_empty());
/// ```
pub struct DoctorQuery<'a> {
    catalog: &'a [DoctorRecord],
    search: String,
    consultation: ConsultationType,
    specialties: BTreeSet<String>,
    sort_by: SortBy,
}

impl<'a> DoctorQuery<'a> {
    /// Create a new query that matches every record
    pub fn new(catalog: &'a [DoctorRecord]) -> Self {
        Self {
            catalog,
            search: String::new(),
            consultation: ConsultationType::None,
            specialties: BTreeSet::new(),
            sort_by: SortBy::None,
        }
    }

    /// Create a query mirroring a committed filter state
    pub fn from_state(catalog: &'a [DoctorRecord], state: &FilterState) -> Self {
        Self {
            catalog,
            search: state.search_term.clone(),
            consultation: state.consultation_type,
            specialties: state.selected_specialties.clone(),
            sort_by: state.sort_by,
        }
    }

    /// Filter by name substring
    pub fn search(mut self, term: &str) -> Self {
        self.search = term.to_string();
        self
    }

    /// Filter by consultation mode
    pub fn consultation(mut self, consultation: ConsultationType) -> Self {
        self.consultation = consultation;
        self
    }

    /// Add one specialty to the any-of selection
    pub fn specialty(mut self, specialty: &str) -> Self {
        self.specialties.insert(specialty.to_string());
        self
    }

    /// Add several specialties to the any-of selection
    pub fn specialties<I, S>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.specialties
            .extend(specialties.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Execute the query and return catalog positions in display order
    pub fn execute_indices(&self) -> Vec<usize> {
        let needle = self.search.to_lowercase();
        let mut matches: Vec<(usize, &DoctorRecord)> = self
            .catalog
            .iter()
            .enumerate()
            .filter(|(_, r)| matches_search(r, &needle))
            .filter(|(_, r)| r.supports(self.consultation))
            .filter(|(_, r)| matches_specialties(r, &self.specialties))
            .collect();
        sort_by_order(&mut matches, self.sort_by, |(_, r)| *r);
        matches.into_iter().map(|(idx, _)| idx).collect()
    }

    /// Execute the query and return matching records in display order
    pub fn execute(self) -> Vec<&'a DoctorRecord> {
        let catalog = self.catalog;
        self.execute_indices()
            .into_iter()
            .map(|idx| &catalog[idx])
            .collect()
    }

    /// Execute the query and return count only
    pub fn count(self) -> usize {
        self.execute_indices().len()
    }

    /// Execute the query with a limit
    pub fn limit(self, limit: usize) -> Vec<&'a DoctorRecord> {
        let mut results = self.execute();
        results.truncate(limit);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::Specialty;

    fn doctor(name: Option<&str>, specialties: &[&str], video: bool, clinic: bool, fees: &str, exp: &str) -> DoctorRecord {
        DoctorRecord {
            name: name.map(str::to_string),
            specialities: specialties
                .iter()
                .map(|s| Specialty::named(*s))
                .collect(),
            video_consult: video,
            in_clinic: clinic,
            fees: Some(fees.to_string()),
            experience: Some(exp.to_string()),
            ..Default::default()
        }
    }

    fn names(records: &[&DoctorRecord]) -> Vec<String> {
        records.iter().map(|r| r.display_name()).collect()
    }

    fn catalog() -> Vec<DoctorRecord> {
        vec![
            doctor(Some("Dr. Anita Rao"), &["Dentist"], true, true, "₹ 500", "5 Years"),
            doctor(Some("Dr. Sandeep Gupta"), &["General Physician"], false, true, "₹ 300", "20 Years"),
            doctor(Some("Dr. Anil Kumar"), &["Dentist", "Orthodontist"], true, false, "₹ 300", "1 Years"),
            doctor(None, &["Dentist"], false, true, "₹ 100", "8 Years"),
            doctor(Some("Dr. Meera Shah"), &["Dermatologist"], false, false, "free", "none"),
        ]
    }

    #[test]
    fn test_default_state_returns_catalog_order() {
        let catalog = catalog();
        let results = apply(&catalog, &FilterState::default());
        assert_eq!(results.len(), 5);
        assert!(results.iter().zip(catalog.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_search_is_case_insensitive_and_drops_nameless() {
        let catalog = catalog();
        let results = apply(&catalog, &FilterState::new().with_search("AN"));
        assert_eq!(names(&results), ["Dr. Anita Rao", "Dr. Sandeep Gupta", "Dr. Anil Kumar"]);
    }

    #[test]
    fn test_consultation_filter() {
        let catalog = catalog();
        let video = apply(&catalog, &FilterState::new().with_consultation(ConsultationType::VideoConsult));
        assert_eq!(names(&video), ["Dr. Anita Rao", "Dr. Anil Kumar"]);

        let clinic = apply(&catalog, &FilterState::new().with_consultation(ConsultationType::InClinic));
        assert_eq!(clinic.len(), 3);
    }

    #[test]
    fn test_identity_laws() {
        let catalog = catalog();
        let all: Vec<&DoctorRecord> = catalog.iter().collect();
        assert_eq!(filter_by_specialties(all.clone(), &BTreeSet::new()), all);
        assert_eq!(filter_by_consultation(all.clone(), ConsultationType::None), all);
        assert_eq!(filter_by_search(all.clone(), ""), all);
        assert_eq!(sort_records(all.clone(), SortBy::None), all);
    }

    #[test]
    fn test_specialties_use_any_of_semantics() {
        let catalog = catalog();
        let state = FilterState::new()
            .with_specialty("Orthodontist")
            .with_specialty("General Physician");
        assert_eq!(names(&apply(&catalog, &state)), ["Dr. Sandeep Gupta", "Dr. Anil Kumar"]);
    }

    #[test]
    fn test_fee_sort_is_stable_ascending() {
        let catalog = catalog();
        let results = apply(&catalog, &FilterState::new().with_sort(SortBy::Fees));
        // Sandeep and Anil both charge 300 and keep their catalog order
        assert_eq!(
            names(&results),
            ["Dr. Meera Shah", "Unknown Doctor", "Dr. Sandeep Gupta", "Dr. Anil Kumar", "Dr. Anita Rao"]
        );
    }

    #[test]
    fn test_experience_sort_descending() {
        let catalog = vec![
            doctor(Some("Five"), &[], false, false, "0", "5 Years"),
            doctor(Some("Twenty"), &[], false, false, "0", "20 Years"),
            doctor(Some("One"), &[], false, false, "0", "1 Years"),
        ];
        let results = apply(&catalog, &FilterState::new().with_sort(SortBy::Experience));
        let years: Vec<u64> = results.iter().map(|r| r.experience_years()).collect();
        assert_eq!(years, [20, 5, 1]);
    }

    #[test]
    fn test_stages_compose() {
        let catalog = catalog();
        let state = FilterState::new()
            .with_search("dr.")
            .with_consultation(ConsultationType::InClinic)
            .with_specialty("Dentist")
            .with_sort(SortBy::Experience);
        assert_eq!(names(&apply(&catalog, &state)), ["Dr. Anita Rao"]);
    }

    #[test]
    fn test_indices_match_records() {
        let catalog = catalog();
        let state = FilterState::new()
            .with_specialty("Dentist")
            .with_sort(SortBy::Experience);
        assert_eq!(apply_indices(&catalog, &state), [3, 0, 2]);

        let records = apply(&catalog, &state);
        let positions = apply_indices(&catalog, &state);
        assert!(records.iter().zip(&positions).all(|(r, &idx)| std::ptr::eq(*r, &catalog[idx])));
    }

    #[test]
    fn test_query_builder_limit_and_count() {
        let catalog = catalog();
        assert_eq!(DoctorQuery::new(&catalog).specialty("Dentist").count(), 3);
        let top = DoctorQuery::new(&catalog)
            .specialties(["Dentist", "Dermatologist"])
            .sort_by(SortBy::Fees)
            .limit(2);
        assert_eq!(names(&top), ["Dr. Meera Shah", "Unknown Doctor"]);
    }
}
