/*!
 * Mapping between `FilterState` and the page URL query string
 *
 * Decoding never fails: missing, empty, or unrecognized values fall back to
 * defaults. Encoding only writes keys whose value differs from the default,
 * so `decode(encode(s)) == s` for every state the UI can reach.
 *
 * Selected specialties travel as one comma-joined value. A specialty name
 * that itself contains a comma does not survive the round trip: it decodes
 * as separate names.
 */

use std::collections::BTreeSet;
use url::form_urlencoded;
use url::Url;

use crate::data_types::{ConsultationType, FilterState, SortBy};

pub const SEARCH_KEY: &str = "search";
pub const CONSULTATION_KEY: &str = "consultationType";
pub const SPECIALTIES_KEY: &str = "specialties";
pub const SORT_KEY: &str = "sortBy";

/// Decode a query string (with or without a leading `?`)
///
/// When a key repeats, the first occurrence wins.
pub fn decode(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    let first = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    FilterState {
        search_term: first(SEARCH_KEY).unwrap_or_default().to_string(),
        consultation_type: first(CONSULTATION_KEY)
            .map(ConsultationType::from_query)
            .unwrap_or_default(),
        selected_specialties: first(SPECIALTIES_KEY)
            .map(split_specialties)
            .unwrap_or_default(),
        sort_by: first(SORT_KEY).map(SortBy::from_query).unwrap_or_default(),
    }
}

/// Decode the filter state carried by a URL
pub fn decode_url(url: &Url) -> FilterState {
    decode(url.query().unwrap_or(""))
}

/// Encode a filter state, omitting default values
///
/// Keys are written in a fixed order: search, consultationType,
/// specialties, sortBy. Returns an empty string for the default state.
pub fn encode(state: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if !state.search_term.is_empty() {
        serializer.append_pair(SEARCH_KEY, &state.search_term);
    }
    if let Some(consultation) = state.consultation_type.to_query() {
        serializer.append_pair(CONSULTATION_KEY, consultation);
    }
    if !state.selected_specialties.is_empty() {
        let joined = state
            .selected_specialties
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        serializer.append_pair(SPECIALTIES_KEY, &joined);
    }
    if let Some(sort) = state.sort_by.to_query() {
        serializer.append_pair(SORT_KEY, sort);
    }

    serializer.finish()
}

/// Replace the query of `url` with the encoded state
///
/// The default state clears the query entirely.
pub fn replace_query(url: &mut Url, state: &FilterState) {
    let encoded = encode(state);
    if encoded.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&encoded));
    }
    tracing::debug!(url = %url, "filter state written to url");
}

fn split_specialties(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
