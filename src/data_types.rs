/*!
 * Data type definitions for doctor directory records
 *
 * The catalog endpoint returns loosely structured JSON. Every field here is
 * optional or defaulted, and fields with an unexpected JSON shape degrade to
 * "absent" instead of failing the whole catalog.
 */

use std::collections::BTreeSet;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque doctor identifier, unique within one catalog snapshot
///
/// The endpoint sends either a JSON string or a number; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DoctorId(pub String);

impl DoctorId {
    /// Get the identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DoctorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for DoctorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(DoctorId(s)),
            Value::Number(n) => Ok(DoctorId(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "doctor id must be a string or number, found {}",
                other
            ))),
        }
    }
}

/// One specialization entry of a doctor
///
/// Entries are usually `{"name": ...}` objects. Anything else is kept as
/// received so cards can still show it.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Specialty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl Specialty {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: serde_json::json!({ "name": name }),
            name: Some(name),
        }
    }

    /// The name, or the raw entry rendered as text when it has no usable name
    pub fn display(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => display_value(&self.raw),
        }
    }
}

impl<'de> Deserialize<'de> for Specialty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let name = match &raw {
            Value::Object(fields) => fields
                .get("name")
                .filter(|v| !v.is_null())
                .map(display_value),
            _ => None,
        };
        Ok(Specialty { name, raw })
    }
}

/// Postal address of a clinic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClinicAddress {
    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
}

/// Clinic where a doctor practices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Clinic {
    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub address: Option<ClinicAddress>,
}

/// A doctor as received from the catalog endpoint
///
/// Records are never mutated after the catalog is loaded. All accessors are
/// total: absent or malformed data yields an empty string, `0`, or `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DoctorRecord {
    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub id: Option<DoctorId>,

    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::sequence")]
    pub specialities: Vec<Specialty>,

    // Consultation modes; only a JSON `true` sets a flag
    #[serde(default, deserialize_with = "lenient::flag")]
    pub video_consult: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub in_clinic: bool,

    /// Free text such as "13 Years of experience"
    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    /// Free text such as "₹ 500"
    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub fees: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub clinic: Option<Clinic>,

    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    #[serde(default, deserialize_with = "lenient::display_string", skip_serializing_if = "Option::is_none")]
    pub doctor_introduction: Option<String>,
}

impl DoctorRecord {
    /// Name shown on cards, falling back to "Unknown Doctor"
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => crate::constants::UNKNOWN_DOCTOR_NAME.to_string(),
        }
    }

    /// Case-insensitive substring match on the name; nameless records never match
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.name
            .as_deref()
            .map(|name| name.to_lowercase().contains(needle_lower))
            .unwrap_or(false)
    }

    /// Non-empty specialty names in record order
    pub fn specialty_names(&self) -> impl Iterator<Item = &str> {
        self.specialities
            .iter()
            .filter_map(|s| s.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Check whether the doctor has the given specialty (exact name)
    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialty_names().any(|name| name == specialty)
    }

    /// Comma-joined specialties for cards; unnamed entries show their raw value
    pub fn specialty_display(&self) -> String {
        self.specialities
            .iter()
            .map(Specialty::display)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// First comma-separated segment of the introduction
    pub fn qualifications(&self) -> String {
        self.doctor_introduction
            .as_deref()
            .and_then(|intro| intro.split(',').next())
            .unwrap_or("")
            .to_string()
    }

    /// Years of experience extracted from the free-text field
    pub fn experience_years(&self) -> u64 {
        extract_leading_number(self.experience.as_deref().unwrap_or(""))
    }

    /// Consultation fee extracted from the free-text field
    pub fn fee_amount(&self) -> u64 {
        extract_leading_number(self.fees.as_deref().unwrap_or(""))
    }

    /// Clinic name or empty string
    pub fn clinic_name(&self) -> String {
        self.clinic
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// "locality, city" when both are present, else the first address line
    pub fn location_display(&self) -> String {
        let Some(address) = self.clinic.as_ref().and_then(|c| c.address.as_ref()) else {
            return String::new();
        };

        fn present(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|s| !s.is_empty())
        }

        if let (Some(locality), Some(city)) = (present(&address.locality), present(&address.city)) {
            return format!("{}, {}", locality, city);
        }

        present(&address.address_line1).unwrap_or("").to_string()
    }

    /// Photo reference, or the given placeholder when absent
    pub fn photo_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.photo.as_deref() {
            Some(photo) if !photo.is_empty() => photo,
            _ => placeholder,
        }
    }

    pub fn supports(&self, consultation: ConsultationType) -> bool {
        match consultation {
            ConsultationType::None => true,
            ConsultationType::VideoConsult => self.video_consult,
            ConsultationType::InClinic => self.in_clinic,
        }
    }
}

/// Render an arbitrary JSON value as a display-safe string
///
/// `null` becomes "", strings and numbers render as themselves, arrays are
/// joined with ", ", and objects fall back to compact JSON text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Extract the first run of ASCII digits from free text
///
/// Returns 0 when the text contains no digits. Runs too long for `u64`
/// saturate at `u64::MAX`.
pub fn extract_leading_number(text: &str) -> u64 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// Consultation mode filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConsultationType {
    #[default]
    None,
    VideoConsult,
    InClinic,
}

impl ConsultationType {
    /// Parse a `consultationType` query value; unknown values fold to `None`
    pub fn from_query(value: &str) -> Self {
        match value {
            "Video Consult" => ConsultationType::VideoConsult,
            "In Clinic" => ConsultationType::InClinic,
            _ => ConsultationType::None,
        }
    }

    /// Query literal, or `None` for the default
    pub fn to_query(&self) -> Option<&'static str> {
        match self {
            ConsultationType::None => None,
            ConsultationType::VideoConsult => Some("Video Consult"),
            ConsultationType::InClinic => Some("In Clinic"),
        }
    }

    /// Label shown in the filter panel
    pub fn label(&self) -> &'static str {
        match self {
            ConsultationType::None => "All",
            ConsultationType::VideoConsult => "Video Consultation",
            ConsultationType::InClinic => "In-clinic Consultation",
        }
    }
}

impl std::fmt::Display for ConsultationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortBy {
    #[default]
    None,
    Fees,
    Experience,
}

impl SortBy {
    /// Parse a `sortBy` query value; unknown values fold to `None`
    pub fn from_query(value: &str) -> Self {
        match value {
            "fees" => SortBy::Fees,
            "experience" => SortBy::Experience,
            _ => SortBy::None,
        }
    }

    pub fn to_query(&self) -> Option<&'static str> {
        match self {
            SortBy::None => None,
            SortBy::Fees => Some("fees"),
            SortBy::Experience => Some("experience"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortBy::None => "Relevance",
            SortBy::Fees => "Price: Low-High",
            SortBy::Experience => "Experience: Most Experience first",
        }
    }
}

impl std::fmt::Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// User-chosen search, filter, and sort parameters
///
/// One instance is owned by the session controller. Selected specialties
/// are a set; the ordered set keeps URL encoding deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterState {
    pub search_term: String,
    pub consultation_type: ConsultationType,
    pub selected_specialties: BTreeSet<String>,
    pub sort_by: SortBy,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_consultation(mut self, consultation: ConsultationType) -> Self {
        self.consultation_type = consultation;
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.selected_specialties.insert(specialty.into());
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Check if every field holds its default value
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

/// Deserializers that degrade malformed values instead of failing
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => None,
            Some(value) => Some(super::display_value(&value)),
        })
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(matches!(Option::<Value>::deserialize(deserializer)?, Some(Value::Bool(true))))
    }

    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Value>::deserialize(deserializer)?
            .and_then(|value| serde_json::from_value(value).ok()))
    }

    pub fn sequence<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_leading_number() {
        assert_eq!(extract_leading_number("Rs. 500"), 500);
        assert_eq!(extract_leading_number("13 Years of experience"), 13);
        assert_eq!(extract_leading_number("₹ 1,200"), 1);
        assert_eq!(extract_leading_number("no digits here"), 0);
        assert_eq!(extract_leading_number(""), 0);
        assert_eq!(extract_leading_number("99999999999999999999999 years"), u64::MAX);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::Null), "");
        assert_eq!(display_value(&json!("Dr. Rao")), "Dr. Rao");
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(["a", 1, null])), "a, 1, ");
        assert_eq!(display_value(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_record_from_full_json() {
        let record: DoctorRecord = serde_json::from_value(json!({
            "id": "111",
            "name": "Dr. Anita Rao",
            "specialities": [{"name": "Dentist"}, {"name": "Orthodontist"}],
            "video_consult": true,
            "in_clinic": false,
            "experience": "13 Years of experience",
            "fees": "₹ 500",
            "clinic": {
                "name": "Smile Care",
                "address": {"locality": "Indiranagar", "city": "Bangalore", "address_line1": "12 MG Road"}
            },
            "photo": "https://example.com/rao.png",
            "doctor_introduction": "BDS, MDS - Orthodontics, 13 years"
        }))
        .unwrap();

        assert_eq!(record.id, Some(DoctorId("111".to_string())));
        assert_eq!(record.specialty_display(), "Dentist, Orthodontist");
        assert!(record.video_consult);
        assert!(!record.in_clinic);
        assert_eq!(record.experience_years(), 13);
        assert_eq!(record.fee_amount(), 500);
        assert_eq!(record.location_display(), "Indiranagar, Bangalore");
        assert_eq!(record.qualifications(), "BDS");
        assert_eq!(record.clinic_name(), "Smile Care");
    }

    #[test]
    fn test_record_tolerates_missing_and_malformed_fields() {
        let record: DoctorRecord = serde_json::from_value(json!({
            "id": 7,
            "specialities": "Dentist",
            "video_consult": "yes",
            "fees": 300,
            "clinic": "not an object",
            "photo": null
        }))
        .unwrap();

        assert_eq!(record.id, Some(DoctorId("7".to_string())));
        assert_eq!(record.name, None);
        assert_eq!(record.display_name(), "Unknown Doctor");
        assert!(record.specialities.is_empty());
        assert!(!record.video_consult);
        assert_eq!(record.fee_amount(), 300);
        assert_eq!(record.experience_years(), 0);
        assert_eq!(record.clinic, None);
        assert_eq!(record.location_display(), "");
        assert_eq!(record.photo_or("/placeholder.png"), "/placeholder.png");
        assert!(!record.name_contains("a"));
    }

    #[test]
    fn test_unnamed_specialty_entries_still_display() {
        let record: DoctorRecord = serde_json::from_value(json!({
            "specialities": [{"name": "Dentist"}, "Homeopath", {"code": 12}, {"name": ""}, null]
        }))
        .unwrap();

        assert_eq!(record.specialty_names().collect::<Vec<_>>(), ["Dentist"]);
        assert!(!record.has_specialty("Homeopath"));
        assert_eq!(
            record.specialty_display(),
            r#"Dentist, Homeopath, {"code":12}, {"name":""}"#
        );
    }

    #[test]
    fn test_location_falls_back_to_address_line() {
        let record: DoctorRecord = serde_json::from_value(json!({
            "clinic": {"address": {"locality": "Andheri", "address_line1": "4 Link Road"}}
        }))
        .unwrap();
        assert_eq!(record.location_display(), "4 Link Road");

        let blank_locality: DoctorRecord = serde_json::from_value(json!({
            "clinic": {"address": {"locality": "", "city": "Pune", "address_line1": "7 FC Road"}}
        }))
        .unwrap();
        assert_eq!(blank_locality.location_display(), "7 FC Road");

        let both: DoctorRecord = serde_json::from_value(json!({
            "clinic": {"address": {"locality": "Kothrud", "city": "Pune"}}
        }))
        .unwrap();
        assert_eq!(both.location_display(), "Kothrud, Pune");
    }

    #[test]
    fn test_query_literals() {
        assert_eq!(ConsultationType::from_query("Video Consult"), ConsultationType::VideoConsult);
        assert_eq!(ConsultationType::from_query("In Clinic"), ConsultationType::InClinic);
        assert_eq!(ConsultationType::from_query("video consult"), ConsultationType::None);
        assert_eq!(ConsultationType::None.to_query(), None);
        assert_eq!(SortBy::from_query("fees"), SortBy::Fees);
        assert_eq!(SortBy::from_query("experience"), SortBy::Experience);
        assert_eq!(SortBy::from_query("rating"), SortBy::None);
        assert_eq!(SortBy::Experience.to_query(), Some("experience"));
    }
}
