/*!
 * Catalog loading for the doctor directory
 *
 * The catalog is fetched exactly once per session from a fixed endpoint.
 * There is no retry and, unless configured, no timeout: a hung request
 * leaves the session in `LoadState::Loading`.
 */

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;
use chrono::{DateTime, Utc};
use serde_json::Value;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::{Result, DirectoryError};
use crate::config::DirectoryConfig;
use crate::data_types::DoctorRecord;

/// Immutable set of doctor records fetched for one session
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<DoctorRecord>,
    specialties: Vec<String>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog from already-decoded records
    pub fn new(records: Vec<DoctorRecord>, source: impl Into<String>) -> Self {
        let specialties = distinct_specialties(&records);
        Self {
            records,
            specialties,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    /// Decode a catalog document
    ///
    /// The document is either an array of doctor objects or a single doctor
    /// object, which becomes a one-element catalog.
    pub fn from_value(value: Value, source: impl Into<String>) -> Result<Self> {
        let records = match value {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<std::result::Result<Vec<DoctorRecord>, _>>()?,
            Value::Object(_) => vec![serde_json::from_value(value)?],
            other => {
                return Err(DirectoryError::Parse {
                    message: format!("expected a doctor object or an array of doctors, found {}", json_kind(&other)),
                    path: None,
                    line: None,
                })
            }
        };
        Ok(Self::new(records, source))
    }

    /// Decode a catalog from JSON text
    pub fn from_json_str(text: &str, source: impl Into<String>) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value, source)
    }

    /// Load a catalog from a local JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DirectoryError::file_not_found_with_suggestion(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path).map_err(|e| DirectoryError::Io {
            message: format!("Failed to read {}: {}", path.display(), e),
            source: e,
            path: Some(path.to_path_buf()),
        })?;

        Self::from_json_str(&text, path.display().to_string()).map_err(|err| match err {
            DirectoryError::Parse { message, line, .. } => DirectoryError::Parse {
                message,
                path: Some(path.to_path_buf()),
                line,
            },
            other => other,
        })
    }

    /// All records in catalog order
    pub fn records(&self) -> &[DoctorRecord] {
        &self.records
    }

    /// Distinct non-empty specialty names in order of first appearance
    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    /// Where the catalog came from (endpoint URL or file path)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get catalog statistics
    pub fn statistics(&self) -> CatalogStatistics {
        CatalogStatistics::from_catalog(self)
    }
}

fn distinct_specialties(records: &[DoctorRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(|r| r.specialty_names())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Loading lifecycle of the session catalog
///
/// `Loading` moves to `Ready` or `Failed` once; both are terminal.
#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(Catalog),
    Failed(String),
}

impl LoadState {
    /// Apply the outcome of the single fetch
    ///
    /// Only a `Loading` state changes; resolving a terminal state is a no-op.
    pub fn resolve(self, outcome: Result<Catalog>) -> Self {
        match self {
            LoadState::Loading => match outcome {
                Ok(catalog) => LoadState::Ready(catalog),
                Err(err) => {
                    tracing::error!(error = %err, "catalog load failed");
                    LoadState::Failed(crate::constants::FETCH_ERROR_MESSAGE.to_string())
                }
            },
            terminal => {
                tracing::warn!("ignoring catalog outcome after the load already finished");
                terminal
            }
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            LoadState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Fetches the doctor catalog from the remote endpoint
pub struct CatalogLoader {
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    show_progress: bool,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoader {
    /// Create a loader from the global configuration
    pub fn new() -> Self {
        Self::from_config(&crate::config::global_config())
    }

    /// Create a loader from configuration
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: config.request_timeout_seconds.map(Duration::from_secs),
            user_agent: config.user_agent.clone(),
            show_progress: config.show_progress,
        }
    }

    /// Point the loader at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        builder.build().map_err(|e| DirectoryError::Custom {
            message: format!("Failed to create HTTP client: {}", e),
            suggestion: Some("Check your network configuration".to_string()),
        })
    }

    /// Fetch and decode the catalog with a single GET request
    pub async fn fetch(&self) -> Result<Catalog> {
        let url = self.endpoint.as_str();
        tracing::info!(url, "fetching doctor catalog");

        #[cfg(feature = "progress")]
        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
                pb.set_style(style);
            }
            pb.set_message("Loading...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let outcome = self.fetch_inner(url).await;

        #[cfg(feature = "progress")]
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match &outcome {
            Ok(catalog) => tracing::info!(
                records = catalog.len(),
                specialties = catalog.specialties().len(),
                "doctor catalog loaded"
            ),
            Err(err) => tracing::warn!(error = %err, "doctor catalog fetch failed"),
        }
        outcome
    }

    async fn fetch_inner(&self, url: &str) -> Result<Catalog> {
        let client = self.client()?;
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| DirectoryError::fetch_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DirectoryError::fetch_failed(url, e))?;
        tracing::debug!(bytes = body.len(), "received catalog body");

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| DirectoryError::invalid_payload(url, e))?;
        Catalog::from_value(value, url).map_err(|e| DirectoryError::invalid_payload(url, e))
    }
}

/// Catalog statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStatistics {
    pub total_doctors: usize,
    pub video_consult: usize,
    pub in_clinic: usize,
    pub unnamed: usize,
    pub doctors_per_specialty: BTreeMap<String, usize>,
    pub fee_range: Option<(u64, u64)>,
    pub experience_range: Option<(u64, u64)>,
}

impl CatalogStatistics {
    /// Calculate statistics from a catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let records = catalog.records();
        let mut doctors_per_specialty = BTreeMap::new();

        for record in records {
            // A doctor listing one specialty twice is counted once
            let names: HashSet<&str> = record.specialty_names().collect();
            for name in names {
                *doctors_per_specialty.entry(name.to_string()).or_insert(0) += 1;
            }
        }

        let range = |values: Vec<u64>| {
            let min = values.iter().copied().min()?;
            let max = values.iter().copied().max()?;
            Some((min, max))
        };

        Self {
            total_doctors: records.len(),
            video_consult: records.iter().filter(|r| r.video_consult).count(),
            in_clinic: records.iter().filter(|r| r.in_clinic).count(),
            unnamed: records.iter().filter(|r| r.name.as_deref().map_or(true, str::is_empty)).count(),
            doctors_per_specialty,
            fee_range: range(records.iter().map(DoctorRecord::fee_amount).collect()),
            experience_range: range(records.iter().map(DoctorRecord::experience_years).collect()),
        }
    }

    /// Print a formatted summary of the statistics
    pub fn print_summary(&self) {
        println!("=== Doctor Catalog Statistics ===");
        println!("Total Doctors: {}", self.total_doctors);
        if self.total_doctors > 0 {
            println!("  Video Consult: {} ({:.1}%)",
                self.video_consult,
                (self.video_consult as f64 / self.total_doctors as f64) * 100.0
            );
            println!("  In Clinic: {} ({:.1}%)",
                self.in_clinic,
                (self.in_clinic as f64 / self.total_doctors as f64) * 100.0
            );
        }
        if self.unnamed > 0 {
            println!("Doctors without a name: {}", self.unnamed);
        }
        if let Some((min, max)) = self.fee_range {
            println!("Fees: {} - {}", min, max);
        }
        if let Some((min, max)) = self.experience_range {
            println!("Experience (years): {} - {}", min, max);
        }
        println!("Specialties: {}", self.doctors_per_specialty.len());
        for (name, count) in &self.doctors_per_specialty {
            println!("  {}: {}", name, count);
        }
    }
}
