/*!
 * # Doctor Directory Search Library
 *
 * A Rust library for searching a doctor directory catalog: fetch the list
 * once, filter it by name, consultation mode, and specialty, sort it by fee
 * or experience, and keep the active filters in a shareable URL.
 *
 * ## Features
 *
 * - **Tolerant Records**: Loosely structured JSON degrades to safe defaults, never errors
 * - **Pure Filtering**: Search, consultation, specialty, and sort stages over a borrowed catalog
 * - **URL Sync**: Filter state round-trips through the page query string
 * - **Autocomplete**: Top-three name suggestions recomputed on every keystroke
 * - **Exports**: Text, JSON, JSON Lines, and CSV result cards
 *
 * ## Quick Start
 *
 * ```no_run
 * use docsearch::prelude::*;
 *
 * # fn main() -> Result<()> {
 * # let rt = tokio::runtime::Runtime::new()?;
 * // Fetch the catalog once
 * let catalog = rt.block_on(CatalogLoader::new().fetch())?;
 *
 * // Seed the filters from a shared link
 * let state = docsearch::query_string::decode("?consultationType=Video+Consult&sortBy=fees");
 *
 * let results = docsearch::engine::apply(catalog.records(), &state);
 * println!("Found {} doctors offering video consults", results.len());
 * # Ok(())
 * # }
 * ```
 *
 * ## Driving a Session
 *
 * ```
 * # use docsearch::prelude::*;
 * # fn main() -> Result<()> {
 * let url = url::Url::parse("http://localhost:3000/?search=rao").expect("valid url");
 * let mut session = DirectorySession::new(url);
 *
 * let catalog = Catalog::from_json_str(
 *     r#"[{"id": "1", "name": "Dr. Anita Rao", "video_consult": true, "fees": "₹ 500"}]"#,
 *     "inline",
 * )?;
 * session.catalog_loaded(Ok(catalog));
 * session.set_consultation_type(ConsultationType::VideoConsult);
 *
 * assert_eq!(session.results().len(), 1);
 * assert_eq!(session.url().query(), Some("search=rao&consultationType=Video+Consult"));
 * # Ok(())
 * # }
 * ```
 *
 * ## Configuration
 *
 * ```no_run
 * # use docsearch::prelude::*;
 * // Read ~/.config/docsearch/config.toml, then DOCSEARCH_* variables
 * let config = docsearch::config::DirectoryConfig::load();
 *
 * // Or build your own
 * let config = ConfigBuilder::new()
 *     .endpoint("http://localhost:8080/doctors.json")
 *     .suggestion_limit(2)
 *     .show_progress(false)
 *     .build();
 * let loader = CatalogLoader::from_config(&config);
 * ```
 */

// Re-export error types from root
pub use error::{DirectoryError, Result, OutputFormat};

// Public modules
pub mod data_types;
pub mod error;
pub mod catalog;
pub mod query_string;
pub mod engine;
pub mod autocomplete;
pub mod session;
pub mod render;
pub mod config;
pub mod logging;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use docsearch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data_types::*;
    pub use crate::catalog::{Catalog, CatalogLoader, CatalogStatistics, LoadState};
    pub use crate::engine::DoctorQuery;
    pub use crate::autocomplete::{suggest, SearchBox};
    pub use crate::session::{DirectorySession, View};
    pub use crate::render::{CardExporter, DoctorCard, JsonExporter, CsvExporter, TextExporter};
    pub use crate::config::{ConfigBuilder, DirectoryConfig};
    pub use crate::error::{DirectoryError, Result};
    pub use crate::OutputFormat;
}

/// Directory constants
pub mod constants {
    /// Catalog endpoint used when none is configured
    pub const DEFAULT_ENDPOINT: &str = "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";

    /// Maximum number of autocomplete suggestions
    pub const SUGGESTION_LIMIT: usize = 3;

    /// Image shown for doctors without a photo
    pub const PLACEHOLDER_PHOTO: &str = "/api/placeholder/100/100";

    /// Card title for doctors without a name
    pub const UNKNOWN_DOCTOR_NAME: &str = "Unknown Doctor";

    /// Shown when no doctor matches the filters
    pub const NO_RESULTS_MESSAGE: &str = "No doctors found matching your criteria";

    /// Generic message for a failed catalog load
    pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch doctors data";

    /// Page URL used when the CLI is not given one
    pub const DEFAULT_PAGE_URL: &str = "http://localhost:3000/";
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_end_to_end_video_consult() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"id": "1", "name": "Dr. A", "video_consult": true},
                {"id": "2", "name": "Dr. B", "video_consult": false, "in_clinic": true},
                {"id": "3", "name": "Dr. C", "video_consult": true},
                {"id": "4", "name": "Dr. D"},
                {"id": "5", "name": "Dr. E", "in_clinic": true}
            ]"#,
            "inline",
        )
        .unwrap();

        let mut session = DirectorySession::new(url::Url::parse(crate::constants::DEFAULT_PAGE_URL).unwrap());
        session.catalog_loaded(Ok(catalog));
        session.set_consultation_type(ConsultationType::VideoConsult);

        assert_eq!(session.results().len(), 2);
        assert!(session.url().as_str().contains("consultationType=Video+Consult"));
    }
}
