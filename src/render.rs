/*!
 * Rendering and export of doctor search results
 *
 * Cards collect the display-safe fields of a record. They can be printed as
 * terminal text or exported as JSON, JSON Lines, or CSV.
 */

use std::fmt::Write as _;
use std::io::Write;
use serde::Serialize;

use crate::{Result, OutputFormat};
use crate::constants::NO_RESULTS_MESSAGE;
use crate::data_types::{ConsultationType, DoctorRecord, FilterState, SortBy};

/// Display-ready summary of one doctor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorCard {
    pub id: String,
    pub name: String,
    pub specialties: String,
    pub qualifications: String,
    pub experience: String,
    pub clinic: String,
    pub location: String,
    pub fee: String,
    pub photo: String,
    pub video_consult: bool,
    pub in_clinic: bool,
}

impl DoctorCard {
    /// Build a card; absent fields become empty strings
    pub fn from_record(record: &DoctorRecord, placeholder_photo: &str) -> Self {
        let fee = match record.fees.as_deref() {
            Some(fees) if !fees.is_empty() => fees.to_string(),
            _ => "0".to_string(),
        };

        Self {
            id: record.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            name: record.display_name(),
            specialties: record.specialty_display(),
            qualifications: record.qualifications(),
            experience: record.experience.clone().unwrap_or_default(),
            clinic: record.clinic_name(),
            location: record.location_display(),
            fee,
            photo: record.photo_or(placeholder_photo).to_string(),
            video_consult: record.video_consult,
            in_clinic: record.in_clinic,
        }
    }
}

/// Build cards for a result list
pub fn cards(records: &[&DoctorRecord], placeholder_photo: &str) -> Vec<DoctorCard> {
    records
        .iter()
        .map(|r| DoctorCard::from_record(r, placeholder_photo))
        .collect()
}

/// Render cards as terminal text
pub fn render_text(cards: &[DoctorCard]) -> String {
    if cards.is_empty() {
        return format!("{}\n", NO_RESULTS_MESSAGE);
    }

    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{}", card.name);
        if !card.specialties.is_empty() {
            let _ = writeln!(out, "  {}", card.specialties);
        }
        if !card.qualifications.is_empty() {
            let _ = writeln!(out, "  {}", card.qualifications);
        }
        if !card.experience.is_empty() {
            let _ = writeln!(out, "  {}", card.experience);
        }
        if !card.clinic.is_empty() || !card.location.is_empty() {
            let place = [card.clinic.as_str(), card.location.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" | ");
            let _ = writeln!(out, "  {}", place);
        }
        let _ = writeln!(out, "  Fee: {}", card.fee);
        out.push('\n');
    }
    out
}

/// Render the filter sidebar with the current selections marked
pub fn render_filter_panel(specialties: &[String], state: &FilterState) -> String {
    let radio = |selected: bool| if selected { "(*)" } else { "( )" };
    let checkbox = |checked: bool| if checked { "[x]" } else { "[ ]" };

    let mut out = String::new();
    out.push_str("Sort by\n");
    for sort in [SortBy::Fees, SortBy::Experience] {
        let _ = writeln!(out, "  {} {}", radio(state.sort_by == sort), sort.label());
    }

    out.push_str("Specialities\n");
    for specialty in specialties {
        let _ = writeln!(
            out,
            "  {} {}",
            checkbox(state.selected_specialties.contains(specialty)),
            specialty
        );
    }

    out.push_str("Mode of consultation\n");
    for consultation in [ConsultationType::VideoConsult, ConsultationType::InClinic, ConsultationType::None] {
        let _ = writeln!(
            out,
            "  {} {}",
            radio(state.consultation_type == consultation),
            consultation.label()
        );
    }
    out
}

/// Trait for exporting rendered cards
pub trait CardExporter {
    /// Write the cards to `writer`
    fn export(&self, cards: &[DoctorCard], writer: &mut dyn Write) -> Result<()>;

    /// Get the export format
    fn format(&self) -> OutputFormat;
}

/// Plain text exporter
pub struct TextExporter;

impl CardExporter for TextExporter {
    fn export(&self, cards: &[DoctorCard], writer: &mut dyn Write) -> Result<()> {
        writer.write_all(render_text(cards).as_bytes())?;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

/// JSON exporter
pub struct JsonExporter {
    /// Whether to pretty-print the JSON array
    pub pretty_print: bool,
    /// Whether to export as JSON Lines (one card per line)
    pub json_lines: bool,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self {
            pretty_print: true,
            json_lines: false,
        }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set JSON Lines format
    pub fn as_json_lines(mut self) -> Self {
        self.json_lines = true;
        self.pretty_print = false;
        self
    }
}

impl CardExporter for JsonExporter {
    fn export(&self, cards: &[DoctorCard], writer: &mut dyn Write) -> Result<()> {
        if self.json_lines {
            for card in cards {
                let json = serde_json::to_string(card)?;
                writeln!(writer, "{}", json)?;
            }
        } else if self.pretty_print {
            serde_json::to_writer_pretty(&mut *writer, cards)?;
            writeln!(writer)?;
        } else {
            serde_json::to_writer(&mut *writer, cards)?;
            writeln!(writer)?;
        }
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        if self.json_lines {
            OutputFormat::JsonLines
        } else {
            OutputFormat::Json
        }
    }
}

/// CSV exporter, one row per card with a header
pub struct CsvExporter;

impl CardExporter for CsvExporter {
    fn export(&self, cards: &[DoctorCard], writer: &mut dyn Write) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for card in cards {
            csv_writer.serialize(card)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}

/// Pick the exporter for an output format
pub fn exporter_for(format: OutputFormat) -> Box<dyn CardExporter> {
    match format {
        OutputFormat::Text => Box::new(TextExporter),
        OutputFormat::Json => Box::new(JsonExporter::new()),
        OutputFormat::JsonLines => Box::new(JsonExporter::new().as_json_lines()),
        OutputFormat::Csv => Box::new(CsvExporter),
    }
}
