//! Readings extraction
//!
//! Turns a Vatican News "evangelio de hoy" page into a [`ReadingsResult`].
//! Extraction never fails: markup that is missing or shaped differently
//! leaves the corresponding fields as `None`.
//!
//! Page layout relied upon:
//!
//! - an element whose class contains `indicazioneLiturgica` holds the
//!   liturgical day label
//! - each reading lives in a `section.section--evidence` whose `h2` reads
//!   `Lectura del Día` or `Evangelio del Día`
//! - inside a section, paragraph 0 introduces the reading, paragraph 1 is the
//!   citation and the remaining paragraphs are the body

pub mod dom;

use crate::readings::{ExtractedReading, ReadingsResult};
use dom::{Document, Element, HtmlDocument};

/// Class fragment of the liturgical indication element
pub const LITURGICAL_INDICATION_CLASS: &str = "indicazioneLiturgica";

/// Class carried by the sections that hold the readings
pub const EVIDENCE_SECTION_CLASS: &str = "section--evidence";

/// Heading of the first reading section
pub const FIRST_READING_HEADING: &str = "Lectura del Día";

/// Heading of the gospel section
pub const GOSPEL_HEADING: &str = "Evangelio del Día";

/// Parses HTML and extracts the readings
///
/// # Example
///
/// ```
/// use lecturas::extract_readings;
///
/// let html = r#"<section class="section--evidence"><h2>Evangelio del Día</h2>
///     <p>Lectura del santo evangelio según san Mateo</p>
///     <p>Mt 15, 29-37</p>
///     <p>En aquel tiempo...</p></section>"#;
/// let readings = extract_readings(html);
/// assert_eq!(readings.evangelio.cita.as_deref(), Some("Mt 15, 29-37"));
/// assert!(readings.primera_lectura.cita.is_none());
/// ```
pub fn extract_readings(html: &str) -> ReadingsResult {
    let document = HtmlDocument::parse(html);
    extract_from_document(&document)
}

/// Extracts the readings from an already parsed document
pub fn extract_from_document<D: Document>(document: &D) -> ReadingsResult {
    let mut result = ReadingsResult {
        indicacion_liturgica: document
            .first_with_class_fragment(LITURGICAL_INDICATION_CLASS)
            .map(|element| element.text().trim().to_string()),
        ..ReadingsResult::default()
    };

    for section in document.select_all("section", EVIDENCE_SECTION_CLASS) {
        let heading: String = section.descendants("h2").iter().map(|h| h.text()).collect();

        let slot = match heading.trim() {
            FIRST_READING_HEADING => &mut result.primera_lectura,
            GOSPEL_HEADING => &mut result.evangelio,
            _ => continue,
        };

        // Later sections with the same heading overwrite earlier ones
        if let Some(reading) = read_section(&section) {
            *slot = reading;
        }
    }

    result
}

/// Reads citation and body from a reading section
///
/// Returns `None` when the section has fewer than two paragraphs.
fn read_section<E: Element>(section: &E) -> Option<ExtractedReading> {
    let paragraphs: Vec<String> = section
        .descendants("p")
        .iter()
        .map(|p| p.text().trim().to_string())
        .collect();

    if paragraphs.len() < 2 {
        return None;
    }

    let lectura = paragraphs[2..]
        .iter()
        .filter(|text| !text.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    Some(ExtractedReading {
        cita: Some(paragraphs[1].clone()),
        lectura: Some(lectura),
    })
}
