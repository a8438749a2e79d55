//! Test Fixtures
//!
//! Small, realistic sheet exports and row builders.

use crate::core::briefing::model::{DocumentKind, DocumentRow, Priority, Recipient};

// =============================================================================
// Sheet Exports
// =============================================================================

/// Organization table: two config entries, one group, two characters.
pub const ORGANIZATION_CSV: &str = "\
\"typ\",\"jmeno\",\"slug\",\"skupina\",\"popis\"
\"konfigurace\",\"nazev\",\"\",\"Operation Nightfall\",\"\"
\"konfigurace\",\"beh_cislo\",\"\",\"2\",\"\"
\"skupina\",\"Scouts\",\"\",\"\",\"\"
\"postava\",\"Mara Vell\",\"mara\",\"Scouts\",\"Pathfinder, quiet, stubborn.\"
\"postava\",\"Ivo Brandt\",\"ivo\",\"\",\"Quartermaster.\"
";

/// Documents table: eight rows covering every kind and recipient shape.
pub const DOCUMENTS_CSV: &str = "\
\"typ\",\"komu\",\"nadpis\",\"obsah\",\"datum_zverejneni\",\"priorita\"
\"medailonek\",\"mara\",\"Who is Mara\",\"<p>Born in the hills.</p>\",\"2025-06-01 10:00:00\",\"hlavni\"
\"organizacni\",\"vsichni\",\"Arrival\",\"<p>Gate opens at 17:00.</p>\",\"2025-06-01 09:00:00\",\"hlavni\"
\"herni\",\"vsichni\",\"Rumors\",\"<p>Lights in the forest.</p>\",\"2025-06-02 09:00:00\",\"normalni\"
\"herni\",\"Scouts\",\"Scout orders\",\"<p>Map the ridge.</p>\",\"3.6.2025 8:15\",\"normalni\"
\"postava\",\"mara\",\"Your secret\",\"<p>You owe Ivo money.</p>\",\"2025-06-04 12:00:00\",\"hlavni\"
\"postava\",\"ivo\",\"Ledger\",\"<p>Mara owes you.</p>\",\"2025-06-04 12:00:00\",\"normalni\"
\"organizacni\",\"vsichni\",\"Food\",\"<p>Dinner at 19:00.</p>\",\"not a date\",\"normalni\"
\"herni\",\"\",\"Orphan\",\"<p>Nobody sees this.</p>\",\"2025-06-05 09:00:00\",\"normalni\"
";

// =============================================================================
// Row Builders
// =============================================================================

/// Build a document row with an empty body.
pub fn document(
    title: &str,
    kind: DocumentKind,
    to: &str,
    published_at: &str,
    priority: Priority,
) -> DocumentRow {
    DocumentRow {
        kind,
        recipient: Recipient::parse(to),
        title: title.to_string(),
        body: String::new(),
        published_at: published_at.to_string(),
        priority,
    }
}
