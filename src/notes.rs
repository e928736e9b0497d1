//! Daily notes: one markdown document per calendar day.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::host::{Document, DocumentStore};
use crate::log_info;

const ENABLE_LOGS: bool = true;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const CHECKLIST_BODY: &str = "## Tasks\n- [ ] \n\n## Notes\n- [ ] \n\n## Reflection\n- [ ] \n";
const HEADERS_ONLY_BODY: &str = "## Tasks\n\n## Notes\n\n## Reflection\n";

/// Body written into a newly created daily note.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NoteTemplate {
    /// Three headed sections, each with an empty checkbox.
    #[default]
    Checklist,
    /// The same three headers with no body text.
    HeadersOnly,
}

impl NoteTemplate {
    pub fn body(&self) -> &'static str {
        match self {
            NoteTemplate::Checklist => CHECKLIST_BODY,
            NoteTemplate::HeadersOnly => HEADERS_ONLY_BODY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    Opened(Document),
    Created(Document),
}

impl NoteOutcome {
    pub fn document(&self) -> &Document {
        match self {
            NoteOutcome::Opened(doc) | NoteOutcome::Created(doc) => doc,
        }
    }
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `"2026-10-18"` becomes `"2026-10-18.md"`. Anything else is rejected.
pub fn daily_note_name(date: &str) -> Result<String> {
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .with_context(|| format!("'{date}' is not a YYYY-MM-DD date"))?;
    Ok(format!("{}.md", format_iso_date(parsed)))
}

/// Opens the note for `date`, creating it from `template` first if needed.
pub fn open_or_create(
    store: &dyn DocumentStore,
    date: &str,
    template: NoteTemplate,
) -> Result<NoteOutcome> {
    let name = daily_note_name(date)?;

    let outcome = if store
        .exists(&name)
        .with_context(|| format!("Failed to look up {name}"))?
    {
        NoteOutcome::Opened(Document::new(name.clone()))
    } else {
        let document = store
            .create(&name, template.body())
            .with_context(|| format!("Failed to create {name}"))?;
        log_info!("Created daily note {name}");
        NoteOutcome::Created(document)
    };

    store
        .open(outcome.document())
        .with_context(|| format!("Failed to open {name}"))?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocumentStore;

    #[test]
    fn note_name_is_iso_date_with_extension() {
        assert_eq!(daily_note_name("2026-03-07").expect("valid"), "2026-03-07.md");
        assert!(daily_note_name("2026-3-7x").is_err());
        assert!(daily_note_name("2026-02-30").is_err());
    }

    #[test]
    fn creates_missing_note_with_template() {
        let store = MemoryDocumentStore::new();
        let outcome =
            open_or_create(&store, "2026-10-18", NoteTemplate::Checklist).expect("created");

        assert_eq!(outcome, NoteOutcome::Created(Document::new("2026-10-18.md")));
        let body = store.contents("2026-10-18.md").expect("stored");
        assert_eq!(body.matches("- [ ]").count(), 3);
        assert_eq!(store.opened(), vec!["2026-10-18.md".to_string()]);
    }

    #[test]
    fn existing_note_is_opened_untouched() {
        let store = MemoryDocumentStore::new();
        store.create("2026-10-18.md", "mine").expect("seed");

        let outcome =
            open_or_create(&store, "2026-10-18", NoteTemplate::HeadersOnly).expect("opened");

        assert!(matches!(outcome, NoteOutcome::Opened(_)));
        assert_eq!(store.contents("2026-10-18.md").as_deref(), Some("mine"));
        assert_eq!(store.opened().len(), 1);
    }

    #[test]
    fn headers_only_template_has_no_checkboxes() {
        let body = NoteTemplate::HeadersOnly.body();
        assert_eq!(body.matches("## ").count(), 3);
        assert!(!body.contains("- [ ]"));
    }
}
