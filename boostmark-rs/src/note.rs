//! Note records and the exportable note representation.

use crate::error::VaultError;
use crate::parser::{adjust_content, extract_attachment_refs, normalize_name, parse_cson};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::SystemTime;

/// Default note type when a record does not name one.
pub const MARKDOWN_NOTE: &str = "MARKDOWN_NOTE";

fn default_note_type() -> String {
    MARKDOWN_NOTE.to_string()
}

/// A record timestamp: the text as stored plus the instant it denotes.
///
/// Serializes back to the stored text, so offsets and precision survive export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    raw: String,
    instant: DateTime<Utc>,
}

impl Timestamp {
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let parsed: DateTime<FixedOffset> = raw.parse()?;
        Ok(Self {
            raw: raw.to_string(),
            instant: parsed.with_timezone(&Utc),
        })
    }

    /// The timestamp exactly as the record stores it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn system_time(&self) -> SystemTime {
        SystemTime::from(self.instant)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Typed schema of a per-note source record.
///
/// Decoding fails when a required field is absent or has the wrong type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub title: String,
    pub content: String,
    /// Folder id; empty when the record names none.
    #[serde(default)]
    pub folder: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(rename = "type", default = "default_note_type")]
    pub note_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_trashed: bool,
}

impl NoteRecord {
    /// Decode CSON record text.
    pub fn decode(text: &str) -> Result<Self, Rejection> {
        let value = parse_cson(text).map_err(Rejection::Undecodable)?;
        serde_json::from_value(value).map_err(|e| Rejection::Undecodable(e.into()))
    }
}

/// Why a record was left out of the note list.
#[derive(Debug)]
pub enum Rejection {
    /// The record could not be parsed or does not match the schema.
    Undecodable(VaultError),
    /// A required text field is empty.
    EmptyField(&'static str),
    /// The title normalizes to an empty file name.
    EmptyName,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Undecodable(e) => write!(f, "undecodable record: {}", e),
            Rejection::EmptyField(field) => write!(f, "a note without {}", field),
            Rejection::EmptyName => write!(f, "invalid note name"),
        }
    }
}

/// A note ready for listing and export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Record file stem.
    pub id: String,
    /// File-name-safe form of the title. Never empty.
    pub name: String,
    /// Folder id; may be empty or point at a folder missing from the catalog.
    #[serde(rename = "note_folder_id")]
    pub folder_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(rename = "type")]
    pub note_type: String,
    pub title: String,
    /// Export-ready body: markers stripped, heading added or TOC removed.
    pub content: String,
    pub tags: Vec<String>,
    pub is_starred: bool,
    pub is_trashed: bool,
    /// Attachment paths relative to the attachments dir, all present on disk
    /// when the note was built.
    pub attachments: Vec<String>,
}

impl Note {
    /// Build a note from a decoded record.
    ///
    /// `keep_attachment` decides which referenced paths are kept; the reader
    /// passes an existence check against the attachments directory.
    /// Attachment references are taken from the raw content before it is
    /// rewritten, since rewriting removes the markers.
    pub fn from_record(
        id: impl Into<String>,
        record: NoteRecord,
        mut keep_attachment: impl FnMut(&str) -> bool,
    ) -> Result<Self, Rejection> {
        if record.content.is_empty() {
            return Err(Rejection::EmptyField("content"));
        }
        if record.title.is_empty() {
            return Err(Rejection::EmptyField("title"));
        }

        let attachments: Vec<String> = extract_attachment_refs(&record.content)
            .into_iter()
            .filter(|path| keep_attachment(path))
            .collect();

        let name = normalize_name(&record.title);
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }

        let content = adjust_content(&record.content, &name);

        Ok(Self {
            id: id.into(),
            name,
            folder_id: record.folder,
            created_at: record.created_at,
            updated_at: record.updated_at,
            note_type: record.note_type,
            title: record.title,
            content,
            tags: record.tags,
            is_starred: record.is_starred,
            is_trashed: record.is_trashed,
            attachments,
        })
    }

    /// File name of the exported Markdown file.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.name)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    /// A CSON record with the given title, folder and content.
    pub fn record_cson(title: &str, folder: &str, content: &str) -> String {
        format!(
            "createdAt: \"2019-06-11T08:43:02.170Z\"\n\
             updatedAt: \"2019-06-12T10:00:00.000Z\"\n\
             type: \"MARKDOWN_NOTE\"\n\
             folder: \"{}\"\n\
             title: \"{}\"\n\
             tags: [\n  \"work\"\n]\n\
             content: '''\n  {}\n'''\n\
             isStarred: false\n\
             isTrashed: false\n",
            folder,
            title,
            content.replace('\n', "\n  ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record_cson;
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_record() {
        let record = NoteRecord::decode(&record_cson("Hello", "f1", "Body")).unwrap();
        assert_eq!(record.title, "Hello");
        assert_eq!(record.folder, "f1");
        assert_eq!(record.content, "Body");
        assert_eq!(record.tags, vec!["work"]);
        assert_eq!(record.created_at.as_str(), "2019-06-11T08:43:02.170Z");
        assert_eq!(
            record.created_at.instant(),
            Utc.with_ymd_and_hms(2019, 6, 11, 8, 43, 2).unwrap()
                + chrono::Duration::milliseconds(170)
        );
    }

    #[test]
    fn test_timestamp_keeps_stored_text() {
        let ts = Timestamp::parse("2020-01-01T00:00:00+02:00").unwrap();
        assert_eq!(ts.to_string(), "2020-01-01T00:00:00+02:00");
        assert_eq!(ts.instant(), Utc.with_ymd_and_hms(2019, 12, 31, 22, 0, 0).unwrap());
        assert_eq!(serde_json::to_value(&ts).unwrap(), "2020-01-01T00:00:00+02:00");
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_decode_optional_fields_default() {
        let record = NoteRecord::decode(
            "title: 'T'\ncontent: 'C'\ncreatedAt: '2020-01-01T00:00:00Z'\nupdatedAt: '2020-01-01T00:00:00Z'\n",
        )
        .unwrap();
        assert_eq!(record.folder, "");
        assert_eq!(record.note_type, MARKDOWN_NOTE);
        assert!(record.tags.is_empty());
        assert!(!record.is_starred);
        assert!(!record.is_trashed);
    }

    #[test]
    fn test_decode_missing_content_is_rejected() {
        let result = NoteRecord::decode(
            "type: 'SNIPPET_NOTE'\ntitle: 'T'\nfolder: 'f'\ncreatedAt: '2020-01-01T00:00:00Z'\nupdatedAt: '2020-01-01T00:00:00Z'\n",
        );
        match result {
            Err(Rejection::Undecodable(e)) => assert!(e.to_string().contains("content")),
            other => panic!("expected Undecodable, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_bad_timestamp_is_rejected() {
        let result = NoteRecord::decode(&record_cson("T", "f", "C").replace(
            "2019-06-11T08:43:02.170Z",
            "yesterday",
        ));
        assert!(matches!(result, Err(Rejection::Undecodable(_))));
    }

    #[test]
    fn test_from_record_end_to_end_shape() {
        let record =
            NoteRecord::decode(&record_cson("Hello World!!", "f1", "Body text ![x](:storage/img.png))"))
                .unwrap();
        let note = Note::from_record("abc", record, |_| true).unwrap();

        assert_eq!(note.id, "abc");
        assert_eq!(note.name, "Hello World");
        assert_eq!(note.title, "Hello World!!");
        assert_eq!(note.attachments, vec!["img.png"]);
        assert_eq!(note.content, "# Hello World\n\nBody text ![x](img.png))");
        assert_eq!(note.file_name(), "Hello World.md");
    }

    #[test]
    fn test_from_record_filters_attachments() {
        let record = NoteRecord::decode(&record_cson(
            "T",
            "f1",
            "![a](:storage/keep.png) ![b](:storage/gone.png)",
        ))
        .unwrap();
        let note = Note::from_record("id", record, |p| p == "keep.png").unwrap();
        assert_eq!(note.attachments, vec!["keep.png"]);
        assert!(!note.content.contains(":storage/"));
        assert!(note.content.contains("![b](gone.png)"));
    }

    #[test]
    fn test_from_record_rejections() {
        let mut record = NoteRecord::decode(&record_cson("T", "f", "C")).unwrap();
        record.content.clear();
        assert!(matches!(
            Note::from_record("id", record, |_| true),
            Err(Rejection::EmptyField("content"))
        ));

        let mut record = NoteRecord::decode(&record_cson("T", "f", "C")).unwrap();
        record.title.clear();
        assert!(matches!(
            Note::from_record("id", record, |_| true),
            Err(Rejection::EmptyField("title"))
        ));

        let record = NoteRecord::decode(&record_cson("?!*", "f", "C")).unwrap();
        assert!(matches!(
            Note::from_record("id", record, |_| true),
            Err(Rejection::EmptyName)
        ));
    }

    #[test]
    fn test_serializes_with_vault_field_names() {
        let record = NoteRecord::decode(&record_cson("T", "f1", "C")).unwrap();
        let note = Note::from_record("id", record, |_| true).unwrap();
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["note_folder_id"], "f1");
        assert_eq!(json["type"], "MARKDOWN_NOTE");
        assert_eq!(json["isStarred"], false);
        assert!(json.get("createdAt").is_some());
    }
}
