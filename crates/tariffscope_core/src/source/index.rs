use serde::Deserialize;
use serde::de::IgnoredAny;

/// Why an index listing was rejected
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index is not a JSON array: {0}")]
    Json(#[from] serde_json::Error),

    #[error("index lists no tables")]
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexEntry {
    Name(String),
    Record {
        name: Option<String>,
        id: Option<String>,
        table: Option<String>,
    },
    Other(IgnoredAny),
}

impl IndexEntry {
    fn into_name(self) -> Option<String> {
        let name = match self {
            IndexEntry::Name(name) => Some(name),
            IndexEntry::Record { name, id, table } => name.or(id).or(table),
            IndexEntry::Other(_) => None,
        }?;
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Table names listed in an `index.json` document.
///
/// Entries are names or objects with a `name`, `id` or `table` field, the
/// first present one winning. Entries without a usable name are skipped; a
/// listing with none at all is rejected.
pub fn parse_index(text: &str) -> Result<Vec<String>, IndexError> {
    let entries: Vec<IndexEntry> = serde_json::from_str(text)?;
    let names: Vec<String> = entries.into_iter().filter_map(IndexEntry::into_name).collect();
    if names.is_empty() {
        return Err(IndexError::Empty);
    }
    Ok(names)
}
