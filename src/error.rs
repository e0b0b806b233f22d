use thiserror::Error;

/// Structural failures while turning a raw catalog into library records.
///
/// Every variant aborts the whole load; no partial catalog is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Missing required field \"{field}\" for library \"{id}\"")]
    MissingField { field: String, id: String },

    #[error("Catalog is missing the <libraries> root element")]
    MissingRoot,

    #[error("Duplicate library id \"{id}\"")]
    DuplicateId { id: String },

    #[error("Catalog decode error: {0}")]
    Decode(String),
}

impl CatalogError {
    pub(crate) fn missing(field: impl Into<String>, id: &str) -> Self {
        let id = if id.is_empty() { "unknown" } else { id };
        CatalogError::MissingField {
            field: field.into(),
            id: id.to_string(),
        }
    }
}
