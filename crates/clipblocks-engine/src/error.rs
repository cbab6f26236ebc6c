/// Errors at the engine's ingestion and serialization boundaries.
///
/// Conversions themselves never fail; their problems are collected in a
/// [`ConversionReport`](crate::convert::ConversionReport).
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Editor tree must be a node object or an array of nodes, got {0}")]
    UnexpectedRoot(&'static str),
}
