use crate::error::{Result, SplitterError};
use serde::{Deserialize, Serialize};

/// One contiguous slice of the original code with positional metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// `{analysis_id}-chunk-{index}`
    pub chunk_id: String,

    /// Emission order, starting at 0
    #[serde(rename = "chunkIndex")]
    pub index: usize,

    /// Exact substring of the original text
    pub code: String,

    /// Identifier of the split run this chunk belongs to
    pub analysis_id: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Length of `code` in characters
    pub size: usize,

    /// `end_line - start_line + 1`
    pub line_count: usize,
}

impl Chunk {
    /// Create a chunk, deriving its id, size and line count
    #[must_use]
    pub fn new(
        analysis_id: &str,
        index: usize,
        code: String,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            chunk_id: Self::make_id(analysis_id, index),
            index,
            size: code.chars().count(),
            code,
            analysis_id: analysis_id.to_string(),
            start_line,
            end_line,
            line_count: end_line.saturating_sub(start_line) + 1,
        }
    }

    /// Deterministic chunk id for a run and index
    #[must_use]
    pub fn make_id(analysis_id: &str, index: usize) -> String {
        format!("{analysis_id}-chunk-{index}")
    }

    /// Whether this chunk is larger than the given limit
    #[must_use]
    pub const fn exceeds(&self, limit: usize) -> bool {
        self.size > limit
    }
}

/// Per-run metadata attached to every summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SplitMetadata {
    /// RFC 3339 UTC timestamp of the run
    pub processed_at: String,

    /// Size limit the run used
    pub max_chunk_size: usize,

    /// Run/request identifier
    pub request_id: String,

    /// Input exceeded the limit but offered no structural boundary to split at
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degenerate_structure: bool,
}

/// Overall result of one split invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SplitSummary {
    pub analysis_id: String,
    pub language: String,
    /// Length of the original text in characters
    pub total_size: usize,
    pub needs_chunking: bool,
    pub chunk_count: usize,
    pub chunks: Vec<Chunk>,
    /// Untouched input, only when no chunking was needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_code: Option<String>,
    pub metadata: SplitMetadata,
}

impl SplitSummary {
    /// Rebuild the original text from whichever representation the summary carries
    #[must_use]
    pub fn reassemble(&self) -> String {
        match &self.original_code {
            Some(code) => code.clone(),
            None => self.chunks.iter().map(|c| c.code.as_str()).collect(),
        }
    }
}

/// Input record for a split invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequest {
    #[serde(default)]
    pub analysis_id: Option<String>,

    /// Inline code; takes precedence over `source_key`
    #[serde(default)]
    pub code: Option<String>,

    /// Caller-supplied language, used verbatim
    #[serde(default)]
    pub language: Option<String>,

    /// Key into the configured object store
    #[serde(default, alias = "s3Key")]
    pub source_key: Option<String>,

    /// Per-request override of the configured limit
    #[serde(default)]
    pub max_chunk_size: Option<usize>,

    /// Identifier of the invoking request; generated when absent
    #[serde(default)]
    pub request_id: Option<String>,
}

impl SplitRequest {
    /// Request carrying inline code
    pub fn inline(analysis_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            analysis_id: Some(analysis_id.into()),
            code: Some(code.into()),
            ..Default::default()
        }
    }

    /// Request pointing at an object store key
    pub fn stored(analysis_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            analysis_id: Some(analysis_id.into()),
            source_key: Some(key.into()),
            ..Default::default()
        }
    }

    /// Builder: set language
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder: override the size limit
    #[must_use]
    pub const fn max_chunk_size(mut self, limit: usize) -> Self {
        self.max_chunk_size = Some(limit);
        self
    }

    /// Builder: set request id
    #[must_use]
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Parse a request from its JSON wire form
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| SplitterError::invalid_input(format!("malformed request: {e}")))
    }
}

/// Error output shape produced at the invocation boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub error: bool,
    pub error_message: String,
    pub error_type: String,
}

impl From<&SplitterError> for ErrorReport {
    fn from(err: &SplitterError) -> Self {
        Self {
            error: true,
            error_message: err.to_string(),
            error_type: err.error_type().to_string(),
        }
    }
}
