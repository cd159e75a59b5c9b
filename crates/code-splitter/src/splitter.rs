use crate::config::SplitterConfig;
use crate::error::{Result, SplitterError};
use crate::language::{KeywordClassifier, LanguageClassifier};
use crate::source::{CodeSource, InlineSource, ObjectStore};
use crate::split::{needs_chunking, split_with_report};
use crate::types::{Chunk, SplitMetadata, SplitRequest, SplitSummary};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Main splitter interface: validates requests and assembles summaries
pub struct CodeSplitter {
    config: SplitterConfig,
    classifier: Box<dyn LanguageClassifier>,
    store: Option<ObjectStore>,
}

impl CodeSplitter {
    /// Create a splitter using the keyword classifier
    pub fn new(config: SplitterConfig) -> Result<Self> {
        Self::with_classifier(config, KeywordClassifier::new())
    }

    /// Create a splitter with a custom language classifier
    pub fn with_classifier(
        config: SplitterConfig,
        classifier: impl LanguageClassifier + 'static,
    ) -> Result<Self> {
        config.validate().map_err(SplitterError::invalid_config)?;
        let store = config.store_dir.clone().map(ObjectStore::new);
        Ok(Self {
            config,
            classifier: Box::new(classifier),
            store,
        })
    }

    /// Run one request end to end: validate, fetch, split, summarize
    pub fn process(&self, request: &SplitRequest) -> Result<SplitSummary> {
        let analysis_id = request
            .analysis_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SplitterError::invalid_input("analysisId is required"))?;

        let limit = match request.max_chunk_size {
            Some(0) => {
                return Err(SplitterError::invalid_input("maxChunkSize must be > 0"));
            }
            Some(limit) => limit,
            None => self.config.max_chunk_size,
        };

        let code = self.fetch_code(request)?;
        if code.is_empty() {
            return Err(SplitterError::invalid_input("Code content is empty"));
        }

        let mut summary =
            self.summarize(analysis_id, &code, request.language.as_deref(), limit);
        if let Some(id) = &request.request_id {
            summary.metadata.request_id = id.clone();
        }
        Ok(summary)
    }

    /// Assemble the summary for code that is already in memory
    #[must_use]
    pub fn summarize(
        &self,
        analysis_id: &str,
        code: &str,
        language: Option<&str>,
        limit: usize,
    ) -> SplitSummary {
        let language = language.map_or_else(
            || self.classifier.classify(code).as_str().to_string(),
            str::to_string,
        );
        let total_size = code.chars().count();

        let mut metadata = SplitMetadata {
            processed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            max_chunk_size: limit,
            request_id: Uuid::new_v4().to_string(),
            degenerate_structure: false,
        };

        if !needs_chunking(code, limit) {
            log::info!("Code does not need chunking, size: {total_size}");
            return SplitSummary {
                analysis_id: analysis_id.to_string(),
                language,
                total_size,
                needs_chunking: false,
                chunk_count: 0,
                chunks: Vec::new(),
                original_code: Some(code.to_string()),
                metadata,
            };
        }

        let (chunks, report) = split_with_report(code, analysis_id, limit);
        if report.is_degenerate() {
            log::warn!(
                "Unbalanced structure without a boundary in {analysis_id}: {total_size} chars kept as one chunk (limit {limit}, final depth braces={} parens={})",
                report.final_depth.braces,
                report.final_depth.parens
            );
            metadata.degenerate_structure = true;
        } else if !report.final_depth.is_balanced() {
            log::debug!(
                "Unbalanced structure in {analysis_id}: braces={} parens={}",
                report.final_depth.braces,
                report.final_depth.parens
            );
        }

        let stats = Self::get_stats(&chunks, limit);
        log::info!("Code split into {} chunks ({stats})", chunks.len());

        SplitSummary {
            analysis_id: analysis_id.to_string(),
            language,
            total_size,
            needs_chunking: true,
            chunk_count: chunks.len(),
            chunks,
            original_code: None,
            metadata,
        }
    }

    fn fetch_code(&self, request: &SplitRequest) -> Result<String> {
        if let Some(code) = &request.code {
            return InlineSource::new(code).fetch();
        }

        match (&request.source_key, &self.store) {
            (Some(key), Some(store)) => store.source(key)?.fetch(),
            (Some(key), None) => Err(SplitterError::invalid_input(format!(
                "sourceKey '{key}' given but no object store is configured"
            ))),
            (None, _) => Err(SplitterError::invalid_input("Code content is empty")),
        }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Get statistics about a chunk list
    #[must_use]
    pub fn get_stats(chunks: &[Chunk], limit: usize) -> SplitStats {
        let total_size: usize = chunks.iter().map(|c| c.size).sum();
        SplitStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(|c| c.line_count).sum(),
            total_size,
            avg_size_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_size / chunks.len()
            },
            min_size: chunks.iter().map(|c| c.size).min().unwrap_or(0),
            max_size: chunks.iter().map(|c| c.size).max().unwrap_or(0),
            oversized_chunks: chunks.iter().filter(|c| c.exceeds(limit)).count(),
        }
    }
}

impl Default for CodeSplitter {
    fn default() -> Self {
        Self {
            config: SplitterConfig::default(),
            classifier: Box::new(KeywordClassifier::new()),
            store: None,
        }
    }
}

/// Statistics about split results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub total_size: usize,
    pub avg_size_per_chunk: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub oversized_chunks: usize,
}

impl std::fmt::Display for SplitStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Chars: {} | Avg: {} | Range: {}-{} | Oversized: {}",
            self.total_chunks,
            self.total_lines,
            self.total_size,
            self.avg_size_per_chunk,
            self.min_size,
            self.max_size,
            self.oversized_chunks
        )
    }
}
