//! # Codesplit Core
//!
//! Splits a body of source code that is too large for one analysis pass into
//! an ordered list of size-bounded chunks, avoiding cuts inside open `{…}` or
//! `(…)` regions.
//!
//! ## Architecture
//!
//! ```text
//! SplitRequest
//!     │
//!     ├──> CodeSource (inline text or object store key)
//!     │
//!     ├──> Validation (analysisId, non-empty code, limit)
//!     │
//!     ├──> LanguageClassifier (only when no language is given)
//!     │
//!     └──> needs_chunking?
//!          ├─> no:  summary carries originalCode
//!          └─> yes: line fold tracking brace/paren depth
//!                   └─> Chunk[] with line spans and sizes
//! ```
//!
//! The size limit is soft. A chunk is only closed at a line that starts at
//! nesting depth zero, so a long function or an unbalanced file can produce
//! chunks larger than the limit. No text is ever lost: concatenating the
//! chunks in order gives back the input.
//!
//! ## Example
//!
//! ```rust
//! use codesplit_core::{CodeSplitter, SplitRequest, SplitterConfig};
//!
//! let config = SplitterConfig::default().with_max_chunk_size(12);
//! let splitter = CodeSplitter::new(config).unwrap();
//!
//! let request = SplitRequest::inline("demo", "a();\nb();\nc();\nd();");
//! let summary = splitter.process(&request).unwrap();
//!
//! assert!(summary.needs_chunking);
//! for chunk in &summary.chunks {
//!     println!("{} covers lines {}-{}", chunk.chunk_id, chunk.start_line, chunk.end_line);
//! }
//! assert_eq!(summary.reassemble(), "a();\nb();\nc();\nd();");
//! ```

mod config;
mod error;
mod language;
mod source;
mod split;
mod splitter;
mod types;

pub use config::{SplitterConfig, DEFAULT_MAX_CHUNK_SIZE, MAX_CHUNK_SIZE_ENV};
pub use error::{Result, SplitterError};
pub use language::{KeywordClassifier, KeywordRule, Language, LanguageClassifier, Pattern};
pub use source::{CodeSource, InlineSource, ObjectSource, ObjectStore};
pub use split::{
    needs_chunking, split, split_with_report, NestingDepth, StructureReport, LINE_SEPARATOR,
};
pub use splitter::{CodeSplitter, SplitStats};
pub use types::{Chunk, ErrorReport, SplitMetadata, SplitRequest, SplitSummary};
