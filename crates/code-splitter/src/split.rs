//! Line fold that cuts code into size-bounded chunks at structural boundaries.

use crate::types::Chunk;

/// Line separator the fold splits on and re-inserts
pub const LINE_SEPARATOR: char = '\n';

/// Returns true iff `text` is longer than `limit` characters
#[must_use]
pub fn needs_chunking(text: &str, limit: usize) -> bool {
    char_len(text) > limit
}

/// Split `text` into chunks of roughly `limit` characters.
///
/// The limit is soft: a chunk is only closed where the brace and paren depth
/// carried over from earlier lines is zero, so a long block or a single long
/// line produces an oversized chunk instead of a cut. Concatenating the
/// returned `code` fields in order gives back `text`.
#[must_use]
pub fn split(text: &str, analysis_id: &str, limit: usize) -> Vec<Chunk> {
    split_with_report(text, analysis_id, limit).0
}

/// Same as [`split`], also reporting what the fold saw of the code structure
#[must_use]
pub fn split_with_report(
    text: &str,
    analysis_id: &str,
    limit: usize,
) -> (Vec<Chunk>, StructureReport) {
    if text.is_empty() {
        return (Vec::new(), StructureReport::default());
    }

    let lines: Vec<&str> = text.split(LINE_SEPARATOR).collect();
    let last = lines.len() - 1;

    let acc = lines.iter().enumerate().fold(
        Accumulator::new(analysis_id, limit),
        |acc, (idx, line)| acc.push_line(line, idx + 1, idx == last),
    );

    acc.finish(lines.len())
}

/// Structural observations from one split pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructureReport {
    /// Lines (other than the first) that started at depth zero
    pub split_points: usize,
    /// Depth left after the last line
    pub final_depth: NestingDepth,
}

impl StructureReport {
    /// No line after the first ever returned to depth zero and the
    /// counts never settled back to balanced
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.split_points == 0 && !self.final_depth.is_balanced()
    }
}

/// Running signed counts of unmatched `{` and `(`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NestingDepth {
    pub braces: i64,
    pub parens: i64,
}

impl NestingDepth {
    /// Depth after consuming `line`; negative values are kept as-is
    #[must_use]
    pub fn advance(self, line: &str) -> Self {
        line.chars().fold(self, |depth, ch| match ch {
            '{' => Self { braces: depth.braces + 1, ..depth },
            '}' => Self { braces: depth.braces - 1, ..depth },
            '(' => Self { parens: depth.parens + 1, ..depth },
            ')' => Self { parens: depth.parens - 1, ..depth },
            _ => depth,
        })
    }

    #[must_use]
    pub const fn is_balanced(self) -> bool {
        self.braces == 0 && self.parens == 0
    }
}

/// Fold state threaded through the lines of one split
struct Accumulator<'a> {
    analysis_id: &'a str,
    limit: usize,
    chunks: Vec<Chunk>,
    buffer: String,
    buffer_len: usize,
    start_line: usize,
    depth: NestingDepth,
    split_points: usize,
}

impl<'a> Accumulator<'a> {
    fn new(analysis_id: &'a str, limit: usize) -> Self {
        Self {
            analysis_id,
            limit,
            chunks: Vec::new(),
            buffer: String::new(),
            buffer_len: 0,
            start_line: 1,
            depth: NestingDepth::default(),
            split_points: 0,
        }
    }

    fn push_line(mut self, line: &str, line_number: usize, is_last: bool) -> Self {
        let line_len = char_len(line);

        // The empty remainder after a final separator stays with its chunk.
        let trailing_empty = is_last && line_number > 1 && line.is_empty();
        // Depth before this line: a closing `}` still belongs to the open block.
        let at_boundary = self.depth.is_balanced() && line_number > 1 && !trailing_empty;
        if at_boundary {
            self.split_points += 1;
        }

        let would_exceed = self.buffer_len + line_len + 1 > self.limit;
        let has_content = self.buffer_len > 0;
        if would_exceed && has_content && at_boundary {
            self.flush(line_number - 1);
            self.start_line = line_number;
        }

        self.depth = self.depth.advance(line);

        self.buffer.push_str(line);
        self.buffer_len += line_len;
        if !is_last {
            self.buffer.push(LINE_SEPARATOR);
            self.buffer_len += 1;
        }

        self
    }

    fn flush(&mut self, end_line: usize) {
        let code = std::mem::take(&mut self.buffer);
        let index = self.chunks.len();
        self.chunks
            .push(Chunk::new(self.analysis_id, index, code, self.start_line, end_line));
        self.buffer_len = 0;
    }

    fn finish(mut self, total_lines: usize) -> (Vec<Chunk>, StructureReport) {
        if !self.buffer.is_empty() {
            self.flush(total_lines);
        }

        let report = StructureReport {
            split_points: self.split_points,
            final_depth: self.depth,
        };
        (self.chunks, report)
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn codes(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.code.as_str()).collect()
    }

    fn spans(chunks: &[Chunk]) -> Vec<(usize, usize)> {
        chunks.iter().map(|c| (c.start_line, c.end_line)).collect()
    }

    #[test]
    fn test_needs_chunking_threshold() {
        assert!(!needs_chunking("abcde", 5));
        assert!(needs_chunking("abcdef", 5));
        // Characters, not bytes.
        assert!(!needs_chunking("ééééé", 5));
    }

    #[test]
    fn test_splits_at_every_balanced_line() {
        let chunks = split("a();\nb();\nc();", "run", 5);
        assert_eq!(codes(&chunks), vec!["a();\n", "b();\n", "c();"]);
        assert_eq!(spans(&chunks), vec![(1, 1), (2, 2), (3, 3)]);
        assert_eq!(
            chunks.iter().map(|c| c.chunk_id.as_str()).collect::<Vec<_>>(),
            vec!["run-chunk-0", "run-chunk-1", "run-chunk-2"]
        );
    }

    #[test]
    fn test_keeps_function_body_together() {
        let text = "function f() {\n  x();\n}\n";
        let chunks = split(text, "run", 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].code, text);
        assert_eq!(spans(&chunks), vec![(1, 4)]);
        assert_eq!(chunks[0].line_count, 4);
    }

    #[test]
    fn test_closing_brace_stays_with_body() {
        let text = "fn a() {\n    one();\n}\nfn b() {\n    two();\n}";
        let chunks = split(text, "run", 12);
        assert_eq!(
            codes(&chunks),
            vec!["fn a() {\n    one();\n}\n", "fn b() {\n    two();\n}"]
        );
        assert_eq!(spans(&chunks), vec![(1, 3), (4, 6)]);
    }

    #[test]
    fn test_multiline_call_not_cut() {
        let text = "call(\n  aaaaaaaa,\n  bbbbbbbb\n);\nnext();";
        let chunks = split(text, "run", 8);
        assert_eq!(
            codes(&chunks),
            vec!["call(\n  aaaaaaaa,\n  bbbbbbbb\n);\n", "next();"]
        );
    }

    #[test]
    fn test_accumulates_until_limit() {
        let text = "a;\nb;\nc;\nd;\ne;";
        // Each line is 3 characters with its separator.
        let chunks = split(text, "run", 6);
        assert_eq!(codes(&chunks), vec!["a;\nb;\n", "c;\nd;\n", "e;"]);
        assert_eq!(spans(&chunks), vec![(1, 2), (3, 4), (5, 5)]);
    }

    #[test]
    fn test_oversized_line_is_not_cut() {
        let long = "x".repeat(50);
        let text = format!("a;\n{long}\nb;");
        let chunks = split(&text, "run", 10);
        let long_line = format!("{long}\n");
        assert_eq!(codes(&chunks), vec!["a;\n", long_line.as_str(), "b;"]);
        assert!(chunks[1].exceeds(10));
    }

    #[test]
    fn test_unclosed_brace_yields_single_chunk() {
        let mut text = String::from("class A {\n");
        for i in 0..50 {
            text.push_str(&format!("    field{i}();\n"));
        }
        let (chunks, report) = split_with_report(&text, "run", 20);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].code, text);
        assert_eq!(chunks[0].end_line, 52);
        assert!(report.is_degenerate());
        assert_eq!(report.final_depth, NestingDepth { braces: 1, parens: 0 });
    }

    #[test]
    fn test_balanced_oversized_input_not_degenerate() {
        let one_liner = "f();".repeat(20);
        let (chunks, report) = split_with_report(&one_liner, "run", 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(report.split_points, 0);
        assert!(!report.is_degenerate());

        let block = "class A {\n    a();\n    b();\n    c();\n}";
        let (chunks, report) = split_with_report(block, "run", 10);
        assert_eq!(codes(&chunks), vec![block]);
        assert_eq!(report.split_points, 0);
        assert!(report.final_depth.is_balanced());
        assert!(!report.is_degenerate());
    }

    #[test]
    fn test_negative_depth_tolerated() {
        let text = "}\na;\nb;";
        let (chunks, report) = split_with_report(text, "run", 2);
        assert_eq!(chunks.len(), 1);
        assert_eq!(report.final_depth.braces, -1);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let (chunks, report) = split_with_report("", "run", 10);
        assert!(chunks.is_empty());
        assert_eq!(report, StructureReport::default());
    }

    #[test]
    fn test_blank_lines_preserved() {
        let text = "a;\n\n\nb;\n";
        let chunks = split(text, "run", 3);
        assert_eq!(codes(&chunks), vec!["a;\n", "\n\n", "b;\n"]);
        assert_eq!(spans(&chunks), vec![(1, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn test_crlf_kept_inside_lines() {
        let text = "a();\r\nb();\r\n";
        let chunks = split(text, "run", 6);
        assert_eq!(codes(&chunks), vec!["a();\r\n", "b();\r\n"]);
    }

    #[test]
    fn test_nesting_depth_advance() {
        let depth = NestingDepth::default().advance("if (a) { b(c(");
        assert_eq!(depth, NestingDepth { braces: 1, parens: 2 });
        let depth = depth.advance(")) }");
        assert!(depth.is_balanced());
    }

    fn arb_code() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z{}();\\n ]{0,12}", 0..30).prop_map(|parts| parts.concat())
    }

    proptest! {
        #[test]
        fn proptest_round_trip_and_contiguity(text in arb_code(), limit in 1usize..40) {
            prop_assume!(!text.is_empty());
            let chunks = split(&text, "p", limit);

            let rebuilt: String = chunks.iter().map(|c| c.code.as_str()).collect();
            prop_assert_eq!(&rebuilt, &text);

            let total_lines = text.matches('\n').count() + 1;
            prop_assert_eq!(chunks[0].start_line, 1);
            prop_assert_eq!(chunks[chunks.len() - 1].end_line, total_lines);
            for pair in chunks.windows(2) {
                prop_assert_eq!(pair[0].end_line + 1, pair[1].start_line);
            }

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
                prop_assert!(!chunk.code.is_empty());
                prop_assert_eq!(chunk.size, chunk.code.chars().count());
                prop_assert_eq!(chunk.line_count, chunk.end_line - chunk.start_line + 1);
                let separators = chunk.code.matches('\n').count();
                let expected = if i + 1 == chunks.len() { separators + 1 } else { separators };
                prop_assert_eq!(chunk.line_count, expected);
            }
        }

        #[test]
        fn proptest_long_line_lands_in_one_chunk(len in 20usize..80, limit in 1usize..20) {
            let long = "z".repeat(len);
            let text = format!("a;\n{long}\nb;");
            let chunks = split(&text, "p", limit);
            let holders: Vec<_> = chunks.iter().filter(|c| c.code.contains(&long)).collect();
            prop_assert_eq!(holders.len(), 1);
        }
    }
}
