//! Splitting source text into records and fields.
//!
//! A record is one non-blank, non-comment line. Fields are separated by `;`
//! and trimmed; empty fields are dropped, so `B;End;` has two fields.

use crate::span::Span;

/// Marks a line as a comment when it is the first non-blank character.
pub(crate) const COMMENT_MARKER: char = '#';

/// Separates the fields of a record.
pub(crate) const FIELD_SEPARATOR: char = ';';

/// A trimmed, non-empty field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field<'src> {
    pub(crate) text: &'src str,
    pub(crate) span: Span,
}

/// One record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record<'src> {
    /// Span of the trimmed line.
    pub(crate) span: Span,
    pub(crate) fields: Vec<Field<'src>>,
}

/// Iterates over the records of `source` in line order.
pub(crate) fn records(source: &str) -> impl Iterator<Item = Record<'_>> {
    let mut offset = 0;

    source.split_inclusive('\n').filter_map(move |raw_line| {
        let line_start = offset;
        offset += raw_line.len();

        let line = raw_line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            return None;
        }

        let mut fields = Vec::new();
        let mut segment_start = line_start;
        for segment in line.split(FIELD_SEPARATOR) {
            let text = segment.trim();
            if !text.is_empty() {
                let start = segment_start + (segment.len() - segment.trim_start().len());
                fields.push(Field {
                    text,
                    span: Span::new(start..start + text.len()),
                });
            }
            segment_start += segment.len() + FIELD_SEPARATOR.len_utf8();
        }

        let start = line_start + (line.len() - line.trim_start().len());
        Some(Record {
            span: Span::new(start..start + trimmed.len()),
            fields,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_texts<'a>(record: &Record<'a>) -> Vec<&'a str> {
        record.fields.iter().map(|field| field.text).collect()
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let source = "# header\n\n   \nA;Start;B\n  # indented comment\nB;End;\n";
        let records: Vec<_> = records(source).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(field_texts(&records[0]), vec!["A", "Start", "B"]);
        assert_eq!(field_texts(&records[1]), vec!["B", "End"]);
    }

    #[test]
    fn test_drops_empty_fields() {
        let records: Vec<_> = records("A;;Start; ;B;").collect();

        assert_eq!(field_texts(&records[0]), vec!["A", "Start", "B"]);
    }

    #[test]
    fn test_field_spans_point_into_source() {
        let source = "X;x\r\n  D1 ; Check ; [yes] -> A\n";
        let records: Vec<_> = records(source).collect();

        for record in &records {
            for field in &record.fields {
                assert_eq!(field.span.slice(source), field.text);
            }
        }
        assert_eq!(records[1].span.slice(source), "D1 ; Check ; [yes] -> A");
    }

    #[test]
    fn test_last_line_without_newline() {
        let records: Vec<_> = records("A;Start;B\nB;End").collect();

        assert_eq!(records.len(), 2);
        assert_eq!(field_texts(&records[1]), vec!["B", "End"]);
    }
}
