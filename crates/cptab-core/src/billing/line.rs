//! Classification of a single billing text line.

use crate::models::record::BillingRecord;

use super::rules::{
    extract_diagnosis_codes, extract_modifier, FieldExtractor, ProcedureCodeExtractor,
    ServiceDateExtractor, ASSOCIATED_DX_MARKER,
};

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` into lines.
///
/// Besides `\n` and `\r\n` this breaks on a lone `\r`, vertical tab, form
/// feed, the file/group/record separators, NEL and the Unicode line and
/// paragraph separators. A trailing break does not yield an empty last line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let Some(pos) = rest.find(is_line_break) else {
            let line = rest;
            rest = "";
            return Some(line);
        };

        let line = &rest[..pos];
        let tail = &rest[pos..];
        let break_len = if tail.starts_with("\r\n") {
            2
        } else {
            tail.chars().next().map_or(1, char::len_utf8)
        };
        rest = &tail[break_len..];
        Some(line)
    })
}

/// Fields of a line that qualified as a procedure line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureLine {
    pub date: String,
    pub procedure_code: String,
    pub modifier: String,
    pub description: String,
}

impl ProcedureLine {
    /// Open a new record from this line.
    pub fn into_record(self) -> BillingRecord {
        BillingRecord::new(self.date, self.procedure_code, self.modifier, self.description)
    }
}

/// What a line is, independent of any parsing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Empty after trimming.
    Blank,
    /// Carries both a procedure code and a date.
    Procedure(ProcedureLine),
    /// Carries the association marker; `codes` may be empty.
    Association { codes: Vec<String> },
    /// Anything else.
    Noise,
}

/// Line classifier.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    association_marker: String,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            association_marker: ASSOCIATED_DX_MARKER.to_string(),
        }
    }

    /// Use a different phrase to recognize association lines.
    pub fn with_association_marker(mut self, marker: impl Into<String>) -> Self {
        self.association_marker = marker.into();
        self
    }

    pub fn association_marker(&self) -> &str {
        &self.association_marker
    }

    /// Classify one raw line. Surrounding whitespace is ignored.
    ///
    /// A line holding both a procedure code and a date is a procedure line
    /// even when it also contains the association marker.
    pub fn classify(&self, raw: &str) -> LineClass {
        let line = raw.trim();
        if line.is_empty() {
            return LineClass::Blank;
        }

        let code = ProcedureCodeExtractor::new().extract(line);
        let date = ServiceDateExtractor::new().extract(line);

        if let (Some(code), Some(date)) = (code, date) {
            let description = line
                .find(code.as_str())
                .map(|pos| line[..pos].trim())
                .unwrap_or_default()
                .to_string();

            let modifier = extract_modifier(line, date.as_str())
                .map(|m| m.value)
                .unwrap_or_default();

            return LineClass::Procedure(ProcedureLine {
                date: date.value,
                procedure_code: code.value,
                modifier,
                description,
            });
        }

        if !self.association_marker.is_empty() && line.contains(&self.association_marker) {
            return LineClass::Association {
                codes: extract_diagnosis_codes(line),
            };
        }

        LineClass::Noise
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_lines_breaks() {
        let lines: Vec<_> =
            split_lines("a\r\nb\rc\nd\u{2028}e\u{2029}f\x0bg\x0ch\u{85}i\x1dj\n").collect();

        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
    }

    #[test]
    fn test_split_lines_keeps_empty_lines() {
        let lines: Vec<_> = split_lines("a\n\n\r\rb").collect();

        assert_eq!(lines, vec!["a", "", "", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn test_procedure_line() {
        let class = LineClassifier::new().classify("  Office visit 99213 03/14/2024 GC  ");

        assert_eq!(
            class,
            LineClass::Procedure(ProcedureLine {
                date: "03/14/2024".to_string(),
                procedure_code: "99213".to_string(),
                modifier: "GC".to_string(),
                description: "Office visit".to_string(),
            })
        );
    }

    #[test]
    fn test_code_without_date_is_noise() {
        assert_eq!(LineClassifier::new().classify("Office visit 99213"), LineClass::Noise);
    }

    #[test]
    fn test_date_without_code_is_noise() {
        assert_eq!(
            LineClassifier::new().classify("Seen 03/14/2024 for follow up"),
            LineClass::Noise
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(LineClassifier::new().classify(" \t "), LineClass::Blank);
    }

    #[test]
    fn test_association_line() {
        assert_eq!(
            LineClassifier::new().classify("Associated Dx [I10], [E78.5]"),
            LineClass::Association {
                codes: vec!["I10".to_string(), "E78.5".to_string()]
            }
        );
    }

    #[test]
    fn test_association_line_without_codes() {
        assert_eq!(
            LineClassifier::new().classify("Associated Dx: none documented"),
            LineClass::Association { codes: vec![] }
        );
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert_eq!(
            LineClassifier::new().classify("associated dx [I10]"),
            LineClass::Noise
        );
    }

    #[test]
    fn test_procedure_wins_over_association() {
        let class = LineClassifier::new().classify("Associated Dx [I10] 99213 03/14/2024");

        match class {
            LineClass::Procedure(line) => {
                assert_eq!(line.description, "Associated Dx [I10]");
                assert_eq!(line.modifier, "");
            }
            other => panic!("expected procedure line, got {:?}", other),
        }
    }

    #[test]
    fn test_date_before_code() {
        let class = LineClassifier::new().classify("03/14/2024 GC Office visit 99213");

        match class {
            LineClass::Procedure(line) => {
                assert_eq!(line.date, "03/14/2024");
                assert_eq!(line.procedure_code, "99213");
                assert_eq!(line.modifier, "GC");
                assert_eq!(line.description, "03/14/2024 GC Office visit");
            }
            other => panic!("expected procedure line, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_marker() {
        let classifier = LineClassifier::new().with_association_marker("Linked ICD");

        assert_eq!(
            classifier.classify("Linked ICD [J45.909]"),
            LineClass::Association {
                codes: vec!["J45.909".to_string()]
            }
        );
        assert_eq!(classifier.classify("Associated Dx [I10]"), LineClass::Noise);
    }
}
