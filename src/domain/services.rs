//! Row evaluation services for the calculator notebook.
//!
//! This module implements the per-sheet recompute pass: every edit to any
//! row re-evaluates the whole sheet from the first row down, rebuilding the
//! variable bindings as it goes. A row is either an assignment
//! (`x = 2 + 3`), which binds a variable, or a query (`x * 2?`), which just
//! displays a value. Double-quoted segments are comments and never reach
//! the evaluator.

use super::models::{RowResult, Sheet};
use super::parser::{is_identifier, Bindings, ExpressionEvaluator, Parser};
use crate::domain::errors::EvalResult;

/// Trailing markers that force a row to be treated as a query. The
/// full-width variant matters for CJK input methods.
const QUERY_MARKERS: [char; 2] = ['?', '？'];

/// Returns the byte spans (quotes included) of every paired `"..."`
/// segment in `text`. An unpaired trailing quote is not a comment.
///
/// The same spans drive both comment stripping before evaluation and the
/// comment highlighting in the row display.
pub fn comment_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;

    for (index, ch) in text.char_indices() {
        if ch != '"' {
            continue;
        }
        match open {
            None => open = Some(index),
            Some(start) => {
                spans.push((start, index + ch.len_utf8()));
                open = None;
            }
        }
    }

    spans
}

/// Removes every paired `"..."` segment from `text`.
pub fn strip_comments(text: &str) -> String {
    let spans = comment_spans(text);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in spans {
        result.push_str(&text[cursor..start]);
        cursor = end;
    }
    result.push_str(&text[cursor..]);
    result
}

/// The per-sheet recompute engine.
///
/// The whole sheet is re-evaluated top to bottom on every change; bindings
/// are an explicit value built during the pass, so each row only ever sees
/// variables defined by strictly earlier rows. A failing row renders the
/// error marker and never aborts the rest of the pass.
///
/// # Examples
///
/// ```
/// use varcalc::domain::{RowResult, SheetEvaluator};
///
/// let rows = vec!["x = 2 + 3".to_string(), "x * 2?".to_string()];
/// let (results, bindings) = SheetEvaluator::evaluate_rows(&rows);
///
/// assert_eq!(results[0], RowResult::Binding("x".to_string(), 5.0));
/// assert_eq!(results[1], RowResult::Value(10.0));
/// assert_eq!(bindings.get("x"), Some(5.0));
/// ```
pub struct SheetEvaluator;

impl SheetEvaluator {
    /// Recomputes all cached results of `sheet` in place.
    pub fn recompute(sheet: &mut Sheet) {
        let texts = sheet.row_texts();
        let (results, _) = Self::evaluate_rows(&texts);
        for (row, result) in sheet.rows.iter_mut().zip(results) {
            row.result = result;
        }
    }

    /// Evaluates `texts` top to bottom with a fresh set of bindings.
    ///
    /// Returns the per-row results and the bindings accumulated by the end
    /// of the pass.
    pub fn evaluate_rows(texts: &[String]) -> (Vec<RowResult>, Bindings) {
        let mut bindings = Bindings::new();
        let results = texts
            .iter()
            .map(|text| Self::evaluate_row(text, &mut bindings))
            .collect();
        (results, bindings)
    }

    /// Evaluates a single row against the bindings accumulated so far.
    ///
    /// An assignment that evaluates successfully adds or overwrites its
    /// binding; any failure leaves `bindings` untouched.
    pub fn evaluate_row(text: &str, bindings: &mut Bindings) -> RowResult {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RowResult::Unknown;
        }

        let stripped = strip_comments(trimmed);
        let calc = stripped.trim();

        // Assignment: has an '=' and is not marked as a query.
        if let Some(split_at) = calc.find('=') {
            if !calc.ends_with(QUERY_MARKERS) {
                let name = calc[..split_at].trim();
                let value_expr = calc[split_at + 1..].trim();

                if !is_identifier(name) {
                    return RowResult::Error;
                }
                return match Self::evaluate_expression(value_expr, bindings) {
                    Ok(value) => {
                        bindings.set(name, value);
                        RowResult::Binding(name.to_string(), value)
                    }
                    Err(_) => RowResult::Error,
                };
            }
        }

        let expr = calc.trim_end_matches(QUERY_MARKERS).trim();
        match Self::evaluate_expression(expr, bindings) {
            Ok(value) => RowResult::Value(value),
            Err(_) => RowResult::Error,
        }
    }

    /// Parses and evaluates one expression string.
    fn evaluate_expression(expr: &str, bindings: &Bindings) -> EvalResult<f64> {
        let mut parser = Parser::new(expr)?;
        let ast = parser.parse()?;
        ExpressionEvaluator::new(bindings).evaluate(&ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results_of(texts: &[&str]) -> (Vec<RowResult>, Bindings) {
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        SheetEvaluator::evaluate_rows(&owned)
    }

    #[test]
    fn test_empty_row_is_unknown() {
        let (results, bindings) = results_of(&["", "   ", "\t"]);
        assert_eq!(
            results,
            vec![RowResult::Unknown, RowResult::Unknown, RowResult::Unknown]
        );
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_assignment_binds_and_renders() {
        let (results, bindings) = results_of(&["x = 2 + 3"]);
        assert_eq!(results[0], RowResult::Binding("x".to_string(), 5.0));
        assert_eq!(results[0].display(), "x → 5");
        assert_eq!(bindings.get("x"), Some(5.0));
    }

    #[test]
    fn test_query_uses_earlier_binding() {
        let (results, _) = results_of(&["x = 5", "x * 2?"]);
        assert_eq!(results[1], RowResult::Value(10.0));
        assert_eq!(results[1].display(), "10");
    }

    #[test]
    fn test_fullwidth_query_marker() {
        let (results, _) = results_of(&["x = 5", "x * 2？"]);
        assert_eq!(results[1], RowResult::Value(10.0));
    }

    #[test]
    fn test_query_without_marker() {
        let (results, _) = results_of(&["2 + 2"]);
        assert_eq!(results[0], RowResult::Value(4.0));
    }

    #[test]
    fn test_unbound_variable_is_error_and_leaves_bindings_alone() {
        let (results, bindings) = results_of(&["y + 1"]);
        assert_eq!(results[0], RowResult::Error);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let (results, bindings) = results_of(&["a + 1", "a = 3"]);
        assert_eq!(results[0], RowResult::Error);
        assert_eq!(results[1], RowResult::Binding("a".to_string(), 3.0));
        assert_eq!(bindings.get("a"), Some(3.0));
    }

    #[test]
    fn test_error_does_not_abort_later_rows() {
        let (results, _) = results_of(&["1 / 0?", "x = 2", "x + 1?"]);
        assert_eq!(results[0], RowResult::Error);
        assert_eq!(results[1], RowResult::Binding("x".to_string(), 2.0));
        assert_eq!(results[2], RowResult::Value(3.0));
    }

    #[test]
    fn test_failed_assignment_leaves_bindings_alone() {
        let (results, bindings) = results_of(&["x = y + 1"]);
        assert_eq!(results[0], RowResult::Error);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_reassignment_sees_previous_value() {
        let (results, bindings) = results_of(&["x = 1", "x = x + 1", "x?"]);
        assert_eq!(results[1], RowResult::Binding("x".to_string(), 2.0));
        assert_eq!(results[2], RowResult::Value(2.0));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_numeric_assignment_target_is_error() {
        let (results, bindings) = results_of(&["2 = 3"]);
        assert_eq!(results[0], RowResult::Error);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_assignment_ending_with_marker_is_a_query() {
        // `x = 5` earlier, then `x = 5?` asks rather than binds; the '='
        // makes the remaining expression malformed.
        let (results, _) = results_of(&["x = 5?"]);
        assert_eq!(results[0], RowResult::Error);
    }

    #[test]
    fn test_comment_is_excluded_from_evaluation() {
        let (results, _) = results_of(&["2+2 \"note\""]);
        assert_eq!(results[0], RowResult::Value(4.0));
    }

    #[test]
    fn test_comment_in_assignment() {
        let (results, bindings) = results_of(&["x = 1 + 2 \"three\""]);
        assert_eq!(results[0], RowResult::Binding("x".to_string(), 3.0));
        assert_eq!(bindings.get("x"), Some(3.0));
    }

    #[test]
    fn test_comment_only_row_is_error() {
        let (results, _) = results_of(&["\"just a note\""]);
        assert_eq!(results[0], RowResult::Error);
    }

    #[test]
    fn test_unicode_variable_names() {
        let (results, _) = results_of(&["总价 = 3 * 4", "总价 / 2?"]);
        assert_eq!(results[0], RowResult::Binding("总价".to_string(), 12.0));
        assert_eq!(results[1], RowResult::Value(6.0));
    }

    #[test]
    fn test_comment_spans_positions() {
        let spans = comment_spans("2+2 \"note\" + 1");
        assert_eq!(spans, vec![(4, 10)]);

        let spans = comment_spans("\"a\" \"b\"");
        assert_eq!(spans, vec![(0, 3), (4, 7)]);

        // Unpaired quote is not a comment
        assert!(comment_spans("2 + \"oops").is_empty());
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("2+2 \"note\""), "2+2 ");
        assert_eq!(strip_comments("\"a\"1\"b\"2"), "12");
        assert_eq!(strip_comments("no comments"), "no comments");
        assert_eq!(strip_comments("2 + \"oops"), "2 + \"oops");
    }

    #[test]
    fn test_decimal_display() {
        let (results, _) = results_of(&["1 / 3?"]);
        assert_eq!(results[0].display(), "0.3333333333333333");
    }

    #[test]
    fn test_recompute_updates_sheet_in_place() {
        let mut sheet = crate::domain::Sheet::from_texts(
            "Sheet1",
            vec!["a = 2".to_string(), "a * a?".to_string(), String::new()],
        );
        SheetEvaluator::recompute(&mut sheet);

        assert_eq!(sheet.rows[0].result, RowResult::Binding("a".to_string(), 2.0));
        assert_eq!(sheet.rows[1].result, RowResult::Value(4.0));
        assert_eq!(sheet.rows[2].result, RowResult::Unknown);
    }
}
