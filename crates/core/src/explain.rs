//! Post-answer explanations.
//!
//! Learners at level 2 or below get a pictorial explanation; higher levels get the
//! operation laid out in columns.

use crate::model::{Operation, PreparedQuestion};

/// Highest skill level that still receives pictorial explanations.
pub const PICTORIAL_MAX_LEVEL: u32 = 2;
/// Multiplication is explainable while the product stays below this.
pub const PRODUCT_LIMIT: i64 = 20;
/// Division is explainable while the dividend stays at or below this.
pub const DIVIDEND_LIMIT: i64 = 20;

const MARKER: char = '●';
const REMOVED_MARKER: char = '○';
const COUNTING_MARKER_LIMIT: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    /// `rows` groups of `columns` markers; `columns` is always the smaller factor.
    Grid { rows: u32, columns: u32 },
    /// `total` markers dealt into `groups` equal groups of `per_group`.
    FairShare { total: u32, groups: u32, per_group: u32 },
    /// Count markers for addition or subtraction.
    Counting {
        operation: Operation,
        first: i64,
        second: i64,
        result: i64,
    },
    /// Vertical arithmetic.
    Column {
        first: i64,
        second: i64,
        operation: Operation,
        result: i64,
    },
}

/// Integer operands of an explainable question, or `None`.
fn explainable_operands(question: &PreparedQuestion) -> Option<(i64, i64)> {
    if question.is_fraction() {
        return None;
    }
    let first = question.first().as_whole()?;
    let second = question.second().as_whole()?;

    let explainable = match question.operation() {
        Operation::Add | Operation::Subtract => true,
        Operation::Multiply => {
            first >= 0
                && second >= 0
                && Operation::Multiply
                    .apply(first, second)
                    .is_some_and(|product| product < PRODUCT_LIMIT)
        }
        Operation::Divide => {
            (0..=DIVIDEND_LIMIT).contains(&first)
                && second > 0
                && Operation::Divide.apply(first, second).is_some()
        }
    };
    explainable.then_some((first, second))
}

#[must_use]
pub fn is_explainable(question: &PreparedQuestion) -> bool {
    explainable_operands(question).is_some()
}

/// Pick the explanation for a question at the learner's level.
#[must_use]
pub fn select(question: &PreparedQuestion, level: u32) -> Option<Explanation> {
    let (first, second) = explainable_operands(question)?;
    let operation = question.operation();
    let result = operation.apply(first, second)?;

    let column = Explanation::Column {
        first,
        second,
        operation,
        result,
    };
    if level > PICTORIAL_MAX_LEVEL {
        return Some(column);
    }
    Some(pictorial(operation, first, second, result).unwrap_or(column))
}

/// Marker picture for the operation, or `None` when markers cannot show it: a zero
/// factor, an empty dividend, or a negative count.
fn pictorial(operation: Operation, first: i64, second: i64, result: i64) -> Option<Explanation> {
    match operation {
        Operation::Multiply => {
            let larger = u32::try_from(first.max(second)).ok()?;
            let smaller = u32::try_from(first.min(second)).ok().filter(|&n| n > 0)?;
            Some(Explanation::Grid {
                rows: larger,
                columns: smaller,
            })
        }
        Operation::Divide => Some(Explanation::FairShare {
            total: u32::try_from(first).ok().filter(|&n| n > 0)?,
            groups: u32::try_from(second).ok()?,
            per_group: u32::try_from(result).ok()?,
        }),
        Operation::Add | Operation::Subtract => {
            if first < 0 || second < 0 || result < 0 {
                return None;
            }
            Some(Explanation::Counting {
                operation,
                first,
                second,
                result,
            })
        }
    }
}

impl Explanation {
    #[must_use]
    pub fn is_pictorial(&self) -> bool {
        !matches!(self, Explanation::Column { .. })
    }

    /// Plain-text rendering, one string per line.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        match *self {
            Explanation::Grid { rows, columns } => {
                let row = markers(i64::from(columns));
                let mut lines: Vec<String> = (0..rows).map(|_| row.clone()).collect();
                lines.push(format!("{rows} × {columns} = {}", rows * columns));
                lines
            }
            Explanation::FairShare {
                total,
                groups,
                per_group,
            } => {
                let mut lines = vec![format!("{total} ÷ {groups}:")];
                lines.extend(
                    (1..=groups).map(|group| format!("{group}: {}", markers(i64::from(per_group)))),
                );
                lines.push(format!("= {per_group}"));
                lines
            }
            Explanation::Counting {
                operation: Operation::Subtract,
                first,
                second,
                result,
            } => {
                let kept = result.max(0);
                let removed = first.min(second).max(0);
                vec![
                    format!("{}{}", markers(kept), removed_markers(removed)),
                    format!("{first} - {second} = {result}"),
                ]
            }
            Explanation::Counting {
                operation,
                first,
                second,
                result,
            } => vec![
                markers(first),
                format!("{} {}", operation.glyph(), markers(second)),
                format!("= {}", markers(result)),
                format!("{first} {} {second} = {result}", operation.glyph()),
            ],
            Explanation::Column {
                first,
                second,
                operation,
                result,
            } => {
                let width = [first, second, result]
                    .iter()
                    .map(|value| value.to_string().chars().count())
                    .max()
                    .unwrap_or(1);
                vec![
                    format!("  {first:>width$}"),
                    format!("{} {second:>width$}", operation.glyph()),
                    "-".repeat(width + 2),
                    format!("  {result:>width$}"),
                ]
            }
        }
    }
}

fn markers(count: i64) -> String {
    if count > COUNTING_MARKER_LIMIT {
        format!("{count}{MARKER}")
    } else {
        std::iter::repeat_n(MARKER, usize::try_from(count).unwrap_or(0)).collect()
    }
}

fn removed_markers(count: i64) -> String {
    if count > COUNTING_MARKER_LIMIT {
        format!("{count}{REMOVED_MARKER}")
    } else {
        std::iter::repeat_n(REMOVED_MARKER, usize::try_from(count).unwrap_or(0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::prepared;

    #[test]
    fn multiplication_grid_groups_by_smaller_operand() {
        let question = prepared(3, "×", 5, [15, 8, 12, 20], 15);
        let explanation = select(&question, 1).unwrap();
        assert_eq!(explanation, Explanation::Grid { rows: 5, columns: 3 });

        let swapped = prepared(5, "×", 3, [15, 8, 12, 20], 15);
        assert_eq!(select(&swapped, 2), Some(explanation.clone()));

        let lines = explanation.render_lines();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "●●●");
        assert_eq!(lines[5], "5 × 3 = 15");
    }

    #[test]
    fn multiplication_product_limit() {
        assert!(is_explainable(&prepared(4, "×", 4, [16, 8, 12, 20], 16)));
        assert!(!is_explainable(&prepared(4, "×", 5, [20, 9, 16, 25], 20)));
    }

    #[test]
    fn division_must_be_exact_and_small() {
        let question = prepared(12, "÷", 4, [3, 4, 2, 6], 3);
        assert_eq!(
            select(&question, 0),
            Some(Explanation::FairShare {
                total: 12,
                groups: 4,
                per_group: 3
            })
        );
        assert!(is_explainable(&prepared(20, "÷", 5, [4, 5, 3, 6], 4)));
        assert!(!is_explainable(&prepared(21, "÷", 3, [7, 5, 3, 6], 7)));
        assert!(!is_explainable(&prepared(13, "÷", 4, [3, 4, 2, 6], 3)));
    }

    #[test]
    fn addition_and_subtraction_count() {
        let question = prepared(4, "+", 3, [7, 6, 8, 5], 7);
        let explanation = select(&question, 2).unwrap();
        assert!(explanation.is_pictorial());
        let lines = explanation.render_lines();
        assert_eq!(lines[0], "●●●●");
        assert_eq!(lines[3], "4 + 3 = 7");

        let question = prepared(5, "-", 2, [3, 2, 4, 7], 3);
        let lines = select(&question, 1).unwrap().render_lines();
        assert_eq!(lines[0], "●●●○○");
        assert_eq!(lines[1], "5 - 2 = 3");
    }

    #[test]
    fn higher_levels_get_column_layout() {
        let question = prepared(12, "+", 7, [19, 18, 20, 17], 19);
        let explanation = select(&question, 3).unwrap();
        assert!(!explanation.is_pictorial());
        assert_eq!(
            explanation.render_lines(),
            vec!["  12", "+  7", "----", "  19"]
        );
    }

    #[test]
    fn zero_factor_uses_column_layout() {
        let question = prepared(0, "×", 5, [0, 5, 1, 6], 0);
        let explanation = select(&question, 1).unwrap();
        assert!(!explanation.is_pictorial());
        assert_eq!(explanation.render_lines(), vec!["  0", "× 5", "---", "  0"]);

        let question = prepared(0, "÷", 4, [0, 4, 1, 2], 0);
        assert!(!select(&question, 2).unwrap().is_pictorial());
    }

    #[test]
    fn negative_counts_use_column_layout() {
        let question = prepared(3, "-", 5, [-2, 2, 8, -8], -2);
        let explanation = select(&question, 1).unwrap();
        assert_eq!(
            explanation,
            Explanation::Column {
                first: 3,
                second: 5,
                operation: Operation::Subtract,
                result: -2,
            }
        );
        assert_eq!(explanation.render_lines(), vec!["   3", "-  5", "----", "  -2"]);

        let question = prepared(-3, "+", 5, [2, -2, 8, -8], 2);
        assert!(!select(&question, 0).unwrap().is_pictorial());
    }

    #[test]
    fn fractions_are_not_explained() {
        let question = prepared("1/2", "fracAdd", "1/2", [1001, 2004, 1002, 2002], 1001);
        assert!(!is_explainable(&question));
        assert_eq!(select(&question, 1), None);
    }
}
