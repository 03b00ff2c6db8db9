use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

use crate::codec::{self, EncodedValue};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("unknown operation sign: {0:?}")]
    UnknownSign(String),

    #[error("operand is neither an integer nor a fraction literal: {0}")]
    InvalidOperand(String),

    #[error("correct answer must appear exactly once among the answers, found {count}")]
    CorrectAnswerCount { count: usize },
}

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

/// Operand exactly as the backend sent it: a JSON number or a `"n/d"` literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireOperand {
    Number(Number),
    Text(String),
}

impl From<i64> for WireOperand {
    fn from(value: i64) -> Self {
        WireOperand::Number(Number::from(value))
    }
}

impl From<&str> for WireOperand {
    fn from(value: &str) -> Self {
        WireOperand::Text(value.to_string())
    }
}

/// A question as returned by the exercise endpoints.
///
/// Fields this client does not interpret are kept in `extra` so the payload can be
/// sent back verbatim when the answer is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub first: WireOperand,
    pub second: WireOperand,
    pub operation_sign: String,
    pub answers: [EncodedValue; 4],
    pub correct_answer: EncodedValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//
// ─── OPERANDS & OPERATIONS ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Whole(i64),
    Fraction { numerator: i64, denominator: i64 },
}

impl Operand {
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOperand` for non-integral numbers and
    /// strings that are not `"n"` or `"n/d"`.
    pub fn parse(raw: &WireOperand) -> Result<Self, QuestionError> {
        match raw {
            WireOperand::Number(number) => number
                .as_i64()
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|value| value.fract() == 0.0 && value.abs() < 9.0e15)
                        .map(|value| value as i64)
                })
                .map(Operand::Whole)
                .ok_or_else(|| QuestionError::InvalidOperand(number.to_string())),
            WireOperand::Text(text) => parse_literal(text),
        }
    }

    #[must_use]
    pub fn as_whole(self) -> Option<i64> {
        match self {
            Operand::Whole(value) => Some(value),
            Operand::Fraction { .. } => None,
        }
    }

    #[must_use]
    pub fn is_fraction(self) -> bool {
        matches!(self, Operand::Fraction { .. })
    }
}

fn parse_literal(text: &str) -> Result<Operand, QuestionError> {
    let invalid = || QuestionError::InvalidOperand(format!("{text:?}"));
    let trimmed = text.trim();
    match trimmed.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<i64>().map_err(|_| invalid())?;
            let denominator = denominator.trim().parse::<i64>().map_err(|_| invalid())?;
            Ok(Operand::Fraction {
                numerator,
                denominator,
            })
        }
        None => trimmed.parse::<i64>().map(Operand::Whole).map_err(|_| invalid()),
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Whole(value) => write!(f, "{value}"),
            Operand::Fraction {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Parse a sign token. The second value is true for the legacy `frac*` tokens,
    /// which mark the question as fraction-typed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownSign` for any other token.
    pub fn from_sign(token: &str) -> Result<(Self, bool), QuestionError> {
        let parsed = match token.trim() {
            "+" => (Operation::Add, false),
            "-" | "−" => (Operation::Subtract, false),
            "×" | "*" | "x" => (Operation::Multiply, false),
            "÷" | "/" | ":" => (Operation::Divide, false),
            "fracAdd" => (Operation::Add, true),
            "fracSub" => (Operation::Subtract, true),
            "fracMul" => (Operation::Multiply, true),
            "fracDiv" => (Operation::Divide, true),
            other => return Err(QuestionError::UnknownSign(other.to_string())),
        };
        Ok(parsed)
    }

    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "×",
            Operation::Divide => "÷",
        }
    }

    /// Integer result of the operation. `None` on overflow, a zero divisor, or a
    /// division that leaves a remainder.
    #[must_use]
    pub fn apply(self, left: i64, right: i64) -> Option<i64> {
        match self {
            Operation::Add => left.checked_add(right),
            Operation::Subtract => left.checked_sub(right),
            Operation::Multiply => left.checked_mul(right),
            Operation::Divide => {
                if right == 0 || left.checked_rem(right)? != 0 {
                    None
                } else {
                    left.checked_div(right)
                }
            }
        }
    }
}

//
// ─── PREPARED QUESTION ─────────────────────────────────────────────────────────
//

/// A validated question ready to be shown and answered.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedQuestion {
    wire: Question,
    first: Operand,
    second: Operand,
    operation: Operation,
    is_fraction: bool,
    text: String,
    answer_labels: [String; 4],
    correct_index: usize,
}

impl PreparedQuestion {
    /// Normalize a wire question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for unknown signs, unparsable operands, or when
    /// `correct_answer` does not occur exactly once in `answers`.
    pub fn prepare(wire: Question) -> Result<Self, QuestionError> {
        let (operation, legacy_fraction) = Operation::from_sign(&wire.operation_sign)?;
        let first = Operand::parse(&wire.first)?;
        let second = Operand::parse(&wire.second)?;

        let matches: Vec<usize> = wire
            .answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| **answer == wire.correct_answer)
            .map(|(index, _)| index)
            .collect();
        let [correct_index] = matches.as_slice() else {
            return Err(QuestionError::CorrectAnswerCount {
                count: matches.len(),
            });
        };
        let correct_index = *correct_index;

        let is_fraction = legacy_fraction || first.is_fraction() || second.is_fraction();
        let text = wire
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or_else(
                || format!("{first} {} {second} = ?", operation.glyph()),
                str::to_string,
            );
        let answer_labels = wire.answers.map(|value| display_value(value, is_fraction));

        Ok(Self {
            wire,
            first,
            second,
            operation,
            is_fraction,
            text,
            answer_labels,
            correct_index,
        })
    }

    /// The payload as received, for resubmission.
    #[must_use]
    pub fn wire(&self) -> &Question {
        &self.wire
    }

    #[must_use]
    pub fn first(&self) -> Operand {
        self.first
    }

    #[must_use]
    pub fn second(&self) -> Operand {
        self.second
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn is_fraction(&self) -> bool {
        self.is_fraction
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answer_labels(&self) -> &[String; 4] {
        &self.answer_labels
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<EncodedValue> {
        self.wire.answers.get(index).copied()
    }

    #[must_use]
    pub fn correct_answer(&self) -> EncodedValue {
        self.wire.correct_answer
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// Render an encoded value the way this question's answers are rendered.
    #[must_use]
    pub fn display_value(&self, value: EncodedValue) -> String {
        display_value(value, self.is_fraction)
    }
}

fn display_value(value: EncodedValue, is_fraction: bool) -> String {
    if is_fraction {
        codec::decode(value).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn wire(
        first: impl Into<WireOperand>,
        sign: &str,
        second: impl Into<WireOperand>,
        answers: [i64; 4],
        correct: i64,
    ) -> Question {
        Question {
            first: first.into(),
            second: second.into(),
            operation_sign: sign.to_string(),
            answers: answers.map(EncodedValue::new),
            correct_answer: EncodedValue::new(correct),
            text: None,
            extra: Map::new(),
        }
    }

    pub(crate) fn prepared(
        first: impl Into<WireOperand>,
        sign: &str,
        second: impl Into<WireOperand>,
        answers: [i64; 4],
        correct: i64,
    ) -> PreparedQuestion {
        PreparedQuestion::prepare(wire(first, sign, second, answers, correct)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{prepared, wire};
    use super::*;

    #[test]
    fn whole_number_question_keeps_raw_labels() {
        let question = prepared(30, "×", 40, [1200, 1100, 700, 1300], 1200);
        assert!(!question.is_fraction());
        assert_eq!(question.text(), "30 × 40 = ?");
        assert_eq!(question.answer_labels()[0], "1200");
        assert_eq!(question.correct_index(), 0);
    }

    #[test]
    fn fraction_literal_marks_question_as_fraction() {
        let question = prepared("1/3", "fracAdd", "1/3", [2003, 1003, 3003, 2006], 2003);
        assert!(question.is_fraction());
        assert_eq!(question.operation(), Operation::Add);
        assert_eq!(question.text(), "1/3 + 1/3 = ?");
        assert_eq!(question.answer_labels()[..2], ["2/3".to_string(), "1/3".to_string()]);
        assert_eq!(question.answer_labels()[2], "1");
    }

    #[test]
    fn legacy_sign_alone_marks_question_as_fraction() {
        let question = prepared(2, "fracMul", 3, [6, 5, 1002, 1003], 6);
        assert!(question.is_fraction());
        assert_eq!(question.operation().glyph(), "×");
    }

    #[test]
    fn server_text_wins_over_generated_text() {
        let mut raw = wire(4, "+", 5, [9, 8, 7, 6], 9);
        raw.text = Some("כמה זה 4 ועוד 5?".into());
        let question = PreparedQuestion::prepare(raw).unwrap();
        assert_eq!(question.text(), "כמה זה 4 ועוד 5?");
    }

    #[test]
    fn rejects_missing_or_duplicated_correct_answer() {
        let err = PreparedQuestion::prepare(wire(1, "+", 1, [3, 4, 5, 6], 2)).unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerCount { count: 0 });

        let err = PreparedQuestion::prepare(wire(1, "+", 1, [2, 2, 5, 6], 2)).unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerCount { count: 2 });
    }

    #[test]
    fn rejects_unknown_sign_and_bad_operand() {
        let err = PreparedQuestion::prepare(wire(1, "mod", 1, [2, 3, 4, 5], 2)).unwrap_err();
        assert!(matches!(err, QuestionError::UnknownSign(_)));

        let err = PreparedQuestion::prepare(wire("a/b", "+", 1, [2, 3, 4, 5], 2)).unwrap_err();
        assert!(matches!(err, QuestionError::InvalidOperand(_)));
    }

    #[test]
    fn integral_float_operand_is_accepted() {
        let raw: Question = serde_json::from_value(serde_json::json!({
            "first": 6.0,
            "second": 2,
            "operationSign": "÷",
            "answers": [3, 4, 2, 12],
            "correctAnswer": 3
        }))
        .unwrap();
        let question = PreparedQuestion::prepare(raw).unwrap();
        assert_eq!(question.first(), Operand::Whole(6));
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let payload = serde_json::json!({
            "first": "1/2",
            "second": "1/4",
            "operationSign": "fracSub",
            "answers": [1004, 2004, 1002, 3004],
            "correctAnswer": 1004,
            "topicId": 6,
            "difficulty": 2
        });
        let raw: Question = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(raw.extra.get("topicId"), Some(&serde_json::json!(6)));
        assert_eq!(serde_json::to_value(&raw).unwrap(), payload);
    }

    #[test]
    fn apply_dispatches_per_operation() {
        assert_eq!(Operation::Add.apply(12, 7), Some(19));
        assert_eq!(Operation::Subtract.apply(12, 7), Some(5));
        assert_eq!(Operation::Multiply.apply(3, 4), Some(12));
        assert_eq!(Operation::Divide.apply(12, 4), Some(3));
        assert_eq!(Operation::Divide.apply(12, 5), None);
        assert_eq!(Operation::Divide.apply(12, 0), None);
    }
}
