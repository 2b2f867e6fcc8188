use serde::{Deserialize, Serialize};

use crate::course::{Question, QuestionKind};
use crate::quiz::ValidationError;

/// A learner's answer as submitted by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum Answer {
    /// Chosen option or typed text.
    Text(String),
    /// Ordered selections for matching questions.
    Sequence(Vec<String>),
}

impl Answer {
    pub fn text<S: Into<String>>(s: S) -> Self {
        Self::Text(s.into())
    }

    pub fn sequence<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Trimmed copy of the answer, or a validation error when nothing was given.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        match self {
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(ValidationError::EmptyAnswer);
                }
                Ok(Self::Text(text.to_string()))
            }
            Self::Sequence(items) => {
                if items.is_empty() {
                    return Err(ValidationError::EmptyAnswer);
                }
                let items: Vec<String> = items.iter().map(|s| s.trim().to_string()).collect();
                if items.iter().any(String::is_empty) {
                    return Err(ValidationError::EmptyAnswer);
                }
                Ok(Self::Sequence(items))
            }
        }
    }
}

impl Question {
    /// The answer key, revealed once the question has been answered.
    pub fn expected_answer(&self) -> Answer {
        match self.kind() {
            QuestionKind::MultipleChoice { correct_answer, .. }
            | QuestionKind::TrueFalse { correct_answer, .. }
            | QuestionKind::FillBlank { correct_answer } => Answer::Text(correct_answer.clone()),
            QuestionKind::Matching { correct_answer, .. } => {
                Answer::Sequence(correct_answer.clone())
            }
        }
    }

    /// Exact, case-sensitive comparison of a normalized answer against the key.
    pub fn is_correct(&self, answer: &Answer) -> Result<bool, ValidationError> {
        match (self.kind(), answer) {
            (
                QuestionKind::MultipleChoice { correct_answer, .. }
                | QuestionKind::TrueFalse { correct_answer, .. }
                | QuestionKind::FillBlank { correct_answer },
                Answer::Text(text),
            ) => Ok(text == correct_answer),
            (QuestionKind::Matching { correct_answer, .. }, Answer::Sequence(items)) => {
                Ok(items == correct_answer)
            }
            (kind, _) => Err(ValidationError::AnswerShape {
                question_type: kind.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::course::Course;

    fn question(id: &str) -> Question {
        Course::builtin()
            .unwrap()
            .lessons()
            .flat_map(|l| l.questions().iter())
            .find(|q| q.id() == id)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_fill_blank_is_case_sensitive() {
        let q = question("u1-l1-q1");
        let exact = Answer::text("bartering").normalized().unwrap();
        let capitalized = Answer::text("Bartering").normalized().unwrap();

        assert!(q.is_correct(&exact).unwrap());
        assert!(!q.is_correct(&capitalized).unwrap());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let q = question("u1-l1-q1");
        let padded = Answer::text("  bartering\n").normalized().unwrap();
        assert!(q.is_correct(&padded).unwrap());
    }

    #[test]
    fn test_empty_answers_are_rejected() {
        assert_eq!(
            Answer::text("   ").normalized(),
            Err(ValidationError::EmptyAnswer)
        );
        assert_eq!(
            Answer::Sequence(vec![]).normalized(),
            Err(ValidationError::EmptyAnswer)
        );
        assert_eq!(
            Answer::sequence(["Income", ""]).normalized(),
            Err(ValidationError::EmptyAnswer)
        );
    }

    #[test]
    fn test_matching_compares_in_order() {
        let q = question("u2-l2-q2");
        let right = Answer::sequence(["Cash", "Simple interest", "Compound interest"]);
        let shuffled = Answer::sequence(["Simple interest", "Cash", "Compound interest"]);

        assert!(q.is_correct(&right).unwrap());
        assert!(!q.is_correct(&shuffled).unwrap());
    }

    #[test]
    fn test_shape_mismatch() {
        let q = question("u2-l2-q2");
        assert_eq!(
            q.is_correct(&Answer::text("Cash")),
            Err(ValidationError::AnswerShape {
                question_type: "matching"
            })
        );
    }

    #[test]
    fn test_untagged_deserialization() {
        let text: Answer = serde_json::from_str(r#""True""#).unwrap();
        let seq: Answer = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(text, Answer::text("True"));
        assert_eq!(seq, Answer::sequence(["a", "b"]));
    }
}
