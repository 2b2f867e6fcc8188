use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: String,
    prompt: String,
    explanation: String,
    points: u32,
    #[serde(flatten)]
    kind: QuestionKind,
}

/// Question payload, tagged by the `type` field of the course JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        options: Vec<String>,
        correct_answer: String,
    },
    #[serde(rename_all = "camelCase")]
    TrueFalse {
        #[serde(default = "true_false_options")]
        options: Vec<String>,
        correct_answer: String,
    },
    #[serde(rename_all = "camelCase")]
    FillBlank { correct_answer: String },
    /// One category per prompt item, in prompt order.
    #[serde(rename_all = "camelCase")]
    Matching {
        options: Vec<String>,
        correct_answer: Vec<String>,
    },
}

fn true_false_options() -> Vec<String> {
    vec![String::from("True"), String::from("False")]
}

impl Question {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }
}

impl QuestionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::MultipleChoice { .. } => "multiple-choice",
            Self::TrueFalse { .. } => "true-false",
            Self::FillBlank { .. } => "fill-blank",
            Self::Matching { .. } => "matching",
        }
    }

    /// Options shown to the learner, `None` for free-text questions.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::MultipleChoice { options, .. }
            | Self::TrueFalse { options, .. }
            | Self::Matching { options, .. } => Some(options),
            Self::FillBlank { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_true_false_defaults_options() {
        let q: Question = serde_json::from_str(
            r#"{"id":"q","type":"true-false","prompt":"p","correctAnswer":"True","explanation":"e","points":5}"#,
        )
        .unwrap();

        assert_eq!(q.kind().type_name(), "true-false");
        assert_eq!(q.kind().options().unwrap(), ["True", "False"]);
    }

    #[test]
    fn test_matching_parses_sequence_answer() {
        let q: Question = serde_json::from_str(
            r#"{"id":"q","type":"matching","prompt":"p","options":["a","b"],"correctAnswer":["b","a"],"explanation":"e","points":5}"#,
        )
        .unwrap();

        match q.kind() {
            QuestionKind::Matching { correct_answer, .. } => {
                assert_eq!(correct_answer, &vec!["b".to_string(), "a".to_string()])
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_str::<Question>(
            r#"{"id":"q","type":"essay","prompt":"p","correctAnswer":"x","explanation":"e","points":5}"#,
        );
        assert!(result.is_err());
    }
}
