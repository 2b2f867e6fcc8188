use std::collections::HashSet;

use crate::course::{ContentError, ContentResult, Course, Question, QuestionKind};

impl Course {
    /// Checks the content-authoring invariants of the catalog.
    pub fn validate(&self) -> ContentResult<()> {
        if self.units().is_empty() {
            return Err(ContentError::EmptyCourse);
        }

        let mut lesson_ids = HashSet::new();
        let mut question_ids = HashSet::new();

        for (ui, unit) in self.units().iter().enumerate() {
            if unit.lessons().is_empty() {
                return Err(ContentError::EmptyUnit {
                    unit: unit.id().to_string(),
                });
            }

            for (li, lesson) in unit.lessons().iter().enumerate() {
                if !lesson_ids.insert(lesson.id()) {
                    return Err(ContentError::DuplicateLesson(lesson.id().to_string()));
                }

                let should_be_unlocked = ui == 0 && li == 0;
                if lesson.unlocked_by_default() != should_be_unlocked {
                    return Err(ContentError::DefaultLockState {
                        lesson: lesson.id().to_string(),
                        unlocked: lesson.unlocked_by_default(),
                    });
                }

                if lesson.questions().is_empty() {
                    return Err(ContentError::EmptyLesson {
                        lesson: lesson.id().to_string(),
                    });
                }

                for question in lesson.questions() {
                    if !question_ids.insert(question.id()) {
                        return Err(ContentError::DuplicateQuestion(question.id().to_string()));
                    }
                    validate_question(question)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_question(question: &Question) -> ContentResult<()> {
    let id = || question.id().to_string();

    if question.points() == 0 {
        return Err(ContentError::ZeroPoints { question: id() });
    }

    match question.kind() {
        QuestionKind::MultipleChoice {
            options,
            correct_answer,
        }
        | QuestionKind::TrueFalse {
            options,
            correct_answer,
        } => {
            if options.is_empty() {
                return Err(ContentError::MissingOptions { question: id() });
            }
            if !options.contains(correct_answer) {
                return Err(ContentError::AnswerNotInOptions {
                    question: id(),
                    answer: correct_answer.clone(),
                });
            }
        }
        QuestionKind::FillBlank { correct_answer } => {
            if correct_answer.trim().is_empty() {
                return Err(ContentError::EmptyAnswer { question: id() });
            }
        }
        QuestionKind::Matching {
            options,
            correct_answer,
        } => {
            if options.is_empty() {
                return Err(ContentError::MissingOptions { question: id() });
            }
            if correct_answer.is_empty() {
                return Err(ContentError::EmptyAnswer { question: id() });
            }
            if let Some(stray) = correct_answer.iter().find(|a| !options.contains(a)) {
                return Err(ContentError::AnswerNotInOptions {
                    question: id(),
                    answer: stray.clone(),
                });
            }
        }
    }

    Ok(())
}
