//! Linear unlock policy.
//!
//! A lesson is accessible when it is unlocked by default in the catalog or when its
//! predecessor (in declared course order) has been completed. Nothing here mutates
//! the catalog; callers fold the results into a per-user [`UnlockState`].

use std::collections::BTreeSet;

use crate::course::{Course, Lesson};

/// The lesson that follows `lesson_id`: the next one in its unit, or the first
/// lesson of the next unit. `None` at the end of the course or for unknown ids.
pub fn successor<'c>(course: &'c Course, lesson_id: &str) -> Option<&'c Lesson> {
    let (ui, li) = course.locate(lesson_id)?;
    let units = course.units();

    units[ui]
        .lessons()
        .get(li + 1)
        .or_else(|| units.get(ui + 1).and_then(|u| u.lessons().first()))
}

/// Lessons unlocked by completing `lesson_id`.
///
/// Completing an already completed lesson unlocks nothing. Returns at most one id.
pub fn newly_unlocked(
    course: &Course,
    completed_before: &BTreeSet<String>,
    lesson_id: &str,
) -> BTreeSet<String> {
    if completed_before.contains(lesson_id) {
        return BTreeSet::new();
    }

    successor(course, lesson_id)
        .map(|l| BTreeSet::from([l.id().to_string()]))
        .unwrap_or_default()
}

/// Per-user lock state derived from completed lessons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnlockState {
    unlocked: BTreeSet<String>,
    completed: BTreeSet<String>,
}

impl UnlockState {
    pub fn derive(course: &Course, completed: &BTreeSet<String>) -> Self {
        let mut state = Self {
            unlocked: course
                .lessons()
                .filter(|l| l.unlocked_by_default())
                .map(|l| l.id().to_string())
                .collect(),
            completed: BTreeSet::new(),
        };

        for id in completed {
            // a completed lesson was reachable even if content moved since
            if course.lesson(id).is_some() {
                state.unlocked.insert(id.clone());
            }
            let next = newly_unlocked(course, &BTreeSet::new(), id);
            state.apply(id, &next);
        }
        state
    }

    pub fn is_unlocked(&self, lesson_id: &str) -> bool {
        self.unlocked.contains(lesson_id)
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed.contains(lesson_id)
    }

    pub fn unlocked(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    /// Folds a completion and the resolver's result into this state.
    pub fn apply(&mut self, completed_lesson: &str, newly_unlocked: &BTreeSet<String>) {
        self.completed.insert(completed_lesson.to_string());
        self.unlocked.extend(newly_unlocked.iter().cloned());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn course() -> Course {
        Course::builtin().unwrap()
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unlocks_next_lesson_in_unit() {
        let unlocked = newly_unlocked(&course(), &set(&[]), "u1-l1");
        assert_eq!(unlocked, set(&["u1-l2"]));
    }

    #[test]
    fn test_last_lesson_of_unit_unlocks_next_unit() {
        let unlocked = newly_unlocked(&course(), &set(&["u1-l1", "u1-l2"]), "u1-l3");
        assert_eq!(unlocked, set(&["u2-l1"]));
    }

    #[test]
    fn test_course_end_unlocks_nothing() {
        let unlocked = newly_unlocked(&course(), &set(&[]), "u2-l3");
        assert!(unlocked.is_empty());
    }

    #[test]
    fn test_recompletion_is_noop() {
        let unlocked = newly_unlocked(&course(), &set(&["u1-l1"]), "u1-l1");
        assert!(unlocked.is_empty());
    }

    #[test]
    fn test_unknown_lesson_unlocks_nothing() {
        assert!(newly_unlocked(&course(), &set(&[]), "nope").is_empty());
        assert!(successor(&course(), "nope").is_none());
    }

    #[test]
    fn test_never_more_than_one() {
        let course = course();
        for lesson in course.lessons() {
            assert!(newly_unlocked(&course, &set(&[]), lesson.id()).len() <= 1);
        }
    }

    #[test]
    fn test_derive_default_state() {
        let state = UnlockState::derive(&course(), &set(&[]));
        assert_eq!(state.unlocked(), &set(&["u1-l1"]));
        assert!(!state.is_completed("u1-l1"));
    }

    #[test]
    fn test_derive_from_completed() {
        let state = UnlockState::derive(&course(), &set(&["u1-l1", "u1-l2"]));
        assert_eq!(state.unlocked(), &set(&["u1-l1", "u1-l2", "u1-l3"]));
        assert!(!state.is_unlocked("u2-l1"));
    }

    #[test]
    fn test_apply_folds_resolver_result() {
        let course = course();
        let mut state = UnlockState::derive(&course, &set(&[]));
        let unlocked = newly_unlocked(&course, state.completed(), "u1-l1");
        state.apply("u1-l1", &unlocked);

        assert!(state.is_completed("u1-l1"));
        assert!(state.is_unlocked("u1-l2"));
        assert!(!state.is_unlocked("u1-l3"));
        assert_eq!(state, UnlockState::derive(&course, &set(&["u1-l1"])));
    }
}
