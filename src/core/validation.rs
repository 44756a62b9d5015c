use crate::core::matcher::MatchInput;
use crate::models::{MatchPolicy, Mentor, Student};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Contract violations that stop a matching run before it starts
///
/// Empty or fully unmatched outcomes are not errors; see [`crate::models::MatchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    #[error("Duplicate student id: {0}")]
    DuplicateStudentId(String),

    #[error("Duplicate mentor id: {0}")]
    DuplicateMentorId(String),

    #[error("Invalid capacity {capacity} for mentor {mentor_id}")]
    InvalidCapacity { mentor_id: String, capacity: u32 },

    #[error("No capacity supplied for mentor {0}")]
    MissingCapacity(String),

    #[error("Unknown mentor {mentor_id} referenced by {owner}")]
    UnknownMentor { owner: String, mentor_id: String },

    #[error("Unknown student {student_id} referenced by {owner}")]
    UnknownStudent { owner: String, student_id: String },

    #[error("{candidate} listed more than once by {owner}")]
    DuplicatePreference { owner: String, candidate: String },

    #[error("Skill value out of 1-5 range for {0}")]
    SkillOutOfRange(String),
}

/// Check participant records before building preferences
///
/// Rejects duplicate ids on either side, skill or requirement values off the
/// 1-5 scale, and capacities the policy does not allow.
pub fn validate_roster(
    students: &[Student],
    mentors: &[Mentor],
    policy: &MatchPolicy,
) -> Result<(), MatchingError> {
    let mut seen = HashSet::new();
    for student in students {
        if !seen.insert(student.id.as_str()) {
            return Err(MatchingError::DuplicateStudentId(student.id.clone()));
        }
        if !student.skills.in_range() {
            return Err(MatchingError::SkillOutOfRange(student.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for mentor in mentors {
        if !seen.insert(mentor.id.as_str()) {
            return Err(MatchingError::DuplicateMentorId(mentor.id.clone()));
        }
        if !mentor.requirements.in_range() {
            return Err(MatchingError::SkillOutOfRange(mentor.id.clone()));
        }
        check_capacity(&mentor.id, mentor.capacity, policy)?;
    }

    Ok(())
}

/// Check the raw inputs of a matching run
pub fn validate_match_input(input: &MatchInput<'_>, policy: &MatchPolicy) -> Result<(), MatchingError> {
    let students = unique_ids(input.student_ids, MatchingError::DuplicateStudentId)?;
    let mentors = unique_ids(input.mentor_ids, MatchingError::DuplicateMentorId)?;

    for mentor_id in input.mentor_ids {
        let capacity = input
            .capacities
            .get(mentor_id)
            .copied()
            .ok_or_else(|| MatchingError::MissingCapacity(mentor_id.clone()))?;
        check_capacity(mentor_id, capacity, policy)?;
    }

    check_lists(
        input.student_prefs,
        &students,
        &mentors,
        |id| MatchingError::UnknownStudent {
            owner: "student preferences".to_string(),
            student_id: id.to_string(),
        },
        |owner, id| MatchingError::UnknownMentor {
            owner: owner.to_string(),
            mentor_id: id.to_string(),
        },
    )?;

    check_lists(
        input.mentor_prefs,
        &mentors,
        &students,
        |id| MatchingError::UnknownMentor {
            owner: "mentor preferences".to_string(),
            mentor_id: id.to_string(),
        },
        |owner, id| MatchingError::UnknownStudent {
            owner: owner.to_string(),
            student_id: id.to_string(),
        },
    )?;

    Ok(())
}

fn check_capacity(mentor_id: &str, capacity: u32, policy: &MatchPolicy) -> Result<(), MatchingError> {
    if capacity == 0 && !policy.allow_inactive_mentors {
        return Err(MatchingError::InvalidCapacity {
            mentor_id: mentor_id.to_string(),
            capacity,
        });
    }
    Ok(())
}

fn unique_ids<'a>(
    ids: &'a [String],
    duplicate: fn(String) -> MatchingError,
) -> Result<HashSet<&'a str>, MatchingError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(duplicate(id.clone()));
        }
    }
    Ok(seen)
}

/// Every list must belong to a known owner and name known, distinct candidates
fn check_lists(
    lists: &BTreeMap<String, Vec<String>>,
    owners: &HashSet<&str>,
    candidates: &HashSet<&str>,
    unknown_owner: impl Fn(&str) -> MatchingError,
    unknown_candidate: impl Fn(&str, &str) -> MatchingError,
) -> Result<(), MatchingError> {
    for (owner, list) in lists {
        if !owners.contains(owner.as_str()) {
            return Err(unknown_owner(owner));
        }

        let mut seen = HashSet::with_capacity(list.len());
        for candidate in list {
            if !candidates.contains(candidate.as_str()) {
                return Err(unknown_candidate(owner, candidate));
            }
            if !seen.insert(candidate.as_str()) {
                return Err(MatchingError::DuplicatePreference {
                    owner: owner.clone(),
                    candidate: candidate.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Requirements, Skills};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn lists(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries.iter().map(|(k, v)| (k.to_string(), ids(v))).collect()
    }

    fn caps(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_valid_input_passes() {
        let students = ids(&["s1", "s2"]);
        let mentors = ids(&["m1"]);
        let student_prefs = lists(&[("s1", &["m1"]), ("s2", &[])]);
        let mentor_prefs = lists(&[("m1", &["s2", "s1"])]);
        let capacities = caps(&[("m1", 1)]);
        let input = MatchInput::new(&students, &mentors, &student_prefs, &mentor_prefs, &capacities);

        assert_eq!(validate_match_input(&input, &MatchPolicy::default()), Ok(()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let students = ids(&["s1", "s1"]);
        let mentors = ids(&["m1"]);
        let empty = BTreeMap::new();
        let capacities = caps(&[("m1", 1)]);
        let input = MatchInput::new(&students, &mentors, &empty, &empty, &capacities);

        assert_eq!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::DuplicateStudentId("s1".to_string()))
        );

        let students = ids(&["s1"]);
        let mentors = ids(&["m1", "m1"]);
        let input = MatchInput::new(&students, &mentors, &empty, &empty, &capacities);

        assert_eq!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::DuplicateMentorId("m1".to_string()))
        );
    }

    #[test]
    fn test_zero_capacity_depends_on_policy() {
        let students = ids(&["s1"]);
        let mentors = ids(&["m1"]);
        let empty = BTreeMap::new();
        let capacities = caps(&[("m1", 0)]);
        let input = MatchInput::new(&students, &mentors, &empty, &empty, &capacities);

        assert_eq!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::InvalidCapacity { mentor_id: "m1".to_string(), capacity: 0 })
        );

        let lenient = MatchPolicy {
            allow_inactive_mentors: true,
            ..MatchPolicy::default()
        };
        assert_eq!(validate_match_input(&input, &lenient), Ok(()));
    }

    #[test]
    fn test_missing_capacity_rejected() {
        let students = ids(&["s1"]);
        let mentors = ids(&["m1"]);
        let empty = BTreeMap::new();
        let capacities = BTreeMap::new();
        let input = MatchInput::new(&students, &mentors, &empty, &empty, &capacities);

        assert_eq!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::MissingCapacity("m1".to_string()))
        );
    }

    #[test]
    fn test_unknown_references_rejected() {
        let students = ids(&["s1"]);
        let mentors = ids(&["m1"]);
        let capacities = caps(&[("m1", 1)]);
        let empty = BTreeMap::new();

        let student_prefs = lists(&[("s1", &["m9"])]);
        let input = MatchInput::new(&students, &mentors, &student_prefs, &empty, &capacities);
        assert!(matches!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::UnknownMentor { .. })
        ));

        let mentor_prefs = lists(&[("m1", &["s9"])]);
        let input = MatchInput::new(&students, &mentors, &empty, &mentor_prefs, &capacities);
        assert!(matches!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::UnknownStudent { .. })
        ));

        let stray_owner = lists(&[("s9", &["m1"])]);
        let input = MatchInput::new(&students, &mentors, &stray_owner, &empty, &capacities);
        assert!(matches!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::UnknownStudent { .. })
        ));
    }

    #[test]
    fn test_repeated_candidate_rejected() {
        let students = ids(&["s1"]);
        let mentors = ids(&["m1"]);
        let capacities = caps(&[("m1", 1)]);
        let student_prefs = lists(&[("s1", &["m1", "m1"])]);
        let empty = BTreeMap::new();
        let input = MatchInput::new(&students, &mentors, &student_prefs, &empty, &capacities);

        assert_eq!(
            validate_match_input(&input, &MatchPolicy::default()),
            Err(MatchingError::DuplicatePreference {
                owner: "s1".to_string(),
                candidate: "m1".to_string()
            })
        );
    }

    #[test]
    fn test_roster_validation() {
        let students = vec![Student::new("s1", &["a"], Skills::new(3, 3, 3), true)];
        let mentors = vec![Mentor::new("m1", &["a"], Requirements::none(), 2, true)];
        assert_eq!(validate_roster(&students, &mentors, &MatchPolicy::default()), Ok(()));

        let off_scale = vec![Student::new("s2", &["a"], Skills::new(6, 3, 3), true)];
        assert_eq!(
            validate_roster(&off_scale, &mentors, &MatchPolicy::default()),
            Err(MatchingError::SkillOutOfRange("s2".to_string()))
        );

        let inactive = vec![Mentor::new("m2", &["a"], Requirements::none(), 0, true)];
        assert!(matches!(
            validate_roster(&students, &inactive, &MatchPolicy::default()),
            Err(MatchingError::InvalidCapacity { .. })
        ));

        let twice = vec![mentors[0].clone(), mentors[0].clone()];
        assert_eq!(
            validate_roster(&students, &twice, &MatchPolicy::default()),
            Err(MatchingError::DuplicateMentorId("m1".to_string()))
        );
    }
}
