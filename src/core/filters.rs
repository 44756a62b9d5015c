use crate::models::{Availability, Mentor, Requirements, Skills, Student};

/// Check whether two availabilities are compatible
///
/// Both sides must have confirmed that they can make the project schedule.
/// Calendars are not compared; that is left to whoever collects the flags.
#[inline]
pub fn check_time_compatibility(student: &Availability, mentor: &Availability) -> bool {
    student.matches_project && mentor.matches_project
}

/// Default time predicate for [`crate::core::build_preferences`]
#[inline]
pub fn time_compatible(student: &Student, mentor: &Mentor) -> bool {
    check_time_compatibility(&student.availability, &mentor.availability)
}

/// Check a student's skills against a mentor's minimum thresholds
///
/// Every dimension must reach its threshold.
#[inline]
pub fn meets_requirements(skills: &Skills, requirements: &Requirements) -> bool {
    skills.math >= requirements.min_math
        && skills.programming >= requirements.min_programming
        && skills.english >= requirements.min_english
}

/// Mentor-side eligibility gate: time compatible and qualified
#[inline]
pub fn is_eligible_for<F>(student: &Student, mentor: &Mentor, time_compatible: &F) -> bool
where
    F: Fn(&Student, &Mentor) -> bool,
{
    time_compatible(student, mentor) && meets_requirements(&student.skills, &mentor.requirements)
}
