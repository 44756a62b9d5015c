use crate::models::{Mentor, Student};
use std::collections::HashSet;

/// Compatibility score between a student and a mentor
///
/// Higher is better. A score of 0 means "no common ground": such a mentor is
/// dropped from the student's list, while the student stays (ranked last) on
/// the mentor's list if eligible.
pub trait CompatibilityScorer: Send + Sync {
    fn score(&self, student: &Student, mentor: &Mentor) -> u32;
}

/// Counts tags shared by the student's interests and the mentor's research areas
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestOverlap;

impl CompatibilityScorer for InterestOverlap {
    #[inline]
    fn score(&self, student: &Student, mentor: &Mentor) -> u32 {
        interest_overlap(student, mentor)
    }
}

/// Size of the intersection of interests and research areas
///
/// Tags compare case-sensitively; a tag listed twice counts once.
pub fn interest_overlap(student: &Student, mentor: &Mentor) -> u32 {
    shared_interests(student, mentor).len() as u32
}

/// Shared tags in the order the student listed them
pub fn shared_interests<'a>(student: &'a Student, mentor: &Mentor) -> Vec<&'a str> {
    let areas: HashSet<&str> = mentor.research_areas.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    student
        .interests
        .iter()
        .map(String::as_str)
        .filter(|tag| areas.contains(tag) && seen.insert(*tag))
        .collect()
}
