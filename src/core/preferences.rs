use crate::core::filters::is_eligible_for;
use crate::core::scoring::{CompatibilityScorer, InterestOverlap};
use crate::models::{Mentor, PreferenceLists, Recommendation, Student};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Builds ranked candidate lists for both sides of a project
///
/// # Rules
/// - A student lists a mentor if they are time compatible and score above zero.
/// - A mentor lists a student if they are time compatible and the student meets
///   every threshold. Zero-score students stay on the list, ranked last.
/// - Lists are sorted by descending score; ties keep input order.
#[derive(Debug, Clone, Default)]
pub struct PreferenceBuilder<S = InterestOverlap> {
    scorer: S,
}

impl<S: CompatibilityScorer> PreferenceBuilder<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Build one preference list per student and per mentor
    ///
    /// Participants whose id was already seen on the same side are skipped, so
    /// every list is free of duplicates. Empty inputs give empty lists.
    pub fn build<F>(&self, students: &[Student], mentors: &[Mentor], time_compatible: F) -> PreferenceLists
    where
        F: Fn(&Student, &Mentor) -> bool,
    {
        let students = unique_by_id(students, |s| s.id.as_str(), "student");
        let mentors = unique_by_id(mentors, |m| m.id.as_str(), "mentor");

        let mut lists = PreferenceLists::default();

        for student in &students {
            let ranked = self
                .rank_mentors(student, &mentors, &time_compatible)
                .into_iter()
                .map(|(mentor, _)| mentor.id.clone())
                .collect();
            lists.students.insert(student.id.clone(), ranked);
        }

        for mentor in &mentors {
            let mut scored: Vec<(&Student, u32)> = students
                .iter()
                .filter(|student| is_eligible_for(student, mentor, &time_compatible))
                .map(|student| (*student, self.scorer.score(student, mentor)))
                .collect();

            // sort_by is stable, equal scores keep enumeration order
            scored.sort_by(|a, b| b.1.cmp(&a.1));

            let ranked: Vec<String> = scored.into_iter().map(|(s, _)| s.id.clone()).collect();
            if ranked.is_empty() {
                debug!("Mentor {} has no eligible students", mentor.id);
            }
            lists.mentors.insert(mentor.id.clone(), ranked);
        }

        lists
    }

    /// Preview the best mentor for each student, ignoring capacity
    ///
    /// This is the head of the student's preference list, or `None` when the
    /// list is empty.
    pub fn recommend<F>(&self, students: &[Student], mentors: &[Mentor], time_compatible: F) -> Vec<Recommendation>
    where
        F: Fn(&Student, &Mentor) -> bool,
    {
        let mentors = unique_by_id(mentors, |m| m.id.as_str(), "mentor");

        unique_by_id(students, |s| s.id.as_str(), "student")
            .into_iter()
            .map(|student| {
                let best = self.rank_mentors(student, &mentors, &time_compatible).into_iter().next();
                Recommendation {
                    student_id: student.id.clone(),
                    mentor_id: best.map(|(m, _)| m.id.clone()),
                    score: best.map(|(_, score)| score).unwrap_or(0),
                }
            })
            .collect()
    }

    fn rank_mentors<'m, F>(&self, student: &Student, mentors: &[&'m Mentor], time_compatible: &F) -> Vec<(&'m Mentor, u32)>
    where
        F: Fn(&Student, &Mentor) -> bool,
    {
        let mut scored: Vec<(&Mentor, u32)> = mentors
            .iter()
            .filter(|mentor| time_compatible(student, **mentor))
            .map(|mentor| (*mentor, self.scorer.score(student, mentor)))
            .filter(|(_, score)| *score > 0)
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
    }
}

/// Build preference lists with the default interest-overlap scorer
pub fn build_preferences<F>(students: &[Student], mentors: &[Mentor], time_compatible: F) -> PreferenceLists
where
    F: Fn(&Student, &Mentor) -> bool,
{
    PreferenceBuilder::<InterestOverlap>::default().build(students, mentors, time_compatible)
}

/// Recommend with the default interest-overlap scorer
pub fn recommend<F>(students: &[Student], mentors: &[Mentor], time_compatible: F) -> Vec<Recommendation>
where
    F: Fn(&Student, &Mentor) -> bool,
{
    PreferenceBuilder::<InterestOverlap>::default().recommend(students, mentors, time_compatible)
}

fn unique_by_id<'a, T>(items: &'a [T], id: impl Fn(&T) -> &str, side: &str) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());

    for item in items {
        let key = id(item);
        if seen.insert(key) {
            unique.push(item);
        } else {
            warn!("Skipping duplicate {} id {}", side, key);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::time_compatible;
    use crate::models::{Requirements, Skills};

    fn student(id: &str, interests: &[&str], skills: Skills) -> Student {
        Student::new(id, interests, skills, true)
    }

    fn mentor(id: &str, areas: &[&str], requirements: Requirements) -> Mentor {
        Mentor::new(id, areas, requirements, 2, true)
    }

    #[test]
    fn test_student_list_sorted_by_overlap() {
        let students = vec![student("s1", &["a", "b", "c"], Skills::new(3, 3, 3))];
        let mentors = vec![
            mentor("m1", &["a"], Requirements::none()),
            mentor("m2", &["a", "b", "c"], Requirements::none()),
            mentor("m3", &["a", "b"], Requirements::none()),
        ];

        let lists = build_preferences(&students, &mentors, time_compatible);

        assert_eq!(lists.student("s1"), ["m2", "m3", "m1"]);
    }

    #[test]
    fn test_zero_score_mentor_dropped_from_student_list() {
        let students = vec![student("s1", &["a"], Skills::new(3, 3, 3))];
        let mentors = vec![
            mentor("m1", &["z"], Requirements::none()),
            mentor("m2", &["a"], Requirements::none()),
        ];

        let lists = build_preferences(&students, &mentors, time_compatible);

        assert_eq!(lists.student("s1"), ["m2"]);
    }

    #[test]
    fn test_zero_score_student_kept_last_on_mentor_list() {
        let students = vec![
            student("s1", &["z"], Skills::new(3, 3, 3)),
            student("s2", &["a"], Skills::new(3, 3, 3)),
        ];
        let mentors = vec![mentor("m1", &["a"], Requirements::none())];

        let lists = build_preferences(&students, &mentors, time_compatible);

        assert_eq!(lists.mentor("m1"), ["s2", "s1"]);
        assert!(lists.student("s1").is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let students = vec![
            student("s1", &["a"], Skills::new(3, 3, 3)),
            student("s2", &["a"], Skills::new(3, 3, 3)),
            student("s3", &["a"], Skills::new(3, 3, 3)),
        ];
        let mentors = vec![
            mentor("m2", &["a"], Requirements::none()),
            mentor("m1", &["a"], Requirements::none()),
        ];

        let lists = build_preferences(&students, &mentors, time_compatible);

        assert_eq!(lists.mentor("m1"), ["s1", "s2", "s3"]);
        assert_eq!(lists.student("s3"), ["m2", "m1"]);
    }

    #[test]
    fn test_requirements_gate_mentor_list_only() {
        let students = vec![student("weak", &["a"], Skills::new(1, 1, 1))];
        let mentors = vec![mentor("m1", &["a"], Requirements::new(3, 3, 3))];

        let lists = build_preferences(&students, &mentors, time_compatible);

        assert_eq!(lists.student("weak"), ["m1"]);
        assert!(lists.mentor("m1").is_empty());
    }

    #[test]
    fn test_time_incompatible_pairs_excluded_both_ways() {
        let mut away = student("s1", &["a"], Skills::new(3, 3, 3));
        away.availability.matches_project = false;
        let mentors = vec![mentor("m1", &["a"], Requirements::none())];

        let lists = build_preferences(&[away], &mentors, time_compatible);

        assert!(lists.student("s1").is_empty());
        assert!(lists.mentor("m1").is_empty());
    }

    #[test]
    fn test_custom_time_predicate_is_used() {
        let students = vec![student("s1", &["a"], Skills::new(3, 3, 3))];
        let mentors = vec![
            mentor("m1", &["a"], Requirements::none()),
            mentor("m2", &["a"], Requirements::none()),
        ];

        let lists = build_preferences(&students, &mentors, |_, m| m.id != "m1");

        assert_eq!(lists.student("s1"), ["m2"]);
        assert!(lists.mentor("m1").is_empty());
        assert_eq!(lists.mentor("m2"), ["s1"]);
    }

    #[test]
    fn test_empty_inputs_give_empty_lists() {
        let lists = build_preferences(&[], &[], time_compatible);
        assert!(lists.students.is_empty());
        assert!(lists.mentors.is_empty());

        let students = vec![student("s1", &["a"], Skills::new(3, 3, 3))];
        let lists = build_preferences(&students, &[], time_compatible);
        assert!(lists.student("s1").is_empty());
        assert!(lists.students.contains_key("s1"));
    }

    #[test]
    fn test_duplicate_ids_listed_once() {
        let students = vec![
            student("s1", &["a"], Skills::new(3, 3, 3)),
            student("s1", &["a"], Skills::new(5, 5, 5)),
        ];
        let mentors = vec![
            mentor("m1", &["a"], Requirements::none()),
            mentor("m1", &["a"], Requirements::none()),
        ];

        let lists = build_preferences(&students, &mentors, time_compatible);

        assert_eq!(lists.student("s1"), ["m1"]);
        assert_eq!(lists.mentor("m1"), ["s1"]);
    }

    struct FixedScore(u32);

    impl CompatibilityScorer for FixedScore {
        fn score(&self, _: &Student, _: &Mentor) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_scorer_is_pluggable() {
        let students = vec![student("s1", &[], Skills::new(3, 3, 3))];
        let mentors = vec![mentor("m1", &[], Requirements::none())];

        let lists = PreferenceBuilder::new(FixedScore(1)).build(&students, &mentors, time_compatible);
        assert_eq!(lists.student("s1"), ["m1"]);

        let lists = PreferenceBuilder::new(FixedScore(0)).build(&students, &mentors, time_compatible);
        assert!(lists.student("s1").is_empty());
    }

    #[test]
    fn test_recommend_picks_head_of_list() {
        let students = vec![
            student("s1", &["a", "b"], Skills::new(3, 3, 3)),
            student("s2", &["z"], Skills::new(3, 3, 3)),
        ];
        let mentors = vec![
            mentor("m1", &["a"], Requirements::none()),
            mentor("m2", &["a", "b"], Requirements::none()),
        ];

        let recs = recommend(&students, &mentors, time_compatible);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].mentor_id.as_deref(), Some("m2"));
        assert_eq!(recs[0].score, 2);
        assert_eq!(recs[1].mentor_id, None);
        assert_eq!(recs[1].score, 0);
    }

    #[test]
    fn test_recommend_honours_time_predicate() {
        let students = vec![student("s1", &["a", "b"], Skills::new(3, 3, 3))];
        let mentors = vec![
            mentor("m1", &["a"], Requirements::none()),
            mentor("m2", &["a", "b"], Requirements::none()),
        ];

        let recs = recommend(&students, &mentors, |_, m: &Mentor| m.id != "m2");
        assert_eq!(recs[0].mentor_id.as_deref(), Some("m1"));
        assert_eq!(recs[0].score, 1);

        let recs = recommend(&students, &mentors, |_, _| false);
        assert_eq!(recs[0].mentor_id, None);
    }
}
