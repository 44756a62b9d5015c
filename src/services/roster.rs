use crate::core::{
    build_preferences, recommend, shared_interests, time_compatible, validate_roster, DeferredAcceptance,
    MatchInput, MatchingError,
};
use crate::models::{
    MatchOutcome, MatchPolicy, MatchReportResponse, MatchedStudent, Mentor, MentorGroup,
    ParticipantSummary, PreferenceLists, ProjectInfo, Recommendation, Student,
};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while managing a project's participants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Student {0} is already on the roster")]
    DuplicateStudent(String),

    #[error("Mentor {0} is already on the roster")]
    DuplicateMentor(String),

    #[error("Project accepts at most {limit} {side}")]
    ParticipantLimit { side: &'static str, limit: usize },

    #[error("Matching needs at least one student and one mentor")]
    NotReady,

    #[error(transparent)]
    Matching(#[from] MatchingError),
}

impl RosterError {
    pub fn status_code(&self) -> u16 {
        match self {
            RosterError::DuplicateStudent(_) | RosterError::DuplicateMentor(_) => 409,
            RosterError::ParticipantLimit { .. } | RosterError::NotReady | RosterError::Matching(_) => 422,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RosterError::DuplicateStudent(_) | RosterError::DuplicateMentor(_) => "duplicate_participant",
            RosterError::ParticipantLimit { .. } => "participant_limit",
            RosterError::NotReady => "not_ready",
            RosterError::Matching(_) => "invalid_roster",
        }
    }
}

/// Participants collected for one project
#[derive(Debug, Clone)]
pub struct ProjectRoster {
    project: ProjectInfo,
    students: Vec<Student>,
    mentors: Vec<Mentor>,
    policy: MatchPolicy,
    max_mentors: usize,
}

impl ProjectRoster {
    pub fn new(project: ProjectInfo, policy: MatchPolicy, max_mentors: usize) -> Self {
        Self {
            project,
            students: Vec::new(),
            mentors: Vec::new(),
            policy,
            max_mentors,
        }
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn mentors(&self) -> &[Mentor] {
        &self.mentors
    }

    /// Add a student, keeping ids unique and the project's participant cap
    pub fn add_student(&mut self, student: Student) -> Result<(), RosterError> {
        if self.students.iter().any(|s| s.id == student.id) {
            return Err(RosterError::DuplicateStudent(student.id));
        }

        let limit = self.project.max_participants as usize;
        if self.students.len() >= limit {
            return Err(RosterError::ParticipantLimit { side: "students", limit });
        }

        if !student.skills.in_range() {
            return Err(MatchingError::SkillOutOfRange(student.id).into());
        }

        self.students.push(student);
        Ok(())
    }

    /// Add a mentor; capacity 0 is only accepted when the policy allows inactive mentors
    pub fn add_mentor(&mut self, mentor: Mentor) -> Result<(), RosterError> {
        if self.mentors.iter().any(|m| m.id == mentor.id) {
            return Err(RosterError::DuplicateMentor(mentor.id));
        }

        if self.mentors.len() >= self.max_mentors {
            return Err(RosterError::ParticipantLimit {
                side: "mentors",
                limit: self.max_mentors,
            });
        }

        if mentor.capacity == 0 && !self.policy.allow_inactive_mentors {
            return Err(MatchingError::InvalidCapacity {
                mentor_id: mentor.id,
                capacity: 0,
            }
            .into());
        }

        if !mentor.requirements.in_range() {
            return Err(MatchingError::SkillOutOfRange(mentor.id).into());
        }

        self.mentors.push(mentor);
        Ok(())
    }

    pub fn preferences(&self) -> PreferenceLists {
        build_preferences(&self.students, &self.mentors, time_compatible)
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        recommend(&self.students, &self.mentors, time_compatible)
    }

    /// Build preferences and run deferred acceptance over the whole roster
    pub fn run_match(&self) -> Result<MatchOutcome, RosterError> {
        if self.students.is_empty() || self.mentors.is_empty() {
            return Err(RosterError::NotReady);
        }

        validate_roster(&self.students, &self.mentors, &self.policy)?;

        let lists = self.preferences();
        let student_ids: Vec<String> = self.students.iter().map(|s| s.id.clone()).collect();
        let mentor_ids: Vec<String> = self.mentors.iter().map(|m| m.id.clone()).collect();
        let capacities: BTreeMap<String, u32> =
            self.mentors.iter().map(|m| (m.id.clone(), m.capacity)).collect();

        let outcome = DeferredAcceptance::new(self.policy).run(MatchInput::new(
            &student_ids,
            &mentor_ids,
            &lists.students,
            &lists.mentors,
            &capacities,
        ))?;

        if !outcome.unmatched_students.is_empty() {
            warn!(
                "Project {}: {} students left unmatched",
                self.project.name,
                outcome.unmatched_students.len()
            );
        }
        info!(
            "Project {}: matched {} of {} students",
            self.project.name,
            outcome.assignment.len(),
            self.students.len()
        );

        Ok(outcome)
    }

    /// Present an outcome with participant names and shared research areas
    pub fn report(&self, outcome: &MatchOutcome) -> MatchReportResponse {
        let students: HashMap<&str, &Student> = self.students.iter().map(|s| (s.id.as_str(), s)).collect();

        let groups = self
            .mentors
            .iter()
            .map(|mentor| {
                let held: &[String] = outcome
                    .load_of(&mentor.id)
                    .map(|load| load.students.as_slice())
                    .unwrap_or(&[]);

                let members = held
                    .iter()
                    .filter_map(|id| students.get(id.as_str()))
                    .map(|student| MatchedStudent {
                        student_id: student.id.clone(),
                        name: student.details.name.clone(),
                        interests: student.interests.clone(),
                        shared_areas: shared_interests(student, mentor)
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                    })
                    .collect();

                MentorGroup {
                    mentor_id: mentor.id.clone(),
                    name: mentor.details.name.clone(),
                    capacity: mentor.capacity,
                    spare_capacity: mentor.capacity.saturating_sub(held.len() as u32),
                    research_areas: mentor.research_areas.clone(),
                    students: members,
                }
            })
            .collect();

        let unmatched = outcome
            .unmatched_students
            .iter()
            .filter_map(|id| students.get(id.as_str()))
            .map(|student| ParticipantSummary {
                id: student.id.clone(),
                name: student.details.name.clone(),
            })
            .collect();

        MatchReportResponse {
            project: self.project.name.clone(),
            assignment: outcome.assignment.clone(),
            groups,
            unmatched,
            proposal_count: outcome.proposals.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectDuration, Requirements, Skills, Weekday};
    use chrono::{NaiveDate, NaiveTime};

    fn project(max_participants: u16) -> ProjectInfo {
        ProjectInfo {
            name: "Summer research".to_string(),
            manager: "Dr. Wang".to_string(),
            duration: ProjectDuration::ThreeMonths,
            max_participants,
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            weekly_start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            weekly_end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            activity_days: vec![Weekday::Tuesday, Weekday::Thursday],
        }
    }

    fn roster(max_participants: u16) -> ProjectRoster {
        ProjectRoster::new(project(max_participants), MatchPolicy::default(), 10)
    }

    fn named_student(id: &str, name: &str, interests: &[&str]) -> Student {
        let mut student = Student::new(id, interests, Skills::new(3, 3, 3), true);
        student.details.name = name.to_string();
        student
    }

    fn named_mentor(id: &str, name: &str, areas: &[&str], capacity: u32) -> Mentor {
        let mut mentor = Mentor::new(id, areas, Requirements::none(), capacity, true);
        mentor.details.name = name.to_string();
        mentor
    }

    #[test]
    fn test_duplicate_ids_conflict() {
        let mut roster = roster(20);
        roster.add_student(named_student("s1", "Li", &["ml"])).unwrap();
        roster.add_mentor(named_mentor("m1", "Zhao", &["ml"], 2)).unwrap();

        let err = roster.add_student(named_student("s1", "Li again", &["ml"])).unwrap_err();
        assert_eq!(err, RosterError::DuplicateStudent("s1".to_string()));
        assert_eq!(err.status_code(), 409);

        let err = roster.add_mentor(named_mentor("m1", "Zhao", &["ml"], 2)).unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_student_cap_enforced() {
        let mut roster = roster(5);
        for i in 0..5 {
            roster.add_student(named_student(&format!("s{i}"), "x", &["ml"])).unwrap();
        }

        let err = roster.add_student(named_student("s5", "x", &["ml"])).unwrap_err();
        assert_eq!(err, RosterError::ParticipantLimit { side: "students", limit: 5 });
        assert_eq!(err.status_code(), 422);
        assert_eq!(roster.students().len(), 5);
    }

    #[test]
    fn test_inactive_mentor_needs_policy() {
        let mut strict = roster(20);
        let err = strict.add_mentor(named_mentor("m1", "Zhao", &["ml"], 0)).unwrap_err();
        assert!(matches!(err, RosterError::Matching(MatchingError::InvalidCapacity { .. })));

        let policy = MatchPolicy {
            allow_inactive_mentors: true,
            ..MatchPolicy::default()
        };
        let mut lenient = ProjectRoster::new(project(20), policy, 10);
        assert!(lenient.add_mentor(named_mentor("m1", "Zhao", &["ml"], 0)).is_ok());
    }

    #[test]
    fn test_match_requires_both_sides() {
        let mut roster = roster(20);
        assert_eq!(roster.run_match().unwrap_err(), RosterError::NotReady);

        roster.add_student(named_student("s1", "Li", &["ml"])).unwrap();
        assert_eq!(roster.run_match().unwrap_err(), RosterError::NotReady);
    }

    #[test]
    fn test_report_groups_and_unmatched() {
        let mut roster = roster(20);
        roster.add_student(named_student("s1", "Li", &["ml", "nlp"])).unwrap();
        roster.add_student(named_student("s2", "Chen", &["ml"])).unwrap();
        roster.add_student(named_student("s3", "Sun", &["art"])).unwrap();
        roster.add_mentor(named_mentor("m1", "Zhao", &["nlp", "ml"], 1)).unwrap();
        roster.add_mentor(named_mentor("m2", "Qian", &["vision"], 2)).unwrap();

        let outcome = roster.run_match().unwrap();
        let report = roster.report(&outcome);

        assert_eq!(report.project, "Summer research");
        assert_eq!(report.groups.len(), 2);

        let first = &report.groups[0];
        assert_eq!(first.mentor_id, "m1");
        assert_eq!(first.spare_capacity, 0);
        assert_eq!(first.students.len(), 1);
        assert_eq!(first.students[0].student_id, "s1");
        assert_eq!(first.students[0].shared_areas, vec!["ml", "nlp"]);

        let second = &report.groups[1];
        assert!(second.students.is_empty());
        assert_eq!(second.spare_capacity, 2);

        let unmatched: Vec<&str> = report.unmatched.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(unmatched, vec!["s2", "s3"]);
        assert_eq!(report.proposal_count, outcome.proposals.len());
    }

    #[test]
    fn test_recommendations_follow_roster_order() {
        let mut roster = roster(20);
        roster.add_student(named_student("s1", "Li", &["ml"])).unwrap();
        roster.add_student(named_student("s2", "Chen", &["art"])).unwrap();
        roster.add_mentor(named_mentor("m1", "Zhao", &["ml"], 1)).unwrap();

        let recs = roster.recommendations();

        assert_eq!(recs[0].mentor_id.as_deref(), Some("m1"));
        assert_eq!(recs[1].mentor_id, None);
    }
}
