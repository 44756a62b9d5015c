use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest value on the ordinal skill scale
pub const SKILL_MIN: u8 = 1;
/// Highest value on the ordinal skill scale
pub const SKILL_MAX: u8 = 5;

/// Student self-assessment on the 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub math: u8,
    pub programming: u8,
    pub english: u8,
}

impl Skills {
    pub fn new(math: u8, programming: u8, english: u8) -> Self {
        Self { math, programming, english }
    }

    /// True if every rating is on the 1-5 scale
    pub fn in_range(&self) -> bool {
        [self.math, self.programming, self.english]
            .iter()
            .all(|v| (SKILL_MIN..=SKILL_MAX).contains(v))
    }
}

/// Mentor's minimum thresholds on the same dimensions as [`Skills`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(rename = "minMath")]
    pub min_math: u8,
    #[serde(rename = "minProgramming")]
    pub min_programming: u8,
    #[serde(rename = "minEnglish")]
    pub min_english: u8,
}

impl Requirements {
    pub fn new(min_math: u8, min_programming: u8, min_english: u8) -> Self {
        Self { min_math, min_programming, min_english }
    }

    /// The weakest possible requirement set, every student qualifies
    pub fn none() -> Self {
        Self::new(SKILL_MIN, SKILL_MIN, SKILL_MIN)
    }

    pub fn in_range(&self) -> bool {
        [self.min_math, self.min_programming, self.min_english]
            .iter()
            .all(|v| (SKILL_MIN..=SKILL_MAX).contains(v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Availability as confirmed by a participant against the project schedule
///
/// Only `matches_project` takes part in matching. The schedule fields are a
/// copy of the project's window, kept for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "matchesProject")]
    pub matches_project: bool,
    #[serde(rename = "projectDays", default)]
    pub project_days: Vec<Weekday>,
    #[serde(rename = "projectStartTime", default)]
    pub project_start_time: Option<NaiveTime>,
    #[serde(rename = "projectEndTime", default)]
    pub project_end_time: Option<NaiveTime>,
}

impl Availability {
    /// Availability with no schedule attached
    pub fn new(matches_project: bool) -> Self {
        Self {
            matches_project,
            project_days: vec![],
            project_start_time: None,
            project_end_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Applicant record as handed to the matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub interests: Vec<String>,
    pub skills: Skills,
    pub availability: Availability,
    #[serde(default)]
    pub details: StudentDetails,
}

impl Student {
    pub fn new(id: impl Into<String>, interests: &[&str], skills: Skills, matches_project: bool) -> Self {
        Self {
            id: id.into(),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            skills,
            availability: Availability::new(matches_project),
            details: StudentDetails::default(),
        }
    }
}

/// Supervisor record as handed to the matching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: String,
    #[serde(rename = "researchAreas")]
    pub research_areas: Vec<String>,
    pub requirements: Requirements,
    pub capacity: u32,
    pub availability: Availability,
    #[serde(default)]
    pub details: MentorDetails,
}

impl Mentor {
    pub fn new(
        id: impl Into<String>,
        research_areas: &[&str],
        requirements: Requirements,
        capacity: u32,
        matches_project: bool,
    ) -> Self {
        Self {
            id: id.into(),
            research_areas: research_areas.iter().map(|s| s.to_string()).collect(),
            requirements,
            capacity,
            availability: Availability::new(matches_project),
            details: MentorDetails::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectDuration {
    OneMonth,
    TwoMonths,
    ThreeMonths,
    HalfYear,
    FullYear,
}

/// Project context all participants of one matching run belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub manager: String,
    pub duration: ProjectDuration,
    #[serde(rename = "maxParticipants")]
    pub max_participants: u16,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(rename = "weeklyStartTime")]
    pub weekly_start_time: NaiveTime,
    #[serde(rename = "weeklyEndTime")]
    pub weekly_end_time: NaiveTime,
    #[serde(rename = "activityDays")]
    pub activity_days: Vec<Weekday>,
}

impl ProjectInfo {
    /// Availability of a participant who did (or did not) confirm the project schedule
    pub fn availability(&self, matches_project: bool) -> Availability {
        Availability {
            matches_project,
            project_days: self.activity_days.clone(),
            project_start_time: Some(self.weekly_start_time),
            project_end_time: Some(self.weekly_end_time),
        }
    }
}

/// Ordered candidate lists for both sides of one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceLists {
    /// student id -> mentor ids, most preferred first
    pub students: BTreeMap<String, Vec<String>>,
    /// mentor id -> student ids, most preferred first
    pub mentors: BTreeMap<String, Vec<String>>,
}

impl PreferenceLists {
    pub fn student(&self, id: &str) -> &[String] {
        self.students.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn mentor(&self, id: &str) -> &[String] {
        self.mentors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Which holder a full mentor gives up when a better-ranked student proposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// The first holder, in holding order, that the proposer outranks
    #[default]
    FirstDisplaceable,
    /// The worst-ranked holder, if the proposer outranks it
    WeakestHolder,
}

/// Knobs for one matching run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchPolicy {
    pub eviction: EvictionPolicy,
    /// Accept capacity 0 as "inactive mentor" instead of rejecting it
    pub allow_inactive_mentors: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProposalResult {
    Accepted,
    Displaced { evicted: String },
    Rejected,
}

/// One step of the deferred-acceptance loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub result: ProposalResult,
}

/// Students held by one mentor at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorLoad {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub capacity: u32,
    pub students: Vec<String>,
}

impl MentorLoad {
    pub fn spare(&self) -> u32 {
        self.capacity.saturating_sub(self.students.len() as u32)
    }
}

/// Result of one matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// student id -> mentor id
    pub assignment: BTreeMap<String, String>,
    #[serde(rename = "unmatchedStudents")]
    pub unmatched_students: Vec<String>,
    #[serde(rename = "mentorLoads")]
    pub mentor_loads: Vec<MentorLoad>,
    pub proposals: Vec<Proposal>,
}

impl MatchOutcome {
    pub fn mentor_of(&self, student_id: &str) -> Option<&str> {
        self.assignment.get(student_id).map(String::as_str)
    }

    pub fn load_of(&self, mentor_id: &str) -> Option<&MentorLoad> {
        self.mentor_loads.iter().find(|l| l.mentor_id == mentor_id)
    }

    pub fn mentors_with_spare_capacity(&self) -> impl Iterator<Item = &MentorLoad> {
        self.mentor_loads.iter().filter(|l| l.spare() > 0)
    }
}

/// Quick single-mentor preview for a student, capacity is not considered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "studentId")]
    pub student_id: String,
    #[serde(rename = "mentorId")]
    pub mentor_id: Option<String>,
    pub score: u32,
}
