use crate::models::domain::{
    Mentor, MentorDetails, ProjectDuration, ProjectInfo, Requirements, Skills, Student,
    StudentDetails, Weekday,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to log in and open a session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request to create (or replace) the session's project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_project_window"))]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub manager: String,
    pub duration: ProjectDuration,
    #[serde(rename = "maxParticipants", default = "default_max_participants")]
    #[validate(range(min = 5, max = 100))]
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
    #[validate(length(min = 1))]
    pub activity_days: Vec<Weekday>,
}

fn default_max_participants() -> u16 {
    20
}

fn default_true() -> bool {
    true
}

fn validate_project_window(req: &CreateProjectRequest) -> Result<(), ValidationError> {
    if req.end_date < req.start_date {
        return Err(ValidationError::new("end_date_before_start_date"));
    }
    if req.weekly_end_time <= req.weekly_start_time {
        return Err(ValidationError::new("weekly_window_empty"));
    }
    Ok(())
}

impl From<CreateProjectRequest> for ProjectInfo {
    fn from(req: CreateProjectRequest) -> Self {
        let mut activity_days = req.activity_days;
        activity_days.sort();
        activity_days.dedup();

        ProjectInfo {
            name: req.name.trim().to_string(),
            manager: req.manager.trim().to_string(),
            duration: req.duration,
            max_participants: req.max_participants,
            start_date: req.start_date,
            end_date: req.end_date,
            weekly_start_time: req.weekly_start_time,
            weekly_end_time: req.weekly_end_time,
            activity_days,
        }
    }
}

/// Request to add a student to the current project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddStudentRequest {
    #[validate(length(min = 1, max = 64), custom(function = "validate_not_blank"))]
    pub id: String,
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_tags"))]
    pub interests: Vec<String>,
    #[validate(range(min = 1, max = 5))]
    pub math: u8,
    #[validate(range(min = 1, max = 5))]
    pub programming: u8,
    #[validate(range(min = 1, max = 5))]
    pub english: u8,
    #[serde(rename = "matchesProject", default = "default_true")]
    pub matches_project: bool,
}

impl AddStudentRequest {
    pub fn into_student(self, project: &ProjectInfo) -> Student {
        Student {
            id: self.id.trim().to_string(),
            interests: normalize_tags(&self.interests),
            skills: Skills::new(self.math, self.programming, self.english),
            availability: project.availability(self.matches_project),
            details: StudentDetails {
                name: self.name.trim().to_string(),
                grade: self.grade,
                major: self.major,
                email: self.email,
                phone: self.phone,
            },
        }
    }
}

/// Request to add a mentor to the current project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMentorRequest {
    #[validate(length(min = 1, max = 64), custom(function = "validate_not_blank"))]
    pub id: String,
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "researchAreas")]
    #[validate(custom(function = "validate_tags"))]
    pub research_areas: Vec<String>,
    #[serde(rename = "maxStudents")]
    #[validate(range(max = 10))]
    pub max_students: u32,
    #[serde(rename = "minMath")]
    #[validate(range(min = 1, max = 5))]
    pub min_math: u8,
    #[serde(rename = "minProgramming")]
    #[validate(range(min = 1, max = 5))]
    pub min_programming: u8,
    #[serde(rename = "minEnglish")]
    #[validate(range(min = 1, max = 5))]
    pub min_english: u8,
    #[serde(rename = "matchesProject", default = "default_true")]
    pub matches_project: bool,
}

impl AddMentorRequest {
    pub fn into_mentor(self, project: &ProjectInfo) -> Mentor {
        Mentor {
            id: self.id.trim().to_string(),
            research_areas: normalize_tags(&self.research_areas),
            requirements: Requirements::new(self.min_math, self.min_programming, self.min_english),
            capacity: self.max_students,
            availability: project.availability(self.matches_project),
            details: MentorDetails {
                name: self.name.trim().to_string(),
                title: self.title,
                department: self.department,
                email: self.email,
                phone: self.phone,
            },
        }
    }
}

/// Split comma-separated entries, trim them and drop blanks
///
/// Both `,` and the full-width `，` separate tags.
pub fn normalize_tags(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split([',', '，']))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if normalize_tags(tags).is_empty() {
        return Err(ValidationError::new("no_tags"));
    }
    Ok(())
}
