use crate::models::domain::{ProjectInfo, Recommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Issued session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    #[serde(rename = "expiresAt")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Session summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    pub project: Option<String>,
    #[serde(rename = "studentsAdded")]
    pub students_added: usize,
    #[serde(rename = "mentorsAdded")]
    pub mentors_added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub project: ProjectInfo,
    pub students: usize,
    pub mentors: usize,
}

/// Acknowledges a student or mentor added to the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub id: String,
    #[serde(rename = "studentsAdded")]
    pub students_added: usize,
    #[serde(rename = "mentorsAdded")]
    pub mentors_added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedStudent {
    #[serde(rename = "studentId")]
    pub student_id: String,
    pub name: String,
    pub interests: Vec<String>,
    #[serde(rename = "sharedAreas")]
    pub shared_areas: Vec<String>,
}

/// One mentor and the students it ended up with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorGroup {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub name: String,
    pub capacity: u32,
    #[serde(rename = "spareCapacity")]
    pub spare_capacity: u32,
    #[serde(rename = "researchAreas")]
    pub research_areas: Vec<String>,
    pub students: Vec<MatchedStudent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: String,
    pub name: String,
}

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReportResponse {
    pub project: String,
    /// student id -> mentor id
    pub assignment: BTreeMap<String, String>,
    pub groups: Vec<MentorGroup>,
    pub unmatched: Vec<ParticipantSummary>,
    #[serde(rename = "proposalCount")]
    pub proposal_count: usize,
}
