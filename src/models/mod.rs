// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, EvictionPolicy, MatchOutcome, MatchPolicy, Mentor, MentorDetails, MentorLoad,
    PreferenceLists, ProjectDuration, ProjectInfo, Proposal, ProposalResult, Recommendation,
    Requirements, Skills, Student, StudentDetails, Weekday, SKILL_MAX, SKILL_MIN,
};
pub use requests::{normalize_tags, AddMentorRequest, AddStudentRequest, CreateProjectRequest, LoginRequest};
pub use responses::{
    ErrorResponse, HealthResponse, LoginResponse, MatchReportResponse, MatchedStudent, MentorGroup,
    ParticipantResponse, ParticipantSummary, ProjectResponse, RecommendationsResponse, SessionResponse,
};
