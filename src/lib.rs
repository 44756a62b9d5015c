//! Mentor Match - stable student-mentor assignment for project-based mentoring
//!
//! This library builds ranked preference lists for students and mentors and
//! runs capacitated deferred acceptance over them. The `routes` and `services`
//! modules wrap it in a small session-based HTTP service.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    build_preferences, check_time_compatibility, match_students, recommend, time_compatible, validate_roster,
    CompatibilityScorer, DeferredAcceptance, InterestOverlap, MatchInput, MatchingError, PreferenceBuilder,
};
pub use models::{
    Availability, EvictionPolicy, MatchOutcome, MatchPolicy, Mentor, PreferenceLists, Recommendation,
    Requirements, Skills, Student,
};
