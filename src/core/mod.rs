// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod preferences;
pub mod scoring;
pub mod validation;

pub use filters::{check_time_compatibility, meets_requirements, time_compatible};
pub use matcher::{match_students, DeferredAcceptance, MatchInput};
pub use preferences::{build_preferences, recommend, PreferenceBuilder};
pub use scoring::{interest_overlap, shared_interests, CompatibilityScorer, InterestOverlap};
pub use validation::{validate_match_input, validate_roster, MatchingError};
