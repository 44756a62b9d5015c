// Service exports
pub mod roster;
pub mod session;

pub use roster::{ProjectRoster, RosterError};
pub use session::{Login, Session, SessionError, SessionManager};
