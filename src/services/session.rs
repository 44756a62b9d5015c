use crate::config::AuthSettings;
use crate::models::{MatchPolicy, ProjectInfo, SessionResponse};
use crate::services::roster::{ProjectRoster, RosterError};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors that can occur while authenticating or touching session state
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Missing or malformed Authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Session {0} has ended")]
    Expired(Uuid),

    #[error("No project has been created in this session")]
    NoProject,

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl SessionError {
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::InvalidPassword
            | SessionError::MissingToken
            | SessionError::InvalidToken(_)
            | SessionError::Expired(_) => 401,
            SessionError::NoProject => 404,
            SessionError::Roster(err) => err.status_code(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::InvalidPassword => "invalid_password",
            SessionError::MissingToken | SessionError::InvalidToken(_) | SessionError::Expired(_) => "unauthorized",
            SessionError::NoProject => "no_project",
            SessionError::Roster(err) => err.kind(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// One logged-in operator's workspace
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub roster: Option<ProjectRoster>,
    pub students_added: usize,
    pub mentors_added: usize,
}

impl Session {
    fn new(id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            expires_at,
            roster: None,
            students_added: 0,
            mentors_added: 0,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Start a new project, dropping any previous roster
    pub fn start_project(&mut self, project: ProjectInfo, policy: MatchPolicy, max_mentors: usize) {
        self.roster = Some(ProjectRoster::new(project, policy, max_mentors));
        self.students_added = 0;
        self.mentors_added = 0;
    }

    pub fn roster(&self) -> Result<&ProjectRoster, SessionError> {
        self.roster.as_ref().ok_or(SessionError::NoProject)
    }

    pub fn roster_mut(&mut self) -> Result<&mut ProjectRoster, SessionError> {
        self.roster.as_mut().ok_or(SessionError::NoProject)
    }

    pub fn summary(&self) -> SessionResponse {
        SessionResponse {
            session_id: self.id,
            project: self.roster.as_ref().map(|r| r.project().name.clone()),
            students_added: self.students_added,
            mentors_added: self.mentors_added,
        }
    }
}

/// Issued token and the session it opens
#[derive(Debug, Clone)]
pub struct Login {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Password gate plus in-memory session store
///
/// Sessions are keyed by the `sub` claim of the bearer token. Logging out
/// removes the session, so a still-valid token stops working. Sessions past
/// their expiry are refused and swept on the next login.
pub struct SessionManager {
    password: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionManager {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            password: settings.password.clone(),
            encoding: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            ttl: Duration::seconds(settings.session_ttl_secs as i64),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Check the shared password and open a fresh session
    pub async fn login(&self, password: &str) -> Result<Login, SessionError> {
        if password != self.password {
            tracing::warn!("Rejected login attempt");
            return Err(SessionError::InvalidPassword);
        }

        let session_id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: session_id.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        if sessions.len() < before {
            tracing::debug!("Dropped {} expired sessions", before - sessions.len());
        }
        sessions.insert(session_id, Session::new(session_id, expires_at));
        drop(sessions);

        tracing::info!("Opened session {}", session_id);

        Ok(Login {
            token,
            session_id,
            expires_at,
        })
    }

    /// Resolve an `Authorization: Bearer <token>` header to a live session id
    pub async fn authorize(&self, header: Option<&str>) -> Result<Uuid, SessionError> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(SessionError::MissingToken)?;

        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        let session_id = Uuid::parse_str(&data.claims.sub).map_err(|_| SessionError::MissingToken)?;

        let live = match self.sessions.read().await.get(&session_id) {
            Some(session) => !session.is_expired(Utc::now()),
            None => return Err(SessionError::Expired(session_id)),
        };

        if !live {
            self.sessions.write().await.remove(&session_id);
            return Err(SessionError::Expired(session_id));
        }

        Ok(session_id)
    }

    /// Drop a session together with its roster and counters
    pub async fn logout(&self, session_id: Uuid) -> Result<(), SessionError> {
        match self.sessions.write().await.remove(&session_id) {
            Some(_) => {
                tracing::info!("Closed session {}", session_id);
                Ok(())
            }
            None => Err(SessionError::Expired(session_id)),
        }
    }

    /// Run `f` with shared access to the session
    pub async fn read<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&Session) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .filter(|session| !session.is_expired(Utc::now()))
            .ok_or(SessionError::Expired(session_id))?;
        f(session)
    }

    /// Run `f` with exclusive access to the session
    pub async fn update<T>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .filter(|session| !session.is_expired(Utc::now()))
            .ok_or(SessionError::Expired(session_id))?;
        f(session)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
