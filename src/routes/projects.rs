use crate::models::{
    AddMentorRequest, AddStudentRequest, CreateProjectRequest, ParticipantResponse, ProjectInfo,
    ProjectResponse, RecommendationsResponse,
};
use crate::routes::{authorize, session_error, validation_failed, AppState};
use crate::services::SessionError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

/// Configure project and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/project", web::post().to(create_project))
        .route("/project/students", web::post().to(add_student))
        .route("/project/mentors", web::post().to(add_mentor))
        .route("/project/recommendations", web::get().to(recommendations))
        .route("/project/match", web::post().to(run_match));
}

/// Create project endpoint
///
/// POST /api/v1/project
///
/// Replaces any project already in the session; the roster starts empty.
async fn create_project(
    state: web::Data<AppState>,
    req: web::Json<CreateProjectRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let project: ProjectInfo = req.into_inner().into();
    let policy = state.policy;
    let max_mentors = state.max_mentors;

    let result = state
        .sessions
        .update(session_id, |session| {
            session.start_project(project.clone(), policy, max_mentors);
            Ok(ProjectResponse {
                project,
                students: 0,
                mentors: 0,
            })
        })
        .await;

    match result {
        Ok(response) => {
            tracing::info!("Session {} started project {}", session_id, response.project.name);
            HttpResponse::Created().json(response)
        }
        Err(e) => session_error(&e),
    }
}

/// Add student endpoint
///
/// POST /api/v1/project/students
///
/// Request body:
/// ```json
/// {
///   "id": "2024001",
///   "name": "string",
///   "interests": ["machine learning", "nlp"],
///   "math": 4,
///   "programming": 5,
///   "english": 3,
///   "matchesProject": true
/// }
/// ```
async fn add_student(
    state: web::Data<AppState>,
    req: web::Json<AddStudentRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let req = req.into_inner();
    let result = state
        .sessions
        .update(session_id, |session| {
            let roster = session.roster_mut()?;
            let student = req.into_student(roster.project());
            let id = student.id.clone();
            roster.add_student(student)?;
            session.students_added += 1;

            Ok(ParticipantResponse {
                id,
                students_added: session.students_added,
                mentors_added: session.mentors_added,
            })
        })
        .await;

    match result {
        Ok(response) => {
            tracing::debug!("Session {} added student {}", session_id, response.id);
            HttpResponse::Created().json(response)
        }
        Err(e) => session_error(&e),
    }
}

/// Add mentor endpoint
///
/// POST /api/v1/project/mentors
async fn add_mentor(
    state: web::Data<AppState>,
    req: web::Json<AddMentorRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    let req = req.into_inner();
    let result = state
        .sessions
        .update(session_id, |session| {
            let roster = session.roster_mut()?;
            let mentor = req.into_mentor(roster.project());
            let id = mentor.id.clone();
            roster.add_mentor(mentor)?;
            session.mentors_added += 1;

            Ok(ParticipantResponse {
                id,
                students_added: session.students_added,
                mentors_added: session.mentors_added,
            })
        })
        .await;

    match result {
        Ok(response) => {
            tracing::debug!("Session {} added mentor {}", session_id, response.id);
            HttpResponse::Created().json(response)
        }
        Err(e) => session_error(&e),
    }
}

/// Best single mentor per student, capacity not considered
async fn recommendations(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    let result = state
        .sessions
        .read(session_id, |session| Ok(session.roster()?.recommendations()))
        .await;

    match result {
        Ok(recommendations) => HttpResponse::Ok().json(RecommendationsResponse { recommendations }),
        Err(e) => session_error(&e),
    }
}

/// Match endpoint
///
/// POST /api/v1/project/match
///
/// Builds preferences for the whole roster and runs deferred acceptance.
/// The roster is copied out of the session store first so the run does not
/// hold the lock.
async fn run_match(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    let roster = match state
        .sessions
        .read(session_id, |session| Ok(session.roster()?.clone()))
        .await
    {
        Ok(roster) => roster,
        Err(e) => return session_error(&e),
    };

    match roster.run_match() {
        Ok(outcome) => HttpResponse::Ok().json(roster.report(&outcome)),
        Err(e) => session_error(&SessionError::from(e)),
    }
}
