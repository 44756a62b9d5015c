use crate::models::{LoginRequest, LoginResponse};
use crate::routes::{authorize, session_error, validation_failed, AppState};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

/// Configure session routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/session/login", web::post().to(login))
        .route("/session/logout", web::post().to(logout))
        .route("/session", web::get().to(get_session));
}

/// Login endpoint
///
/// POST /api/v1/session/login
///
/// Request body:
/// ```json
/// { "password": "string" }
/// ```
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(&errors);
    }

    match state.sessions.login(&req.password).await {
        Ok(login) => HttpResponse::Ok().json(LoginResponse {
            token: login.token,
            session_id: login.session_id,
            expires_at: login.expires_at,
        }),
        Err(e) => session_error(&e),
    }
}

/// Logout endpoint, drops the project and counters with the session
async fn logout(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    match state.sessions.logout(session_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => session_error(&e),
    }
}

/// Session summary endpoint
async fn get_session(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session_id = match authorize(&state, &http_req).await {
        Ok(id) => id,
        Err(e) => return session_error(&e),
    };

    match state.sessions.read(session_id, |session| Ok(session.summary())).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => session_error(&e),
    }
}
