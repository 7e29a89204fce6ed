use axum::{
    Extension, Form, Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::error::LOGIN_PATH;
use super::flash::{self, FlashMessage, redirect_with};
use super::{
    ApiError, ApiResponse, AppState, ChangePasswordForm, CredentialsForm, FormView, LoginView,
};
use crate::models::Actor;

const USER_KEY: &str = "user_id";
const CSRF_KEY: &str = "csrf_token";

const REGISTER_PATH: &str = "/register";

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the session into an [`Actor`] request extension.
///
/// Anonymous sessions, and sessions whose user has disappeared, are sent to
/// the login page.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(user_id) = session_user_id(&session).await? else {
        return Err(ApiError::Unauthorized("Not authenticated".to_string()));
    };

    let user = state
        .auth_service()
        .current_user(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load session user: {e}")))?;

    let Some(user) = user else {
        if let Err(e) = session.flush().await {
            tracing::warn!(user_id, "Failed to flush session of deleted user: {e}");
        }
        return Err(ApiError::Unauthorized("Session user no longer exists".to_string()));
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(Actor::from(&user));

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn login_page(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Response, ApiError> {
    if let Some(user_id) = session_user_id(&session).await?
        && let Ok(Some(user)) = state.auth_service().current_user(user_id).await
    {
        return Ok(Redirect::to(user.role.dashboard_path()).into_response());
    }

    let view = LoginView {
        flash: flash::take(&session).await,
        allow_registration: state.config().server.allow_registration,
    };
    Ok(Json(ApiResponse::success(view)).into_response())
}

/// POST /
/// Binds the session to the user on success; any failure looks the same.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await
        .map_err(|e| ApiError::from_auth(e, None, LOGIN_PATH))?;

    // Fresh session id for every login
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(CSRF_KEY, generate_token())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Redirect::to(user.role.dashboard_path()).into_response())
}

/// GET /register
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<FormView>>, ApiError> {
    ensure_registration_enabled(&state)?;

    Ok(Json(ApiResponse::success(FormView {
        flash: flash::take(&session).await,
    })))
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    ensure_registration_enabled(&state)?;

    state
        .auth_service()
        .register(&payload.username, &payload.password)
        .await
        .map_err(|e| ApiError::from_auth(e, None, REGISTER_PATH))?;

    Ok(redirect_with(
        LOGIN_PATH,
        FlashMessage::success("Usuario registrado con éxito"),
    ))
}

/// GET /logout
pub async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to flush session on logout: {e}");
    }
    Redirect::to(LOGIN_PATH)
}

/// POST /password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Form(payload): Form<ChangePasswordForm>,
) -> Result<Response, ApiError> {
    let home = actor.dashboard_path();

    state
        .auth_service()
        .change_password(&actor, &payload.current_password, &payload.new_password)
        .await
        .map_err(|e| ApiError::from_auth(e, Some(&actor), home))?;

    Ok(redirect_with(
        home,
        FlashMessage::success("Contraseña actualizada"),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

async fn session_user_id(session: &Session) -> Result<Option<i32>, ApiError> {
    session
        .get::<i32>(USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

fn ensure_registration_enabled(state: &AppState) -> Result<(), ApiError> {
    if state.config().server.allow_registration {
        Ok(())
    } else {
        Err(ApiError::NotFound("Registration is disabled".to_string()))
    }
}

/// Anti-forgery token bound to the session, created on first use.
pub async fn csrf_token(session: &Session) -> Result<String, ApiError> {
    let existing = session
        .get::<String>(CSRF_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    if let Some(token) = existing {
        return Ok(token);
    }

    let token = generate_token();
    session
        .insert(CSRF_KEY, &token)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    Ok(token)
}

pub async fn verify_csrf(session: &Session, actor: &Actor, provided: &str) -> Result<(), ApiError> {
    let expected = session
        .get::<String>(CSRF_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    match expected {
        Some(expected) if tokens_match(&expected, provided) => Ok(()),
        _ => {
            tracing::warn!(user_id = actor.id, "Rejected request with invalid form token");
            Err(ApiError::Forbidden {
                home: actor.dashboard_path(),
                message: "Formulario inválido o expirado".to_string(),
            })
        }
    }
}

fn tokens_match(expected: &str, provided: &str) -> bool {
    expected.len() == provided.len()
        && expected
            .bytes()
            .zip(provided.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Random 64 character hex token
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
