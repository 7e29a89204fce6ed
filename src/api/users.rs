use axum::{
    Extension, Form, Json,
    extract::State,
    response::Response,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::flash::{self, FlashMessage, redirect_with};
use super::{ApiError, ApiResponse, AppState, CredentialsForm, FormView};
use crate::models::Actor;
use crate::policy::{self, Operation};

const CREATE_TECHNICIAN_PATH: &str = "/admin/crear_tecnico";

/// GET /admin/crear_tecnico
pub async fn create_technician_form(
    Extension(actor): Extension<Actor>,
    session: Session,
) -> Result<Json<ApiResponse<FormView>>, ApiError> {
    if !policy::permits(&actor, Operation::CreateTechnician, None) {
        return Err(ApiError::forbidden(&actor));
    }

    Ok(Json(ApiResponse::success(FormView {
        flash: flash::take(&session).await,
    })))
}

/// POST /admin/crear_tecnico
pub async fn create_technician(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Form(payload): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    let user = state
        .auth_service()
        .create_technician(&actor, &payload.username, &payload.password)
        .await
        .map_err(|e| ApiError::from_auth(e, Some(&actor), CREATE_TECHNICIAN_PATH))?;

    Ok(redirect_with(
        actor.dashboard_path(),
        FlashMessage::success(format!("Técnico '{}' creado", user.username)),
    ))
}
