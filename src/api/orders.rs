use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::{Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{csrf_token, verify_csrf};
use super::flash::{self, FlashMessage, redirect_with};
use super::validation::{normalize_search_query, validate_order_id};
use super::{
    ApiError, ApiResponse, AppState, DashboardView, EditOrderView, NewOrderView, OrderDto,
    SearchQuery, StatusForm, UserDto,
};
use crate::models::{Actor, OrderForm};
use crate::policy::{self, Operation};

const NEW_ORDER_PATH: &str = "/nueva";

fn edit_path(id: i32) -> String {
    format!("/editar/{id}")
}

/// GET /dashboard
pub async fn dashboard(Extension(actor): Extension<Actor>) -> Redirect {
    Redirect::to(actor.dashboard_path())
}

/// GET /admin/dashboard
pub async fn admin_dashboard(
    state: State<Arc<AppState>>,
    actor: Extension<Actor>,
    session: Session,
    query: Query<SearchQuery>,
) -> Result<Json<ApiResponse<DashboardView>>, ApiError> {
    scoped_dashboard(state, actor, session, query, Operation::ViewAdminDashboard).await
}

/// GET /tecnico/dashboard
pub async fn technician_dashboard(
    state: State<Arc<AppState>>,
    actor: Extension<Actor>,
    session: Session,
    query: Query<SearchQuery>,
) -> Result<Json<ApiResponse<DashboardView>>, ApiError> {
    scoped_dashboard(state, actor, session, query, Operation::ViewTechnicianDashboard).await
}

async fn scoped_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Query(query): Query<SearchQuery>,
    operation: Operation,
) -> Result<Json<ApiResponse<DashboardView>>, ApiError> {
    if !policy::permits(&actor, operation, None) {
        return Err(ApiError::forbidden(&actor));
    }

    let q = normalize_search_query(&query.q);
    let orders = state
        .order_service()
        .list(&actor, q)
        .await
        .map_err(|e| ApiError::from_order(e, &actor, actor.dashboard_path()))?;

    let view = DashboardView {
        user: UserDto::from(&actor),
        q: q.to_string(),
        orders: orders.into_iter().map(OrderDto::from).collect(),
        flash: flash::take(&session).await,
        csrf_token: csrf_token(&session).await?,
    };

    Ok(Json(ApiResponse::success(view)))
}

/// GET /nueva
pub async fn new_order_form(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
) -> Result<Json<ApiResponse<NewOrderView>>, ApiError> {
    let technicians = if actor.is_admin() {
        state
            .auth_service()
            .list_technicians()
            .await
            .map_err(|e| ApiError::from_auth(e, Some(&actor), NEW_ORDER_PATH))?
            .into_iter()
            .map(UserDto::from)
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(ApiResponse::success(NewOrderView {
        user: UserDto::from(&actor),
        technicians,
        flash: flash::take(&session).await,
    })))
}

/// POST /nueva
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Form(form): Form<OrderForm>,
) -> Result<Response, ApiError> {
    state
        .order_service()
        .create(&actor, &form)
        .await
        .map_err(|e| ApiError::from_order(e, &actor, NEW_ORDER_PATH))?;

    Ok(redirect_with(
        actor.dashboard_path(),
        FlashMessage::success("Orden registrada con éxito"),
    ))
}

/// GET /editar/{id}
pub async fn edit_order_form(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EditOrderView>>, ApiError> {
    let id = validate_order_id(&id)?;

    let order = state
        .order_service()
        .get(&actor, id)
        .await
        .map_err(|e| ApiError::from_order(e, &actor, actor.dashboard_path()))?;

    Ok(Json(ApiResponse::success(EditOrderView {
        user: UserDto::from(&actor),
        order: OrderDto::from(order),
        flash: flash::take(&session).await,
        csrf_token: csrf_token(&session).await?,
    })))
}

/// POST /editar/{id}
pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Form(form): Form<OrderForm>,
) -> Result<Response, ApiError> {
    let id = validate_order_id(&id)?;

    state
        .order_service()
        .update(&actor, id, &form)
        .await
        .map_err(|e| ApiError::from_order(e, &actor, &edit_path(id)))?;

    Ok(redirect_with(
        actor.dashboard_path(),
        FlashMessage::success("Orden actualizada con éxito"),
    ))
}

/// POST /eliminar/{id}
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = validate_order_id(&id)?;

    state
        .order_service()
        .delete(&actor, id)
        .await
        .map_err(|e| ApiError::from_order(e, &actor, actor.dashboard_path()))?;

    Ok(redirect_with(
        actor.dashboard_path(),
        FlashMessage::success("Orden eliminada correctamente"),
    ))
}

/// POST /estado/{id}/{new_status}
///
/// Requires the session's form token in `csrf_token`.
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    session: Session,
    Path((id, new_status)): Path<(String, String)>,
    Form(form): Form<StatusForm>,
) -> Result<Response, ApiError> {
    let id = validate_order_id(&id)?;
    verify_csrf(&session, &actor, &form.csrf_token).await?;

    state
        .order_service()
        .change_status(&actor, id, &new_status)
        .await
        .map_err(|e| ApiError::from_order(e, &actor, actor.dashboard_path()))?;

    Ok(redirect_with(
        actor.dashboard_path(),
        FlashMessage::success("Estado actualizado"),
    ))
}
