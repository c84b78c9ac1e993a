use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::categories::Category;
use crate::dashboard::{Dashboard, DashboardError};
use crate::fetch_log::FetchEntry;
use crate::filter::WindowSelector;
use crate::html::render_page;
use crate::view::ViewModel;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/", get(index))
        .route("/select", post(form_select))
        .route("/window", post(form_window))
        .route("/refresh", post(form_refresh))
        .route("/api/categories", get(api_categories))
        .route("/api/view", get(api_view))
        .route("/api/category", post(api_category))
        .route("/api/window", post(api_window))
        .route("/api/refresh", post(api_refresh))
        .route("/debug/fetches", get(debug_fetches))
        .nest_service("/static", ServeDir::new("static"))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match self {
            DashboardError::UnknownCategory(_) => StatusCode::NOT_FOUND,
            DashboardError::UnknownWindow(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// First render after startup fetches the default category.
async fn ensure_fetched(dashboard: &Dashboard) {
    if !dashboard.has_fetched() {
        dashboard.refresh().await;
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    ensure_fetched(&state.dashboard).await;
    let vm = state.dashboard.view();
    Html(render_page(&vm, state.dashboard.registry().list()))
}

#[derive(Deserialize)]
struct CategoryReq {
    #[serde(default)]
    category: Option<String>,
}

impl CategoryReq {
    /// Omitted or blank means the registry's default category.
    fn resolve(&self, dashboard: &Dashboard) -> String {
        match self.category.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => dashboard.registry().default_category().name.clone(),
        }
    }
}

#[derive(Deserialize)]
struct WindowReq {
    window: String,
}

async fn form_select(
    State(state): State<AppState>,
    Form(req): Form<CategoryReq>,
) -> Result<Redirect, DashboardError> {
    let name = req.resolve(&state.dashboard);
    state.dashboard.select_category(&name).await?;
    Ok(Redirect::to("/"))
}

async fn form_window(
    State(state): State<AppState>,
    Form(req): Form<WindowReq>,
) -> Result<Redirect, DashboardError> {
    let window: WindowSelector = req.window.parse()?;
    state.dashboard.select_window(window);
    Ok(Redirect::to("/"))
}

async fn form_refresh(State(state): State<AppState>) -> Redirect {
    state.dashboard.refresh().await;
    Redirect::to("/")
}

async fn api_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.dashboard.registry().list().to_vec())
}

async fn api_view(State(state): State<AppState>) -> Json<ViewModel> {
    ensure_fetched(&state.dashboard).await;
    Json(state.dashboard.view())
}

async fn api_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryReq>,
) -> Result<Json<ViewModel>, DashboardError> {
    let name = req.resolve(&state.dashboard);
    let vm = state.dashboard.select_category(&name).await?;
    Ok(Json(vm))
}

async fn api_window(
    State(state): State<AppState>,
    Json(req): Json<WindowReq>,
) -> Result<Json<ViewModel>, DashboardError> {
    let window: WindowSelector = req.window.parse()?;
    Ok(Json(state.dashboard.select_window(window)))
}

async fn api_refresh(State(state): State<AppState>) -> Json<ViewModel> {
    Json(state.dashboard.refresh().await)
}

#[derive(Deserialize)]
struct FetchesQuery {
    limit: Option<usize>,
}

async fn debug_fetches(
    State(state): State<AppState>,
    Query(q): Query<FetchesQuery>,
) -> Json<Vec<FetchEntry>> {
    let limit = q.limit.unwrap_or(50);
    Json(state.dashboard.fetch_log().snapshot_last_n(limit))
}
