use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cashload_core::domain::filter::{
    parse_agency_filter, parse_period_filter, parse_status_filter, FleetFilters,
};
use cashload_core::domain::terminal::Terminal;
use cashload_core::fleet::{self, AgencyOption, FleetView, TerminalDetail};
use cashload_core::notify::{LogNotifier, NoticeReport, ReplenishmentNotifier};
use cashload_core::session::DashboardSession;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = cashload_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let registry = match settings.load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "terminal registry load failed; starting with demo fleet");
            cashload_core::registry::TerminalRegistry::seeded()
        }
    };
    tracing::info!(terminals = registry.len(), "terminal registry ready");

    let state = AppState::new(DashboardSession::new(registry), Arc::new(LogNotifier));
    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/view", get(get_view))
        .route("/filters", put(put_filters))
        .route("/fleet", get(get_fleet))
        .route("/agencies", get(get_agencies))
        .route("/terminals/:id", get(get_terminal_detail))
        .route("/terminals/:id/pending-reload", put(put_pending_reload))
        .route("/selection", put(put_selection))
        .route("/notices", post(post_notices))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<DashboardSession>>,
    notifier: Arc<dyn ReplenishmentNotifier>,
}

impl AppState {
    fn new(session: DashboardSession, notifier: Arc<dyn ReplenishmentNotifier>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            notifier,
        }
    }
}

async fn get_view(State(state): State<AppState>) -> Json<FleetView> {
    let mut session = state.session.lock().await;
    Json(session.view())
}

async fn put_filters(
    State(state): State<AppState>,
    Json(filters): Json<FleetFilters>,
) -> Json<FleetView> {
    let mut session = state.session.lock().await;
    session.set_filters(filters);
    Json(session.view())
}

#[derive(Debug, Default, Deserialize)]
struct FleetQuery {
    agency: Option<String>,
    status: Option<String>,
    period: Option<String>,
}

impl FleetQuery {
    fn into_filters(self) -> anyhow::Result<FleetFilters> {
        Ok(FleetFilters {
            agency: self.agency.as_deref().and_then(parse_agency_filter),
            status: match self.status.as_deref() {
                Some(s) => parse_status_filter(s)?,
                None => None,
            },
            period: match self.period.as_deref() {
                Some(s) => parse_period_filter(s)?,
                None => None,
            },
        })
    }
}

/// Stateless evaluation: neither the session filters nor the stored statuses change.
async fn get_fleet(
    State(state): State<AppState>,
    Query(query): Query<FleetQuery>,
) -> Result<Json<FleetView>, StatusCode> {
    let filters = query.into_filters().map_err(|e| {
        tracing::warn!(error = %e, "invalid fleet query");
        StatusCode::BAD_REQUEST
    })?;

    let session = state.session.lock().await;
    Ok(Json(fleet::evaluate(session.registry().snapshot(), &filters)))
}

async fn get_agencies(State(state): State<AppState>) -> Json<Vec<AgencyOption>> {
    let session = state.session.lock().await;
    Json(fleet::agency_options(session.registry().snapshot()))
}

async fn get_terminal_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TerminalDetail>, StatusCode> {
    let session = state.session.lock().await;
    session.detail(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
struct PendingReloadRequest {
    amount: f64,
}

async fn put_pending_reload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PendingReloadRequest>,
) -> Result<Json<Terminal>, StatusCode> {
    let mut session = state.session.lock().await;
    match session.set_pending_reload_amount(&id, req.amount) {
        Ok(terminal) => Ok(Json(terminal.clone())),
        Err(e) if e.is_not_found() => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::warn!(terminal_id = %id, error = %e, "rejected pending reload amount");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SelectionRequest {
    #[serde(default)]
    terminal_id: Option<String>,
}

async fn put_selection(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Json<Option<TerminalDetail>> {
    let mut session = state.session.lock().await;
    session.select_terminal_for_detail(req.terminal_id);
    Json(session.selected_detail())
}

async fn post_notices(State(state): State<AppState>) -> Result<Json<NoticeReport>, StatusCode> {
    let batch = {
        let mut session = state.session.lock().await;
        // Refresh statuses so the batch matches what the dashboard shows.
        session.view();
        session.pending_notices()
    };

    let report = state.notifier.send(&batch).await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "replenishment notice failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(
        notice_id = %report.notice_id,
        notified = report.notified,
        total_amount = report.total_amount,
        "replenishment notices sent"
    );
    Ok(Json(report))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &cashload_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
