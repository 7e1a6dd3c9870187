use actix_cors::Cors;
use actix_web::error::{InternalError, UrlencodedError};
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use parking_lot::{RwLock, RwLockWriteGuard};
use propai_core::{PropertyQuery, Regressor};
use propai_storage::ArtifactStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, info, warn};

use crate::chart::{importance_rows, ImportanceRow};
use crate::config::{DashboardConfig, ModelCard};
use crate::dashboard::{render, render_unavailable, Notice};
use crate::state::{DashboardState, Page};
use crate::valuation::Valuation;

/// Shared server state: cached artifacts, display config and the dashboard view
pub struct AppContext {
    store: Arc<ArtifactStore>,
    config: DashboardConfig,
    state: RwLock<DashboardState>,
}

impl AppContext {
    pub fn new(store: Arc<ArtifactStore>, config: DashboardConfig) -> Self {
        Self {
            store,
            config,
            state: RwLock::new(DashboardState::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &RwLock<DashboardState> {
        &self.state
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<String>,
}

#[derive(Serialize)]
struct InsightsResponse<'a> {
    model: &'static str,
    model_card: &'a ModelCard,
    available: bool,
    importance: Vec<ImportanceRow>,
}

pub struct RestApi;

impl RestApi {
    /// Bind and serve until the server stops; a bind failure is returned
    pub async fn start(ctx: Arc<AppContext>, bind: &str, port: u16) -> std::io::Result<()> {
        let server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(ctx.clone()))
                .configure(RestApi::configure)
        })
        .bind((bind, port))?;

        info!("HTTP server listening on {}:{}", bind, port);
        server.run().await
    }

    /// Run the server on its own thread with a dedicated actix system.
    ///
    /// The thread's result is the server's: joining it yields the bind error
    /// when the address cannot be taken.
    pub fn spawn(ctx: Arc<AppContext>, bind: String, port: u16) -> JoinHandle<std::io::Result<()>> {
        std::thread::spawn(move || {
            let sys = actix_web::rt::System::new();
            sys.block_on(RestApi::start(ctx, &bind, port))
        })
    }

    /// Route table, shared by the server and tests
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::FormConfig::default().error_handler(form_error))
            .route("/", web::get().to(index))
            .route("/predict", web::post().to(predict_form))
            .route("/api/health", web::get().to(health))
            .route("/api/locations", web::get().to(list_locations))
            .route("/api/predict", web::post().to(predict))
            .route("/api/insights", web::get().to(insights));
    }
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn error_status(e: &propai_core::Error) -> StatusCode {
    match e {
        propai_core::Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn error_kind(e: &propai_core::Error) -> &'static str {
    match e {
        propai_core::Error::InvalidQuery(_) => "invalid-query",
        _ => "inference-failure",
    }
}

fn unavailable_json(e: &propai_storage::LoadError) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(serde_json::json!({
        "error": e.to_string(),
        "kind": e.kind(),
    }))
}

async fn index(
    ctx: web::Data<Arc<AppContext>>,
    query: web::Query<PageQuery>,
) -> ActixResult<HttpResponse> {
    let artifacts = match ctx.store().get() {
        Ok(a) => a,
        Err(e) => {
            return Ok(html(
                StatusCode::SERVICE_UNAVAILABLE,
                render_unavailable(ctx.config(), &e),
            ))
        }
    };

    // render the state this request produced, not a later writer's
    let state = match query.page.as_deref().and_then(|p| p.parse::<Page>().ok()) {
        Some(page) => {
            let mut state = ctx.state().write();
            state.navigate(page);
            RwLockWriteGuard::downgrade(state)
        }
        None => ctx.state().read(),
    };
    Ok(html(StatusCode::OK, render(ctx.config(), &artifacts, &state, None)))
}

async fn predict_form(
    ctx: web::Data<Arc<AppContext>>,
    form: web::Form<PropertyQuery>,
) -> ActixResult<HttpResponse> {
    let artifacts = match ctx.store().get() {
        Ok(a) => a,
        Err(e) => {
            return Ok(html(
                StatusCode::SERVICE_UNAVAILABLE,
                render_unavailable(ctx.config(), &e),
            ))
        }
    };

    let query = form.into_inner();
    match Valuation::compute(&artifacts, ctx.config(), &query) {
        Ok(valuation) => {
            // downgrade without unlocking so the page shows this valuation
            let mut state = ctx.state().write();
            state.show_result(valuation);
            let state = RwLockWriteGuard::downgrade(state);
            Ok(html(
                StatusCode::OK,
                render(ctx.config(), &artifacts, &state, None),
            ))
        }
        Err(e) => {
            error!("Prediction failed for {:?}: {}", query, e);
            let notice = Notice::Error(e.to_string());
            let state = ctx.state().read();
            Ok(html(
                error_status(&e),
                render(ctx.config(), &artifacts, &state, Some(&notice)),
            ))
        }
    }
}

/// Malformed form fields: show the dashboard with an inline error
fn form_error(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected dashboard form: {}", err);
    let notice = Notice::Error(format!("Invalid property details: {}", err));
    let response = match req.app_data::<web::Data<Arc<AppContext>>>() {
        Some(ctx) => match ctx.store().get() {
            Ok(artifacts) => {
                let state = ctx.state().read();
                html(
                    StatusCode::BAD_REQUEST,
                    render(ctx.config(), &artifacts, &state, Some(&notice)),
                )
            }
            Err(e) => html(
                StatusCode::SERVICE_UNAVAILABLE,
                render_unavailable(ctx.config(), &e),
            ),
        },
        None => HttpResponse::BadRequest().body(err.to_string()),
    };
    InternalError::from_response(err, response).into()
}

async fn health(ctx: web::Data<Arc<AppContext>>) -> ActixResult<HttpResponse> {
    match ctx.store().get() {
        Ok(artifacts) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "model": artifacts.regressor().kind(),
        }))),
        Err(e) => Ok(HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unavailable",
            "version": env!("CARGO_PKG_VERSION"),
            "error": e.to_string(),
            "kind": e.kind(),
        }))),
    }
}

async fn list_locations(ctx: web::Data<Arc<AppContext>>) -> ActixResult<HttpResponse> {
    match ctx.store().get() {
        Ok(artifacts) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": artifacts.encoder().sorted_classes()
        }))),
        Err(e) => Ok(unavailable_json(&e)),
    }
}

async fn predict(
    ctx: web::Data<Arc<AppContext>>,
    req: web::Json<PropertyQuery>,
) -> ActixResult<HttpResponse> {
    let artifacts = match ctx.store().get() {
        Ok(a) => a,
        Err(e) => return Ok(unavailable_json(&e)),
    };

    match Valuation::compute(&artifacts, ctx.config(), &req) {
        Ok(valuation) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": valuation
        }))),
        Err(e) => {
            error!("Prediction failed for {:?}: {}", req.0, e);
            Ok(HttpResponse::build(error_status(&e)).json(serde_json::json!({
                "error": e.to_string(),
                "kind": error_kind(&e),
            })))
        }
    }
}

async fn insights(ctx: web::Data<Arc<AppContext>>) -> ActixResult<HttpResponse> {
    let artifacts = match ctx.store().get() {
        Ok(a) => a,
        Err(e) => return Ok(unavailable_json(&e)),
    };

    let ranking = artifacts.predictor(ctx.config().bounds).importance_ranking();
    let response = InsightsResponse {
        model: artifacts.regressor().kind(),
        model_card: &ctx.config().model_card,
        available: ranking.is_some(),
        importance: ranking.as_deref().map(importance_rows).unwrap_or_default(),
    };
    info!("Serving insights for {} model", response.model);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": response })))
}
