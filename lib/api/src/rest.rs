use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use remedex_core::{Language, LocalizedRemedy, RemedyRecord};
use remedex_engine::MatchEngine;
use remedex_storage::CatalogStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Everything the handlers need, built once by the binary.
pub struct AppState {
    pub engine: MatchEngine,
    pub store: CatalogStore,
}

impl AppState {
    pub fn new(engine: MatchEngine, store: CatalogStore) -> Self {
        Self { engine, store }
    }
}

#[derive(Deserialize)]
struct MatchRequest {
    query: String,
    #[serde(default)]
    lang: Option<String>,
}

#[derive(Serialize)]
struct MatchResponse {
    score: f32,
    remedy: RemedyRecord,
    localized: LocalizedRemedy,
}

#[derive(Serialize)]
struct CatalogInfo {
    remedies: usize,
    dimension: Option<usize>,
    model: String,
    threshold: f32,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Route table, shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(health))
        .route("/match", web::post().to(find_match))
        .route("/catalog", web::get().to(catalog_info))
        .route("/catalog/reload", web::post().to(reload_catalog));
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

async fn find_match(
    state: web::Data<Arc<AppState>>,
    req: web::Json<MatchRequest>,
) -> ActixResult<HttpResponse> {
    let query = req.query.trim();
    if query.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "'query' must not be empty"
        })));
    }

    let lang = match req.lang.as_deref() {
        None => Language::default(),
        Some(code) => match code.parse::<Language>() {
            Ok(lang) => lang,
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "error": e
                })));
            }
        },
    };

    match state.engine.find_best_match(query).await {
        Ok(Some(found)) => {
            let localized = found.remedy.localized(lang);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "result": MatchResponse {
                    score: found.score,
                    remedy: found.remedy,
                    localized,
                }
            })))
        }
        Ok(None) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": null
        }))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": e.to_string()
        }))),
    }
}

async fn catalog_info(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let catalog = state.engine.catalog().snapshot();
    let info = CatalogInfo {
        remedies: catalog.len(),
        dimension: catalog.dimension(),
        model: state.engine.model().to_string(),
        threshold: state.engine.threshold(),
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({ "result": info })))
}

async fn reload_catalog(state: web::Data<Arc<AppState>>) -> ActixResult<HttpResponse> {
    let store = state.store.clone();
    let loaded = web::block(move || store.load()).await?;

    match loaded {
        Ok(catalog) => {
            let remedies = catalog.len();
            state.engine.catalog().replace(catalog);
            info!(remedies, "catalog reloaded");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "result": { "remedies": remedies }
            })))
        }
        Err(e) => {
            error!(error = %e, "catalog reload failed, keeping current catalog");
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            })))
        }
    }
}
