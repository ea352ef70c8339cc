use actix_cors::Cors;
use actix_web::http::{header, StatusCode};
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::ingredients::{preview, split, Classifier};
use crate::inventory::{InventoryStore, NewFridgeItem};
use crate::pipelines::RecipePipeline;

/// Shared by every request
pub struct AppState {
    /// `None` when no model provider could be configured
    pub pipeline: Option<RecipePipeline>,
    pub classifier: Classifier,
    pub inventory: InventoryStore,
}

impl AppState {
    /// Starts with an empty in-memory fridge
    pub fn new(pipeline: Option<RecipePipeline>, classifier: Classifier) -> Self {
        AppState {
            pipeline,
            classifier,
            inventory: InventoryStore::in_memory(),
        }
    }

    pub fn with_inventory(mut self, inventory: InventoryStore) -> Self {
        self.inventory = inventory;
        self
    }

    /// A missing model provider is not fatal: the preview and the fridge
    /// still work and recipe requests answer with a server error
    pub async fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        let classifier = config.classifier.build()?;
        let inventory = match &config.inventory.path {
            Some(path) => InventoryStore::open(path).await?,
            None => {
                warn!("No inventory.path configured; fridge items are kept in memory only");
                InventoryStore::in_memory()
            }
        };

        let pipeline = match RecipePipeline::from_config(config) {
            Ok(pipeline) => {
                info!(
                    "Recipe suggestions via {} (images: {})",
                    pipeline.provider_name(),
                    pipeline.image_provider_name().unwrap_or("disabled")
                );
                Some(pipeline)
            }
            Err(e) => {
                warn!("Recipe suggestions unavailable: {}", e);
                None
            }
        };

        Ok(AppState::new(pipeline, classifier).with_inventory(inventory))
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemsRequest {
    #[serde(default)]
    pub items: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::resource("/api/recipes").route(web::post().to(suggest_recipes)))
        .service(web::resource("/api/preview").route(web::post().to(preview_items)))
        .service(
            web::resource("/api/fridge")
                .route(web::get().to(list_fridge))
                .route(web::post().to(add_fridge_item)),
        )
        .service(web::resource("/api/fridge/{id}").route(web::delete().to(remove_fridge_item)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let response = if req.path() == "/api/recipes" {
        failure(StatusCode::BAD_REQUEST, err.to_string())
    } else {
        HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
    };
    InternalError::from_response(err, response).into()
}

fn failure(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "recipes": [],
        "error": message.into(),
    }))
}

async fn suggest_recipes(
    state: web::Data<AppState>,
    body: web::Json<ItemsRequest>,
) -> HttpResponse {
    let names = split(body.items.as_deref().unwrap_or_default());
    if names.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "items is required");
    }

    let Some(pipeline) = state.pipeline.as_ref() else {
        error!("Recipe request received but no model provider is configured");
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing model provider configuration",
        );
    };

    match pipeline.run(&names).await {
        Ok(result) if result.is_upstream_failure() => {
            HttpResponse::InternalServerError().json(result)
        }
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) if e.is_validation() => failure(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!("Recipe suggestion failed: {}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn preview_items(
    state: web::Data<AppState>,
    body: web::Json<ItemsRequest>,
) -> HttpResponse {
    let items = preview(
        body.items.as_deref().unwrap_or_default(),
        &state.classifier,
    );
    HttpResponse::Ok().json(json!({ "items": items }))
}

async fn list_fridge(state: web::Data<AppState>) -> HttpResponse {
    let items = state.inventory.list().await;
    HttpResponse::Ok().json(json!({ "items": items }))
}

async fn add_fridge_item(
    state: web::Data<AppState>,
    body: web::Json<NewFridgeItem>,
) -> HttpResponse {
    match state.inventory.add(body.into_inner()).await {
        Ok(item) => HttpResponse::Ok().json(json!({
            "ok": true,
            "insertedId": item.id,
            "row": item,
        })),
        Err(RecipeError::Validation(message)) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        Err(e) => {
            error!("Failed to store fridge item: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to store fridge item",
                "message": e.to_string(),
            }))
        }
    }
}

async fn remove_fridge_item(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = match path.into_inner().trim().parse::<u64>() {
        Ok(id) if id > 0 => id,
        _ => return HttpResponse::BadRequest().json(json!({ "error": "invalid id" })),
    };

    match state.inventory.remove(id).await {
        Ok(affected) => HttpResponse::Ok().json(json!({
            "ok": true,
            "affectedRows": affected,
        })),
        Err(e) => {
            error!("Failed to remove fridge item {}: {}", id, e);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to remove fridge item",
                "message": e.to_string(),
            }))
        }
    }
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    let pipeline = state.pipeline.as_ref();
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": pipeline.map(|p| p.provider_name()),
        "images": pipeline.and_then(|p| p.image_provider_name()),
    }))
}

/// Serve the API until the process is stopped
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let state = AppState::from_config(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let state = web::Data::new(state);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                    .max_age(3600),
            )
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
