use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use fridge_recipes::error::BoxError;
use fridge_recipes::ingredients::Classifier;
use fridge_recipes::inventory::{InventoryStore, NewFridgeItem};
use fridge_recipes::providers::LlmProvider;
use fridge_recipes::server::{configure_routes, AppState};
use fridge_recipes::RecipePipeline;
use serde_json::{json, Value};

/// Answers every prompt with the same text, or fails
struct CannedProvider(Result<&'static str, &'static str>);

#[async_trait]
impl LlmProvider for CannedProvider {
    fn provider_name(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, BoxError> {
        match self.0 {
            Ok(answer) => Ok(answer.to_string()),
            Err(message) => Err(message.into()),
        }
    }
}

fn state_with(provider: Option<CannedProvider>) -> web::Data<AppState> {
    let pipeline =
        provider.map(|provider| RecipePipeline::new(Box::new(provider) as Box<dyn LlmProvider>));
    web::Data::new(AppState::new(pipeline, Classifier::default()))
}

async fn post_json(state: web::Data<AppState>, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

const ANSWER: &str = r#"{"recipes":[{"title":"味噌鮭魚","description":"快速","steps":"1. 醃\n2. 烤"}]}"#;

#[actix_web::test]
async fn test_recipes_success() {
    let state = state_with(Some(CannedProvider(Ok(ANSWER))));
    let (status, body) = post_json(state, "/api/recipes", json!({ "items": "鮭魚, 味噌" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "recipes": [{ "title": "味噌鮭魚", "description": "快速", "steps": "1. 醃\n2. 烤" }]
        })
    );
}

#[actix_web::test]
async fn test_recipes_blank_items_is_bad_request() {
    let state = state_with(Some(CannedProvider(Ok(ANSWER))));
    let (status, body) = post_json(state, "/api/recipes", json!({ "items": "  ,  " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["recipes"], json!([]));
    assert_eq!(body["error"], "items is required");
}

#[actix_web::test]
async fn test_recipes_missing_items_is_bad_request() {
    let state = state_with(Some(CannedProvider(Ok(ANSWER))));
    let (status, _) = post_json(state, "/api/recipes", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_recipes_validation_comes_before_provider_check() {
    let (status, _) = post_json(state_with(None), "/api/recipes", json!({ "items": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        post_json(state_with(None), "/api/recipes", json!({ "items": "蛋" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("provider"));
}

#[actix_web::test]
async fn test_recipes_unparsed_answer_keeps_raw() {
    let state = state_with(Some(CannedProvider(Ok("我不知道"))));
    let (status, body) = post_json(state, "/api/recipes", json!({ "items": "蛋" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "recipes": [], "raw": "我不知道" }));
}

#[actix_web::test]
async fn test_recipes_upstream_failure_is_server_error() {
    let state = state_with(Some(CannedProvider(Err("quota exceeded"))));
    let (status, body) = post_json(state, "/api/recipes", json!({ "items": "蛋" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["recipes"], json!([]));
    assert!(body["error"].as_str().unwrap().contains("quota exceeded"));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let state = state_with(Some(CannedProvider(Ok(ANSWER))));
    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(("content-type", "application/json"))
        .set_payload("{items:")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_preview() {
    let (status, body) = post_json(
        state_with(None),
        "/api/preview",
        json!({ "items": "鮭魚、高麗菜/白飯\n蛋" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "items": [
                { "name": "鮭魚", "category": "海鮮" },
                { "name": "高麗菜", "category": "蔬菜" },
                { "name": "白飯", "category": "澱粉" },
                { "name": "蛋", "category": "其他" },
            ]
        })
    );
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(Some(CannedProvider(Ok(ANSWER)))))
            .configure(configure_routes),
    )
    .await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "canned");
    assert_eq!(body["images"], Value::Null);
}

#[actix_web::test]
async fn test_fridge_add_list_and_remove() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(None))
            .configure(configure_routes),
    )
    .await;

    for body in [
        json!({ "name": "鮭魚", "quantity": "2片", "expire_date": "2025-03-11" }),
        json!({ "name": " 豆腐 ", "expire_date": "", "note": "板豆腐" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/fridge")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/fridge").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "豆腐");
    assert_eq!(items[0]["expire_date"], Value::Null);
    assert_eq!(items[1]["name"], "鮭魚");
    assert_eq!(items[1]["quantity"], "2片");
    assert_eq!(items[1]["expire_date"], "2025-03-11");

    let req = test::TestRequest::delete().uri("/api/fridge/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "ok": true, "affectedRows": 1 }));

    let req = test::TestRequest::delete().uri("/api/fridge/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["affectedRows"], 0);

    let req = test::TestRequest::get().uri("/api/fridge").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_fridge_add_returns_inserted_row() {
    let (status, body) = post_json(
        state_with(None),
        "/api/fridge",
        json!({ "name": "高麗菜", "quantity": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["insertedId"], 1);
    assert_eq!(body["row"]["id"], 1);
    assert_eq!(body["row"]["quantity"], "1");
    assert!(body["row"]["created_at"].is_string());
}

#[actix_web::test]
async fn test_fridge_blank_name_is_bad_request() {
    let (status, body) =
        post_json(state_with(None), "/api/fridge", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "name is required" }));

    let (status, _) = post_json(state_with(None), "/api/fridge", json!({ "quantity": "1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_fridge_bad_expire_date_is_bad_request() {
    let (status, body) = post_json(
        state_with(None),
        "/api/fridge",
        json!({ "name": "牛奶", "expire_date": "next week" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("expire_date"));
}

#[actix_web::test]
async fn test_fridge_delete_invalid_id_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(state_with(None))
            .configure(configure_routes),
    )
    .await;

    for uri in ["/api/fridge/abc", "/api/fridge/0", "/api/fridge/-3"] {
        let req = test::TestRequest::delete().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid id");
    }
}

#[actix_web::test]
async fn test_fridge_uses_the_configured_store() {
    let store = InventoryStore::in_memory();
    store.add(NewFridgeItem::named("雞蛋")).await.unwrap();
    let state = web::Data::new(
        AppState::new(None, Classifier::default()).with_inventory(store),
    );

    let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;
    let req = test::TestRequest::get().uri("/api/fridge").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["items"][0]["name"], "雞蛋");
    assert_eq!(body["items"][0]["id"], 1);
}
