//! End-to-end tests of the request pipeline against in-memory backends.

use std::sync::Arc;

use geek_api::{ApiRequest, ApiResponse, App, AppConfig, MapVariables};
use geek_auth::PasswordHasher;
use geek_cache::{Cache, MemoryStore};
use geek_catalog::CatalogStore;
use geek_db::{Executor, SqliteDb};
use geek_media::MemoryImageHost;
use geek_observability::LogSink;
use http::Method;
use serde_json::{json, Value};

const EMAIL: &str = "admin@aluraGeek.com";
const PASSWORD: &str = "geek1234";
const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";
const MISSING_ID: &str = "8f14e45f-ceea-467f-a0e6-9b1d2c3a4b5c";

struct Harness {
    app: App,
    db: SqliteDb,
    images: Arc<MemoryImageHost>,
    token: String,
}

impl Harness {
    async fn new() -> Self {
        Self::with_vars(&[]).await
    }

    async fn with_vars(extra: &[(&str, &str)]) -> Self {
        let hash = PasswordHasher::new().hash(PASSWORD).unwrap();
        let mut vars = MapVariables::new()
            .with("cloudinary_cloud_name", "memory")
            .with("cloudinary_api_key", "1234")
            .with("cloudinary_api_secret", "shh")
            .with("admin_email", EMAIL)
            .with("admin_password_hash", hash);
        for (key, value) in extra {
            vars = vars.with(key, *value);
        }
        let config = AppConfig::load(&vars).unwrap();

        let db = SqliteDb::in_memory().await.unwrap();
        let catalog = CatalogStore::new(db.clone());
        catalog.migrate().await.unwrap();
        let images = Arc::new(MemoryImageHost::new());
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        let (sink, _entries) = LogSink::buffer();
        let app = App::new(config, catalog, images.clone(), cache).with_log_sink(sink);

        let response = app
            .handle(
                ApiRequest::new(Method::POST, "/api/auth/login")
                    .with_json(&json!({"email": EMAIL, "password": PASSWORD})),
            )
            .await;
        assert_eq!(response.status, 200);
        let token = response.json_body()["token"].as_str().unwrap().to_string();

        Self {
            app,
            db,
            images,
            token,
        }
    }

    /// Make every later write to `products` fail.
    async fn reject_product_writes(&self) {
        for event in ["INSERT", "UPDATE"] {
            let sql = format!(
                "CREATE TRIGGER reject_{event} BEFORE {event} ON products \
                 BEGIN SELECT RAISE(ABORT, 'products are read-only'); END"
            );
            self.db.execute(&sql, &[]).await.unwrap();
        }
    }

    async fn get(&self, path: &str) -> ApiResponse {
        self.app.handle(ApiRequest::get(path)).await
    }

    async fn admin(&self, method: Method, path: &str, body: Value) -> ApiResponse {
        let request = ApiRequest::new(method, path)
            .with_header("authorization", format!("Bearer {}", self.token))
            .with_json(&body);
        self.app.handle(request).await
    }

    async fn create_category(&self, name: &str) -> String {
        let response = self
            .admin(Method::POST, "/api/category", json!({"name": name}))
            .await;
        assert_eq!(response.status, 201, "{:?}", response.json_body());
        response.json_body()["id"].as_str().unwrap().to_string()
    }

    async fn create_product(&self, name: &str, category: &str) -> Value {
        let response = self
            .admin(
                Method::POST,
                "/api/product",
                json!({
                    "name": name,
                    "price": 49.9,
                    "description": "Edição de colecionador",
                    "base64Image": PNG,
                    "categoryName": category,
                }),
            )
            .await;
        assert_eq!(response.status, 201, "{:?}", response.json_body());
        response.json_body()
    }
}

#[tokio::test]
async fn test_routing_errors() {
    let h = Harness::new().await;

    let response = h.get("/api/nope").await;
    assert_eq!(response.status, 404);
    assert_eq!(response.json_body()["error"], "Rota não encontrada");

    let response = h
        .app
        .handle(ApiRequest::new(Method::DELETE, "/api/products"))
        .await;
    assert_eq!(response.status, 405);
    assert_eq!(response.header("allow"), Some("GET"));

    let response = h.get("/api/product/not-a-uuid").await;
    assert_eq!(response.status, 400);
    assert_eq!(response.json_body()["error"], "Identificador inválido");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let h = Harness::new().await;
    let response = h
        .app
        .handle(ApiRequest::get("/api/products").with_header("x-request-id", "req-42"))
        .await;
    assert_eq!(response.header("x-request-id"), Some("req-42"));

    let response = h.get("/api/products").await;
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_admin_routes_need_a_session() {
    let h = Harness::new().await;
    let response = h
        .app
        .handle(ApiRequest::new(Method::POST, "/api/category").with_json(&json!({"name": "Consoles"})))
        .await;
    assert_eq!(response.status, 401);
    assert_eq!(response.json_body()["error"], "Não autorizado");

    let response = h
        .app
        .handle(
            ApiRequest::new(Method::POST, "/api/category")
                .with_header("authorization", "Bearer sess_forged")
                .with_json(&json!({"name": "Consoles"})),
        )
        .await;
    assert_eq!(response.status, 401);
}

#[tokio::test]
async fn test_login_session_logout() {
    let h = Harness::new().await;

    let response = h
        .app
        .handle(
            ApiRequest::new(Method::POST, "/api/auth/login")
                .with_json(&json!({"email": EMAIL, "password": "wrong-pass1"})),
        )
        .await;
    assert_eq!(response.status, 401);
    assert_eq!(response.json_body()["error"], "Credenciais inválidas");

    let response = h
        .app
        .handle(
            ApiRequest::new(Method::POST, "/api/auth/login")
                .with_json(&json!({"email": "ADMIN@aluraGeek.com", "password": PASSWORD})),
        )
        .await;
    assert_eq!(response.status, 200);
    let token = response.json_body()["token"].as_str().unwrap().to_string();
    let cookie = response.header("set-cookie").unwrap();
    assert!(cookie.starts_with(&format!("geek_session={token};")));
    assert!(cookie.contains("HttpOnly"));

    let cookie_header = format!("theme=dark; geek_session={token}");
    let session = h
        .app
        .handle(ApiRequest::get("/api/auth/session").with_header("cookie", cookie_header.as_str()))
        .await;
    assert_eq!(session.status, 200);
    assert_eq!(session.json_body()["email"], EMAIL);
    assert!(session.json_body()["expiresAt"].is_string());

    let logout = h
        .app
        .handle(ApiRequest::new(Method::POST, "/api/auth/logout").with_header("cookie", cookie_header.as_str()))
        .await;
    assert_eq!(logout.status, 204);
    assert!(logout.header("set-cookie").unwrap().contains("Max-Age=0"));

    let session = h
        .app
        .handle(ApiRequest::get("/api/auth/session").with_header("cookie", cookie_header.as_str()))
        .await;
    assert_eq!(session.status, 401);
}

#[tokio::test]
async fn test_category_lifecycle() {
    let h = Harness::new().await;

    let response = h
        .admin(Method::POST, "/api/category", json!({"name": "  Consoles "}))
        .await;
    assert_eq!(response.status, 201);
    let body = response.json_body();
    assert_eq!(body["name"], "Consoles");
    assert_eq!(body["revalidated"], json!({"home": true, "category": true}));
    let id = body["id"].as_str().unwrap().to_string();

    let duplicate = h
        .admin(Method::POST, "/api/category", json!({"name": "Consoles"}))
        .await;
    assert_eq!(duplicate.status, 400);
    assert_eq!(duplicate.json_body()["error"], "Categoria já existente");

    h.create_category("Diversos").await;
    let clash = h
        .admin(Method::PATCH, &format!("/api/category/{id}"), json!({"name": "Diversos"}))
        .await;
    assert_eq!(clash.status, 400);
    assert_eq!(clash.json_body()["error"], "Categoria com mesmo nome já existe");

    let renamed = h
        .admin(Method::PUT, &format!("/api/category/{id}"), json!({"name": "Videogames"}))
        .await;
    assert_eq!(renamed.status, 200);
    assert_eq!(renamed.json_body()["name"], "Videogames");

    let list = h.get("/api/categories").await.json_body();
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Videogames", "Diversos"]);

    let deleted = h
        .admin(Method::DELETE, &format!("/api/category/{id}"), json!({}))
        .await;
    assert_eq!(deleted.status, 200);
    assert_eq!(h.get(&format!("/api/category/{id}")).await.status, 404);
}

#[tokio::test]
async fn test_category_with_products_cannot_be_deleted() {
    let h = Harness::new().await;
    let id = h.create_category("Consoles").await;
    h.create_product("Nintendo 64", "Consoles").await;

    let response = h
        .admin(Method::DELETE, &format!("/api/category/{id}"), json!({}))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(
        response.json_body(),
        json!({
            "error": "Ação inválida",
            "message": "A categoria possui produtos, mova ou exclua os produtos antes de excluí-la",
        })
    );
}

#[tokio::test]
async fn test_create_product() {
    let h = Harness::new().await;

    let missing = h
        .admin(
            Method::POST,
            "/api/product",
            json!({
                "name": "Caneca Mario",
                "price": 39.9,
                "description": "Caneca de cerâmica",
                "base64Image": PNG,
                "categoryName": "Canecas",
            }),
        )
        .await;
    assert_eq!(missing.status, 400);
    assert_eq!(
        missing.json_body()["error"],
        "Categoria não existe, selecione uma categoria existente ou crie uma nova antes de adicionar o produto"
    );
    assert!(h.images.uploads().is_empty());

    let category_id = h.create_category("Canecas").await;
    let product = h.create_product("Caneca Mario", "Canecas").await;
    assert_eq!(product["price"], 49.9);
    assert_eq!(product["categoryId"], category_id.as_str());
    assert_eq!(product["imageUrl"], h.images.uploads()[0].url.as_str());
    assert_eq!(
        product["revalidated"],
        json!({"home": true, "product": true, "category": true})
    );

    let duplicate = h
        .admin(
            Method::POST,
            "/api/product",
            json!({
                "name": "Caneca Mario",
                "price": 10,
                "description": "Outra",
                "base64Image": PNG,
                "categoryName": "Canecas",
            }),
        )
        .await;
    assert_eq!(duplicate.status, 400);
    assert_eq!(duplicate.json_body()["error"], "Produto já existente");

    let id = product["id"].as_str().unwrap();
    let fetched = h.get(&format!("/api/product/{id}")).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.json_body()["name"], "Caneca Mario");
}

#[tokio::test]
async fn test_create_product_validation() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;

    let response = h
        .admin(
            Method::POST,
            "/api/product",
            json!({"name": "", "price": -1, "description": "x", "base64Image": PNG, "categoryName": "Canecas"}),
        )
        .await;
    assert_eq!(response.status, 400);
    let body = response.json_body();
    assert_eq!(body["error"], "Produto inválido");
    assert!(body["fields"]["name"].is_array());
    assert!(body["fields"]["price"].is_array());

    let response = h
        .admin(
            Method::POST,
            "/api/product",
            json!({
                "name": "Caneca",
                "price": 10,
                "description": "x",
                "base64Image": "data:text/plain;base64,aGk=",
                "categoryName": "Canecas",
            }),
        )
        .await;
    assert_eq!(response.status, 400);
    assert!(response.json_body()["fields"]["base64Image"].is_array());

    let response = h
        .app
        .handle(
            ApiRequest::new(Method::POST, "/api/product")
                .with_header("authorization", format!("Bearer {}", h.token))
                .with_body("{not json"),
        )
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.json_body()["error"], "JSON inválido");
}

#[tokio::test]
async fn test_upload_failure_writes_nothing() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    h.images.fail_uploads(true);

    let response = h
        .admin(
            Method::POST,
            "/api/product",
            json!({
                "name": "Caneca",
                "price": 10,
                "description": "x",
                "base64Image": PNG,
                "categoryName": "Canecas",
            }),
        )
        .await;
    assert_eq!(response.status, 500);
    assert_eq!(
        response.json_body()["error"],
        "Erro desconhecido ao fazer upload da imagem"
    );
    assert_eq!(h.get("/api/products").await.json_body(), json!([]));
}

#[tokio::test]
async fn test_failed_insert_discards_fresh_upload() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    h.reject_product_writes().await;

    let response = h
        .admin(
            Method::POST,
            "/api/product",
            json!({
                "name": "Caneca",
                "price": 10,
                "description": "x",
                "base64Image": PNG,
                "categoryName": "Canecas",
            }),
        )
        .await;
    assert_ne!(response.status, 201);
    let uploads = h.images.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(h.images.destroyed(), vec![uploads[0].public_id.clone()]);
    assert_eq!(h.get("/api/products").await.json_body(), json!([]));
}

#[tokio::test]
async fn test_failed_update_discards_fresh_upload_and_keeps_old_image() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    let product = h.create_product("Caneca Zelda", "Canecas").await;
    let id = product["id"].as_str().unwrap();
    h.reject_product_writes().await;

    let response = h
        .admin(
            Method::PATCH,
            &format!("/api/product/{id}"),
            json!({"base64Image": PNG}),
        )
        .await;
    assert_ne!(response.status, 200);
    let uploads = h.images.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(h.images.destroyed(), vec![uploads[1].public_id.clone()]);

    let stored = h.get(&format!("/api/product/{id}")).await.json_body();
    assert_eq!(stored["imageUrl"], uploads[0].url.as_str());
}

#[tokio::test]
async fn test_update_replaces_image_then_destroys_old_one() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    let new_category = h.create_category("Colecionáveis").await;
    let product = h.create_product("Caneca Zelda", "Canecas").await;
    let id = product["id"].as_str().unwrap();

    let response = h
        .admin(
            Method::PATCH,
            &format!("/api/product/{id}"),
            json!({"price": 59.9, "base64Image": PNG, "categoryName": "Colecionáveis"}),
        )
        .await;
    assert_eq!(response.status, 200, "{:?}", response.json_body());
    let body = response.json_body();
    assert_eq!(body["price"], 59.9);
    assert_eq!(body["name"], "Caneca Zelda");
    assert_eq!(body["categoryId"], new_category.as_str());
    assert_eq!(body["imageUrl"], h.images.uploads()[1].url.as_str());
    assert!(body.get("warning").is_none());
    assert_eq!(h.images.destroyed(), vec![h.images.uploads()[0].public_id.clone()]);
}

#[tokio::test]
async fn test_update_warns_when_old_image_survives() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    h.create_product("Caneca Link", "Canecas").await;
    let product = h.create_product("Caneca Zelda", "Canecas").await;
    let id = product["id"].as_str().unwrap();

    let clash = h
        .admin(Method::PUT, &format!("/api/product/{id}"), json!({"name": "Caneca Link"}))
        .await;
    assert_eq!(clash.status, 400);
    assert_eq!(clash.json_body()["error"], "Produto com mesmo nome já existe");

    h.images.fail_destroys(true);
    let response = h
        .admin(Method::PUT, &format!("/api/product/{id}"), json!({"base64Image": PNG}))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.json_body()["warning"],
        "Produto atualizado, porém sua imagem antiga não pôde ser excluída"
    );
}

#[tokio::test]
async fn test_delete_product() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    let product = h.create_product("Caneca Mario", "Canecas").await;
    let id = product["id"].as_str().unwrap();

    h.images.fail_destroys(true);
    let response = h
        .admin(Method::DELETE, &format!("/api/product/{id}"), json!({}))
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.json_body()["warning"],
        "Produto deletado, porém sua imagem não pôde ser excluída"
    );
    assert_eq!(h.get(&format!("/api/product/{id}")).await.status, 404);

    let again = h
        .admin(Method::DELETE, &format!("/api/product/{id}"), json!({}))
        .await;
    assert_eq!(again.status, 404);
    assert_eq!(again.json_body()["id"], id);
}

#[tokio::test]
async fn test_search() {
    let h = Harness::new().await;
    h.create_category("Consoles").await;
    h.create_category("Canecas").await;
    h.create_product("Nintendo 64", "Consoles").await;
    h.create_product("Caneca Mario", "Canecas").await;

    let response = h.get("/api/products/search?q=%20%20").await;
    assert_eq!(response.status, 400);
    assert_eq!(
        response.json_body()["error"],
        "Parâmetros da URL inválidos, o parâmetro precisa ser `q=VALOR`"
    );

    let by_name = h.get("/api/products/search?q=mario").await.json_body();
    assert_eq!(by_name.as_array().unwrap().len(), 1);
    assert_eq!(by_name[0]["name"], "Caneca Mario");

    let by_category = h.get("/api/products/search?q=console").await.json_body();
    assert_eq!(by_category[0]["name"], "Nintendo 64");

    let wildcard = h.get("/api/products/search?q=%25").await.json_body();
    assert_eq!(wildcard, json!([]));
}

#[tokio::test]
async fn test_page_cache_and_revalidation() {
    let h = Harness::new().await;
    h.create_category("Consoles").await;

    let first = h.get("/api/pages/home").await;
    assert_eq!(first.status, 200);
    assert_eq!(first.header("x-cache"), Some("MISS"));
    assert_eq!(first.header("cache-control"), Some("public, s-maxage=3600"));
    assert_eq!(first.json_body()["categories"][0]["products"], json!([]));

    let second = h.get("/api/pages/home").await;
    assert_eq!(second.header("x-cache"), Some("HIT"));
    assert_eq!(second.json_body(), first.json_body());

    let product = h.create_product("Nintendo 64", "Consoles").await;
    let third = h.get("/api/pages/home").await;
    assert_eq!(third.header("x-cache"), Some("MISS"));
    assert_eq!(
        third.json_body()["categories"][0]["products"][0]["name"],
        "Nintendo 64"
    );

    let id = product["id"].as_str().unwrap();
    let page = h.get(&format!("/api/pages/product/{id}")).await.json_body();
    assert_eq!(page["product"]["id"], id);
    assert_eq!(page["category"]["name"], "Consoles");
    assert_eq!(page["category"]["products"].as_array().unwrap().len(), 1);

    let missing = h.get(&format!("/api/pages/product/{MISSING_ID}")).await;
    assert_eq!(missing.status, 404);
    assert_eq!(missing.json_body()["error"], "Produto não encontrado");
}

#[tokio::test]
async fn test_category_change_revalidates_previous_category_page() {
    let h = Harness::new().await;
    let old = h.create_category("Canecas").await;
    let new = h.create_category("Colecionáveis").await;
    let product = h.create_product("Caneca Zelda", "Canecas").await;
    let id = product["id"].as_str().unwrap();

    let old_page = format!("/api/pages/category/{old}");
    assert_eq!(h.get(&old_page).await.header("x-cache"), Some("MISS"));
    let warm = h.get(&old_page).await;
    assert_eq!(warm.header("x-cache"), Some("HIT"));
    assert_eq!(warm.json_body()["products"][0]["id"], id);

    let response = h
        .admin(
            Method::PATCH,
            &format!("/api/product/{id}"),
            json!({"categoryName": "Colecionáveis"}),
        )
        .await;
    assert_eq!(response.status, 200, "{:?}", response.json_body());
    let body = response.json_body();
    assert_eq!(body["categoryId"], new.as_str());
    assert_eq!(
        body["revalidated"],
        json!({"home": true, "product": true, "category": true})
    );

    let after = h.get(&old_page).await;
    assert_eq!(after.header("x-cache"), Some("MISS"));
    assert_eq!(after.json_body()["products"], json!([]));
}

#[tokio::test]
async fn test_move_products() {
    let h = Harness::new().await;
    let from = h.create_category("Canecas").await;
    let to = h.create_category("Colecionáveis").await;
    let a = h.create_product("Caneca Mario", "Canecas").await;
    let b = h.create_product("Caneca Luigi", "Canecas").await;
    let ids = vec![a["id"].clone(), b["id"].clone()];

    let missing = h
        .admin(
            Method::POST,
            "/api/products/move",
            json!({"productIds": [a["id"], MISSING_ID], "categoryName": "Colecionáveis"}),
        )
        .await;
    assert_eq!(missing.status, 404);
    assert_eq!(missing.json_body()["id"], MISSING_ID);

    let response = h
        .admin(
            Method::POST,
            "/api/products/move",
            json!({"productIds": ids, "categoryName": "Colecionáveis"}),
        )
        .await;
    assert_eq!(response.status, 200, "{:?}", response.json_body());
    let body = response.json_body();
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["categoryId"] == to.as_str()));
    assert_eq!(body["revalidated"]["/"], true);
    assert_eq!(body["revalidated"][format!("/category/{from}")], true);
    assert_eq!(body["revalidated"][format!("/category/{to}")], true);

    let emptied = h.get(&format!("/api/category/{from}")).await.json_body();
    assert_eq!(emptied["products"], json!([]));
}

#[tokio::test]
async fn test_remove_products() {
    let h = Harness::new().await;
    h.create_category("Canecas").await;
    let a = h.create_product("Caneca Mario", "Canecas").await;
    let b = h.create_product("Caneca Luigi", "Canecas").await;

    let invalid = h
        .admin(Method::POST, "/api/products/remove", json!({"productIds": []}))
        .await;
    assert_eq!(invalid.status, 400);

    h.images.fail_destroys(true);
    let response = h
        .admin(
            Method::POST,
            "/api/products/remove",
            json!({"productIds": [a["id"], b["id"]]}),
        )
        .await;
    assert_eq!(response.status, 200);
    let body = response.json_body();
    assert_eq!(body["products"].as_array().unwrap().len(), 2);
    assert_eq!(body["warnings"].as_array().unwrap().len(), 2);
    assert_eq!(h.get("/api/products").await.json_body(), json!([]));
}

#[tokio::test]
async fn test_body_limit() {
    let h = Harness::with_vars(&[("max_body_bytes", "64")]).await;
    let response = h
        .admin(
            Method::POST,
            "/api/category",
            json!({"name": "x".repeat(100)}),
        )
        .await;
    assert_eq!(response.status, 413);
    assert_eq!(
        response.json_body()["error"],
        "O corpo da requisição excede o limite de 64 bytes"
    );
}
