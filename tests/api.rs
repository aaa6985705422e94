// tests/api.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tower::ServiceExt;

use backend::{
    config::{AppConfig, AppState},
    create_router, db,
    printing::{PrinterTarget, ShopProfile, printer::FilePrinter},
    services::employee_service::DefaultAdmin,
};

struct TestApp {
    router: Router,
    pool: SqlitePool,
    spool: PathBuf,
    _dir: tempfile::TempDir,
}

async fn memory_pool() -> SqlitePool {
    // Uma conexão só: cada conexão em memória seria um banco diferente
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

fn test_config(spool: &Path) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        bind_addr: "127.0.0.1:0".into(),
        printer: PrinterTarget::File(FilePrinter::new(spool)),
        logo_path: PathBuf::from("/nonexistent/logo.png"),
        print_delay: Duration::ZERO,
        password_cost: 4,
        default_admin: DefaultAdmin::default(),
        shop: ShopProfile::default(),
        reprint_shop: ShopProfile::customer_reprint(),
    }
}

async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let spool = dir.path().join("printer.bin");
    spawn_app_with(dir, spool).await
}

// Impressora apontando para um diretório que não existe
async fn spawn_app_with_broken_printer() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let spool = dir.path().join("missing").join("printer.bin");
    spawn_app_with(dir, spool).await
}

// Banco em arquivo com o pool de produção, para concorrência real
async fn spawn_app_on_disk() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let spool = dir.path().join("printer.bin");
    let url = format!("sqlite://{}", dir.path().join("orders.db").display());
    let pool = db::connect(&url).await.unwrap();
    spawn_app_on(pool, dir, spool).await
}

async fn spawn_app_with(dir: tempfile::TempDir, spool: PathBuf) -> TestApp {
    spawn_app_on(memory_pool().await, dir, spool).await
}

async fn spawn_app_on(pool: SqlitePool, dir: tempfile::TempDir, spool: PathBuf) -> TestApp {
    let state = AppState::with_pool(pool.clone(), &test_config(&spool))
        .await
        .unwrap();

    TestApp {
        router: create_router(state),
        pool,
        spool,
        _dir: dir,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn order_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    fn spool(&self) -> Vec<u8> {
        std::fs::read(&self.spool).unwrap_or_default()
    }
}

fn valid_order() -> Value {
    json!({
        "nombreCliente": "María Restrepo",
        "fechaEntrega": "2025-03-14 17:30",
        "valorTotal": 50000,
        "abono": 20000,
        "saldo": 30000,
        "celular": "3001234567",
        "observaciones": "Reparar cierre",
        "vendedor": "ADMIN",
        "medioPago": "efectivo"
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

// --- Login ---

#[tokio::test]
async fn login_with_default_admin() {
    let app = spawn_app().await;

    let (status, body) = app
        .send("POST", "/login", Some(json!({"codigo": " ADMIN ", "contrasena": "0000 "})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["codigo"], "ADMIN");
    assert_eq!(body["nombre"], "ADMINISTRADOR");
    assert_eq!(body["administrador"], true);
    assert_eq!(body["message"], "Inicio de sesión exitoso");
}

#[tokio::test]
async fn login_wrong_password_is_401() {
    let app = spawn_app().await;

    let (status, body) = app
        .send("POST", "/login", Some(json!({"codigo": "ADMIN", "contrasena": "1234"})))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "La contraseña es incorrecta");
}

#[tokio::test]
async fn login_unknown_code_is_404() {
    let app = spawn_app().await;

    let (status, _) = app
        .send("POST", "/login", Some(json!({"codigo": "NOPE", "contrasena": "0000"})))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_missing_fields_is_400() {
    let app = spawn_app().await;

    let (status, body) = app.send("POST", "/login", Some(json!({"codigo": "ADMIN"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faltan datos requeridos");
}

// --- Funcionários ---

#[tokio::test]
async fn employee_lifecycle() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(
            "POST",
            "/createEmployee",
            Some(json!({
                "nombre": "Laura Gómez",
                "telefono": "3009876543",
                "codigo": "LG01",
                "contrasena": "secreta",
                "administrador": false
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);

    let (status, body) = app.send("GET", "/getEmployee/LG01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Laura Gómez");
    assert_eq!(body["telefono"], "3009876543");
    assert!(body.get("contrasena").is_none());

    let (status, _) = app
        .send(
            "PUT",
            "/updateEmployee/LG01",
            Some(json!({"nombre": "Laura G.", "contrasena": "nueva", "administrador": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send("POST", "/login", Some(json!({"codigo": "LG01", "contrasena": "nueva"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nombre"], "Laura G.");
    assert_eq!(body["administrador"], true);

    let (status, body) = app.send("GET", "/getAllEmployees", None).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["codigo"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"ADMIN"));
    assert!(codes.contains(&"LG01"));
}

#[tokio::test]
async fn empty_password_on_update_keeps_the_old_one() {
    let app = spawn_app().await;

    let (status, _) = app
        .send("PUT", "/updateEmployee/ADMIN", Some(json!({"contrasena": ""})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("POST", "/login", Some(json!({"codigo": "ADMIN", "contrasena": "0000"})))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_employee_code_is_409() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(
            "POST",
            "/createEmployee",
            Some(json!({
                "nombre": "Otro",
                "telefono": "3000000000",
                "codigo": "ADMIN",
                "contrasena": "x",
                "administrador": false
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Ya existe un empleado con ese código");
}

#[tokio::test]
async fn unknown_employee_is_404() {
    let app = spawn_app().await;

    let (status, _) = app.send("GET", "/getEmployee/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send("PUT", "/updateEmployee/NOPE", Some(json!({"nombre": "X"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- Ordens ---

#[tokio::test]
async fn valid_order_is_saved_and_printed() {
    let app = spawn_app().await;

    let (status, body) = app.send("POST", "/submitData", Some(valid_order())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["impreso"], true);
    assert!(body.get("errorImpresion").is_none());

    let (status, body) = app.send("POST", "/submitData", Some(valid_order())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);

    // via do cliente + uma via do negócio por envio
    let spool = app.spool();
    assert!(spool.starts_with(&[0x1B, 0x40]));
    assert!(contains(&spool, b"ORDEN DE ARREGLO N: 1\n"));
    assert!(contains(&spool, b"ORDEN #:  2\n"));
    assert!(contains(&spool, b"Valor:      $50.000\n"));
    assert!(spool.ends_with(&[0x1D, 0x56, 0x42, 0x00]));
}

#[tokio::test]
async fn business_only_prints_requested_copies() {
    let app = spawn_app().await;

    let mut order = valid_order();
    order["tieneWhatsapp"] = json!(true);
    order["cantidadObjetos"] = json!(2);

    let (status, _) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::CREATED);

    let spool = app.spool();
    assert!(!contains(&spool, b"ORDEN DE ARREGLO"));
    assert_eq!(
        spool.windows(b"COPIA INTERNA".len()).filter(|w| *w == b"COPIA INTERNA").count(),
        2
    );
}

#[tokio::test]
async fn copies_as_numeric_string_are_accepted() {
    let app = spawn_app().await;

    let mut order = valid_order();
    order["cantidadObjetos"] = json!("2");

    let (status, _) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::CREATED);

    let spool = app.spool();
    assert_eq!(
        spool.windows(b"COPIA INTERNA".len()).filter(|w| *w == b"COPIA INTERNA").count(),
        2
    );

    let mut order = valid_order();
    order["cantidadObjetos"] = json!("dos");
    let (status, body) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Los valores numéricos son inválidos");
    assert_eq!(app.order_count().await, 1);
}

#[tokio::test]
async fn amounts_as_strings_are_accepted() {
    let app = spawn_app().await;

    let mut order = valid_order();
    order["valorTotal"] = json!("50000");
    order["abono"] = json!("20000.00");
    order["saldo"] = json!("30000");

    let (status, _) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn amounts_at_decimal_limit_are_rejected() {
    let app = spawn_app().await;

    let mut order = valid_order();
    order["valorTotal"] = json!("1");
    order["abono"] = json!("79228162514264337593543950335");
    order["saldo"] = json!("79228162514264337593543950335");

    let (status, body) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "El saldo debe ser igual al valor total menos el abono");
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn balance_mismatch_is_rejected_and_not_stored() {
    let app = spawn_app().await;

    let mut order = valid_order();
    order["saldo"] = json!(25000);

    let (status, body) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "El saldo debe ser igual al valor total menos el abono");
    assert_eq!(app.order_count().await, 0);
    assert!(app.spool().is_empty());
}

#[tokio::test]
async fn invalid_fields_are_rejected() {
    let app = spawn_app().await;

    let cases = [
        ("nombreCliente", json!("Al")),
        ("celular", json!("300123456")),
        ("celular", json!("300123456a")),
        ("observaciones", json!("   abc   ")),
        ("observaciones", json!("x".repeat(501))),
        ("fechaEntrega", json!("14/03/2025")),
        ("valorTotal", json!("cincuenta")),
        ("valorTotal", json!(0)),
    ];

    for (field, value) in cases {
        let mut order = valid_order();
        order[field] = value;
        let (status, _) = app.send("POST", "/submitData", Some(order)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field {}", field);
    }

    let mut order = valid_order();
    order.as_object_mut().unwrap().remove("vendedor");
    let (status, body) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Faltan datos requeridos");

    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn unknown_salesperson_is_404_and_not_stored() {
    let app = spawn_app().await;

    let mut order = valid_order();
    order["vendedor"] = json!("NOPE");

    let (status, body) = app.send("POST", "/submitData", Some(order)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "El código del vendedor no es válido");
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn printer_failure_still_persists_the_order() {
    let app = spawn_app_with_broken_printer().await;

    let (status, body) = app.send("POST", "/submitData", Some(valid_order())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["impreso"], false);
    assert_eq!(body["errorImpresion"], "Error al imprimir");
    assert_eq!(app.order_count().await, 1);
}

#[tokio::test]
async fn id_gap_is_repaired() {
    let app = spawn_app().await;

    let (_, body) = app.send("POST", "/submitData", Some(valid_order())).await;
    assert_eq!(body["id"], 1);

    // Simula inserts perdidos: o contador pulou para 10
    sqlx::query("UPDATE sqlite_sequence SET seq = 10 WHERE name = 'orders'")
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, body) = app.send("POST", "/submitData", Some(valid_order())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);
    assert_eq!(app.order_count().await, 2);
}

#[tokio::test]
async fn single_skip_is_tolerated() {
    let app = spawn_app().await;

    app.send("POST", "/submitData", Some(valid_order())).await;
    sqlx::query("UPDATE sqlite_sequence SET seq = 2 WHERE name = 'orders'")
        .execute(&app.pool)
        .await
        .unwrap();

    let (_, body) = app.send("POST", "/submitData", Some(valid_order())).await;
    assert_eq!(body["id"], 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submits_are_all_stored() {
    let app = Arc::new(spawn_app_on_disk().await);

    let submits: Vec<_> = (0..20)
        .map(|_| {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.send("POST", "/submitData", Some(valid_order())).await })
        })
        .collect();

    let mut ids = Vec::new();
    for submit in submits {
        let (status, body) = submit.await.unwrap();
        assert_eq!(status, StatusCode::CREATED, "{body}");
        ids.push(body["id"].as_i64().unwrap());
    }

    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<i64>>());
    assert_eq!(app.order_count().await, 20);
}

#[tokio::test]
async fn orders_are_listed_newest_first() {
    let app = spawn_app().await;

    app.send("POST", "/submitData", Some(valid_order())).await;
    let mut second = valid_order();
    second["nombreCliente"] = json!("Pedro Páramo");
    second["telefono"] = json!("6044445566");
    app.send("POST", "/submitData", Some(second)).await;

    let (status, body) = app.send("GET", "/getOrders", None).await;
    assert_eq!(status, StatusCode::OK);

    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], 2);
    assert_eq!(orders[0]["nombreCliente"], "Pedro Páramo");
    assert_eq!(orders[0]["telefono"], "6044445566");
    assert_eq!(orders[1]["id"], 1);
    assert_eq!(orders[1]["telefono"], Value::Null);
    assert_eq!(orders[1]["fechaEntrega"], "2025-03-14 17:30");
    assert_eq!(orders[1]["valorTotal"].as_f64(), Some(50000.0));
    assert_eq!(orders[1]["saldo"].as_f64(), Some(30000.0));
    assert_eq!(orders[1]["finalizada"], false);
    assert_eq!(orders[1]["medioPago"], "efectivo");
}

#[tokio::test]
async fn update_order_merges_and_validates() {
    let app = spawn_app().await;
    app.send("POST", "/submitData", Some(valid_order())).await;

    // saldo antigo não fecha com o abono novo
    let (status, _) = app
        .send("PUT", "/updateOrder/1", Some(json!({"abono": 50000})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "PUT",
            "/updateOrder/1",
            Some(json!({"abono": 50000, "saldo": 0, "finalizada": true, "medioPago": "transferencia"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Orden actualizada correctamente");

    let (_, body) = app.send("GET", "/getOrders", None).await;
    let order = &body[0];
    assert_eq!(order["abono"].as_f64(), Some(50000.0));
    assert_eq!(order["saldo"].as_f64(), Some(0.0));
    assert_eq!(order["finalizada"], true);
    assert_eq!(order["medioPago"], "transferencia");
    assert_eq!(order["nombreCliente"], "María Restrepo");

    let (status, _) = app
        .send("PUT", "/updateOrder/99", Some(json!({"finalizada": true})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_order() {
    let app = spawn_app().await;
    app.send("POST", "/submitData", Some(valid_order())).await;

    let (status, _) = app.send("DELETE", "/deleteOrder/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.order_count().await, 1);

    let (status, body) = app.send("DELETE", "/deleteOrder/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Orden eliminada correctamente");
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn non_numeric_order_id_is_json_400() {
    let app = spawn_app().await;

    for (method, uri, body) in [
        ("DELETE", "/deleteOrder/abc", None),
        ("PUT", "/updateOrder/abc", Some(json!({"finalizada": true}))),
        ("POST", "/reprintOrder/1x", Some(json!({"reprintType": "1"}))),
    ] {
        let (status, body) = app.send(method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["error"], "El ID de la orden debe ser un número entero");
    }
}

#[tokio::test]
async fn reprint_kinds() {
    let app = spawn_app().await;
    app.send("POST", "/submitData", Some(valid_order())).await;
    let printed_on_submit = app.spool().len();

    let (status, body) = app
        .send("POST", "/reprintOrder/1", Some(json!({"reprintType": "3"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reimpresa: solo copia del negocio");
    let after_business = app.spool();
    assert!(!contains(&after_business[printed_on_submit..], b"ORDEN DE ARREGLO"));
    assert!(contains(&after_business[printed_on_submit..], b"COPIA INTERNA"));

    let (status, body) = app
        .send("POST", "/reprintOrder/1", Some(json!({"reprintType": "2"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reimpresa: solo copia del cliente");
    let after_customer = app.spool();
    let customer_reprint = &after_customer[after_business.len()..];
    assert!(contains(customer_reprint, b"ORDEN DE ARREGLO N: 1\n"));
    assert!(contains(customer_reprint, b"Jirlesa Maria Agudelo Correa\n"));
    assert!(!contains(customer_reprint, b"Carmen Teresa Bustamante Rua"));
    assert!(!contains(customer_reprint, b"COPIA INTERNA"));
    // o envio normal usa o cabeçalho da loja
    assert!(contains(&after_customer[..printed_on_submit], b"Carmen Teresa Bustamante Rua\n"));

    let (status, _) = app
        .send("POST", "/reprintOrder/1", Some(json!({"reprintType": "9"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("POST", "/reprintOrder/42", Some(json!({"reprintType": "1"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reprint_printer_failure_is_500() {
    let app = spawn_app_with_broken_printer().await;
    app.send("POST", "/submitData", Some(valid_order())).await;

    let (status, body) = app
        .send("POST", "/reprintOrder/1", Some(json!({"reprintType": "1"})))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error al imprimir");
}

// --- Idioma e extras ---

#[tokio::test]
async fn errors_follow_accept_language() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/deleteOrder/5")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Order not found");
}

#[tokio::test]
async fn health_and_openapi() {
    let app = spawn_app().await;

    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");

    let (status, body) = app.send("GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/submitData"].is_object());
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let app = spawn_app().await;
    app.pool.close().await;

    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
