//! End-to-end tests against an in-memory SQLite database and a local
//! stand-in for the Avimex endpoint.
//!
//! Run with: cargo test --test api_test

use axum::{
    body::{to_bytes, Body},
    extract::{Form, State},
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, QueryOrder, Set,
};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};
use tower::ServiceExt;

use calibra::avimex::AvimexClient;
use calibra::chain::SENSOR_PREFIX;
use calibra::common::AppState;
use calibra::config::{Config, Deployment, ForwardMethod};
use calibra::entity::{procesos, subprocesos};
use calibra::routes::build_router;

type Received = Arc<Mutex<Vec<String>>>;

struct TestApp {
    router: Router,
    received: Received,
}

/// How the stand-in Avimex endpoint behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Avimex {
    /// Accept and record every chain
    Recording,
    /// Record, and create a new process while the chain is in flight
    LateProcess,
    /// Record, and add a subprocess to the first process while the chain is in flight
    LateSubprocess,
    /// Nothing listens at the configured URL
    Unreachable,
}

#[derive(Clone)]
struct FakeAvimex {
    received: Received,
    db: DatabaseConnection,
    mode: Avimex,
}

async fn record_chain(
    State(fake): State<FakeAvimex>,
    Form(form): Form<HashMap<String, String>>,
) -> &'static str {
    if let Some(recibo) = form.get("recibo") {
        fake.received.lock().await.push(recibo.clone());
    }

    match fake.mode {
        Avimex::LateProcess => {
            process_model("LATE").insert(&fake.db).await.unwrap();
        }
        Avimex::LateSubprocess => {
            let first = procesos::Entity::find()
                .order_by_asc(procesos::Column::Id)
                .one(&fake.db)
                .await
                .unwrap()
                .unwrap();
            subprocesos::ActiveModel {
                proceso_id: Set(first.id),
                id_subproceso: Set(Some(99)),
                nombre: Set("Punto tardio".to_string()),
                descripcion: Set("Lectura".to_string()),
                valor_referencia: Set("1".to_string()),
                incertidumbre_patron: Set("0.1".to_string()),
                estatus: Set("0".to_string()),
                ..Default::default()
            }
            .insert(&fake.db)
            .await
            .unwrap();
        }
        Avimex::Recording | Avimex::Unreachable => {}
    }
    "ok"
}

/// Serve a fake Avimex endpoint and return its URL.
async fn spawn_avimex(fake: FakeAvimex) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/recibo", post(record_chain))
        .with_state(fake);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/recibo")
}

async fn test_db() -> DatabaseConnection {
    // One connection, otherwise every pooled connection sees its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn setup() -> TestApp {
    setup_with(Avimex::Recording).await
}

async fn setup_with(mode: Avimex) -> TestApp {
    let db = test_db().await;
    let received: Received = Arc::default();

    let avimex_url = if mode == Avimex::Unreachable {
        // Port 1 is never served in the test environment
        "http://127.0.0.1:1/recibo".to_string()
    } else {
        spawn_avimex(FakeAvimex {
            received: received.clone(),
            db: db.clone(),
            mode,
        })
        .await
    };

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        avimex_url,
        avimex_method: ForwardMethod::Post,
        avimex_timeout_seconds: 5,
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        disable_rate_limiting: true,
        rate_limit_per_second: 10,
        rate_limit_burst: 60,
        deployment: Deployment::Local,
    };

    let avimex_client = AvimexClient::new(&config).unwrap();
    let state = AppState::new(db, config, avimex_client);

    TestApp {
        router: build_router(state),
        received,
    }
}

fn process_model(nombre: &str) -> procesos::ActiveModel {
    let text = |v: &str| Set(v.to_string());
    procesos::ActiveModel {
        id: NotSet,
        nombre: text(nombre),
        descripcion: text("Termohigrometro"),
        estandar: text("NOM-001"),
        marca: text("Vaisala"),
        modelo: text("HMP110"),
        serie: text("S123"),
        resolucion: text("0.1"),
        intervalo_indicacion: text("-40 a 80"),
        calibrado_patron: text("01/02/2024"),
        prox_calibracion_patron: text("01/02/2025"),
        fecha_verificacion: text("15/03/2024"),
        proxima_verificacion: text("15/03/2025"),
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_process(&self, nombre: &str) -> Value {
        let (status, body) = self
            .json("POST", "/processes", Some(process_body(nombre)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    async fn create_subprocess(&self, proceso_id: i64, nombre: &str) -> Value {
        let (status, body) = self
            .json(
                "POST",
                &format!("/processes/{proceso_id}/subprocesses"),
                Some(json!({
                    "nombre": nombre,
                    "descripcion": "Lectura",
                    "valor_referencia": "25.5",
                    "incertidumbre_patron": "0.0125",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn process_body(nombre: &str) -> Value {
    json!({
        "nombre": nombre,
        "descripcion": "Termohigrometro",
        "estandar": "NOM-001",
        "marca": "Vaisala",
        "modelo": "HMP110",
        "serie": "S123",
        "resolucion": "0.1",
        "intervalo_indicacion": "-40 a 80",
        "calibrado_patron": "01/02/2024",
        "prox_calibracion_patron": "01/02/2025",
        "fecha_verificacion": "15/03/2024",
        "proxima_verificacion": "15/03/2025",
    })
}

fn sensor_body(index: usize) -> Value {
    json!({
        "nombre_sensor": format!("Sensor {index}"),
        "mac_address": format!("AA:BB:CC:DD:EE:{index:02X}"),
        "instrumento": "Termometro",
        "marca": "Vaisala",
        "modelo": "HMP110",
        "serie": format!("SN-{index}"),
        "resolucion": "0.1",
        "intervalo_indicacion": "-40 a 80",
        "emp": "0.5",
        "temp_inicial": "20.1",
        "temp_final": "20.4",
        "humedad_relativa_inicial": "45",
        "humedad_relativa_final": "46",
        "presion_atmosferica": "1013",
        "numero_informe": "INF-001",
    })
}

#[tokio::test]
async fn ping_reports_database_result() {
    let app = setup().await;
    let (status, body) = app.json("GET", "/ping", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resultado"], 2);
}

#[tokio::test]
async fn process_round_trip_keeps_fields() {
    let app = setup().await;

    let (status, body) = app.json("GET", "/processes", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let created = app.create_process("P1").await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = app.json("GET", &format!("/processes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let input = process_body("P1");
    for (field, value) in input.as_object().unwrap() {
        assert_eq!(&fetched[field], value, "field {field}");
    }
    assert_eq!(fetched["display"]["fecha_verificacion"], "15 03 2024");

    let (status, current) = app.json("GET", "/process", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["id"], id);
}

#[tokio::test]
async fn process_with_missing_fields_is_rejected() {
    let app = setup().await;
    let (status, body) = app
        .json("POST", "/processes", Some(json!({ "nombre": "P1", "marca": "" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 11);
    assert!(fields.contains(&json!("marca")));
}

#[tokio::test]
async fn process_delete_cascades() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    app.create_subprocess(id, "Punto 1").await;
    app.create_subprocess(id, "Punto 2").await;

    let (status, body) = app.json("POST", "/sensores", Some(sensor_body(1))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["id_proceso"], id);

    let (status, body) = app.json("DELETE", &format!("/processes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eliminados"]["procesos"], 1);
    assert_eq!(body["eliminados"]["subprocesos"], 2);
    assert_eq!(body["eliminados"]["sensores"], 1);

    let (status, _) = app.json("GET", &format!("/processes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.json("GET", "/sensores", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.json("DELETE", &format!("/processes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subprocess_numbering_and_decimals() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();

    let first = app.create_subprocess(id, "Punto 1").await;
    let second = app.create_subprocess(id, "Punto 2").await;
    assert_eq!(first["id_subproceso"], 1);
    assert_eq!(second["id_subproceso"], 2);
    assert_eq!(first["estatus"], "0");

    let (status, body) = app
        .json(
            "POST",
            &format!("/processes/{id}/subprocesses"),
            Some(json!({
                "nombre": "Punto 3",
                "descripcion": "Lectura",
                "valor_referencia": "12.345",
                "incertidumbre_patron": "0.00001",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["fields"],
        json!(["valor_referencia", "incertidumbre_patron"])
    );

    let (status, _) = app
        .json("GET", "/processes/999/subprocesses", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_update_forwards_chain() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    let first = app.create_subprocess(id, "Punto 1").await;
    let second = app.create_subprocess(id, "Punto 2").await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    let (status, body) = app
        .json(
            "PUT",
            &format!("/estatus/{first_id}"),
            Some(json!({ "estatus": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["proceso_id"], id);
    assert_eq!(body["envio"]["entregado"], true);

    let expected = format!(
        "{id},P1,Termohigrometro,NOM-001,Vaisala,HMP110,S123,0.1,-40 a 80,\
         01/02/2024,01/02/2025,15/03/2024,15/03/2025,$\
         {first_id},Punto 1,Lectura,25.5,0.0125,1,$\
         {second_id},Punto 2,Lectura,25.5,0.0125,0,$"
    );
    assert_eq!(body["cadena"], expected);
    assert!(!expected.contains('!'));

    let received = app.received.lock().await;
    assert_eq!(received.as_slice(), [expected]);
}

#[tokio::test]
async fn status_update_requires_status_and_subprocess() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    let sub_id = app.create_subprocess(id, "Punto 1").await["id"]
        .as_i64()
        .unwrap();

    let (status, body) = app
        .json("PUT", &format!("/estatus/{sub_id}"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["estatus"]));

    let (status, _) = app
        .json("PUT", "/estatus/999", Some(json!({ "estatus": "1" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.received.lock().await.is_empty());
}

#[tokio::test]
async fn sensor_cap_holds_at_twelve() {
    let app = setup().await;
    app.create_process("P1").await;

    let batch: Vec<Value> = (1..=12).map(sensor_body).collect();
    let (status, body) = app.json("POST", "/sensores", Some(json!(batch))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body.as_array().unwrap().len(), 12);

    let (status, _) = app.json("GET", "/cantidad-sensores", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.json("POST", "/sensores", Some(sensor_body(13))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.json("GET", "/sensores", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn oversized_batch_inserts_nothing() {
    let app = setup().await;
    app.create_process("P1").await;

    let (status, _) = app.json("POST", "/sensores", Some(sensor_body(1))).await;
    assert_eq!(status, StatusCode::CREATED);

    let batch: Vec<Value> = (2..=13).map(sensor_body).collect();
    let (status, _) = app.json("POST", "/sensores", Some(json!(batch))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.json("GET", "/cantidad-sensores", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cantidad"], 1);
    assert_eq!(body["limite"], 12);
}

#[tokio::test]
async fn invalid_batch_item_is_reported() {
    let app = setup().await;
    app.create_process("P1").await;

    let mut broken = sensor_body(2);
    broken["mac_address"] = json!("not-a-mac");
    let (status, body) = app
        .json("POST", "/sensores", Some(json!([sensor_body(1), broken])))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["item"], 1);
    assert_eq!(body["fields"], json!(["mac_address"]));
}

#[tokio::test]
async fn mac_addresses_are_listed_as_text() {
    let app = setup().await;

    let (status, _) = app.send("GET", "/sensores/macaddresses", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.create_process("P1").await;
    let batch = json!([sensor_body(1), sensor_body(2)]);
    let (status, _) = app.json("POST", "/sensores", Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, bytes) = app.send("GET", "/sensores/macaddresses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "aa:bb:cc:dd:ee:01, aa:bb:cc:dd:ee:02"
    );
}

#[tokio::test]
async fn delete_all_sensors() {
    let app = setup().await;

    let (status, _) = app.json("DELETE", "/sensores", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.create_process("P1").await;
    let batch = json!([sensor_body(1), sensor_body(2), sensor_body(3)]);
    let (status, _) = app.json("POST", "/sensores", Some(batch)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.json("DELETE", "/sensores", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.json("GET", "/sensores", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn sensor_without_single_process_conflicts() {
    let app = setup().await;

    let (status, _) = app.json("POST", "/sensores", Some(sensor_body(1))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.create_process("P1").await;
    app.create_process("P2").await;
    let (status, _) = app.json("POST", "/sensores", Some(sensor_body(1))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.json("GET", "/process", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn chain_export_and_clean_database() {
    let app = setup().await;

    let (status, _) = app.json("GET", "/crea-cadena", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    app.create_subprocess(id, "Punto 1").await;
    let (status, _) = app.json("POST", "/sensores", Some(sensor_body(1))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, built) = app.json("GET", "/crea-cadena", None).await;
    assert_eq!(status, StatusCode::OK);
    let cadena = built["cadena"].as_str().unwrap().to_string();
    assert!(cadena.starts_with(&format!("{id},P1,")));
    assert!(cadena.contains(SENSOR_PREFIX));
    assert!(cadena.ends_with("INF-001,"));

    // Building the chain does not touch the data
    let (status, _) = app.json("GET", &format!("/processes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, cleaned) = app.json("GET", "/clean-database", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleaned["cadena"], cadena);
    assert_eq!(cleaned["eliminados"]["procesos"], 1);
    assert_eq!(cleaned["eliminados"]["subprocesos"], 1);
    assert_eq!(cleaned["eliminados"]["sensores"], 1);

    let (status, _) = app.json("GET", "/processes", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(app.received.lock().await.len(), 2);
}

#[tokio::test]
async fn clean_database_keeps_rows_written_during_export() {
    let app = setup_with(Avimex::LateProcess).await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    app.create_subprocess(id, "Punto 1").await;

    let (status, cleaned) = app.json("GET", "/clean-database", None).await;
    assert_eq!(status, StatusCode::OK, "{cleaned}");
    assert!(!cleaned["cadena"].as_str().unwrap().contains("LATE"));
    assert_eq!(cleaned["eliminados"]["procesos"], 1);
    assert_eq!(cleaned["eliminados"]["subprocesos"], 1);

    let (status, remaining) = app.json("GET", "/processes", None).await;
    assert_eq!(status, StatusCode::OK);
    let remaining = remaining.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["nombre"], "LATE");
}

#[tokio::test]
async fn clean_database_keeps_process_that_gained_a_child() {
    let app = setup_with(Avimex::LateSubprocess).await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    app.create_subprocess(id, "Punto 1").await;

    let (status, cleaned) = app.json("GET", "/clean-database", None).await;
    assert_eq!(status, StatusCode::OK, "{cleaned}");
    assert_eq!(cleaned["eliminados"]["procesos"], 0);
    assert_eq!(cleaned["eliminados"]["subprocesos"], 1);

    let (status, _) = app.json("GET", &format!("/processes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, subprocesses) = app
        .json("GET", &format!("/processes/{id}/subprocesses"), None)
        .await;
    assert_eq!(subprocesses.as_array().unwrap().len(), 1);
    assert_eq!(subprocesses[0]["nombre"], "Punto tardio");
}

#[tokio::test]
async fn failed_forward_keeps_status_change() {
    let app = setup_with(Avimex::Unreachable).await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    let sub_id = app.create_subprocess(id, "Punto 1").await["id"]
        .as_i64()
        .unwrap();

    let (status, body) = app
        .json(
            "PUT",
            &format!("/estatus/{sub_id}"),
            Some(json!({ "estatus": "5" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["envio"]["entregado"], false);
    assert!(body["envio"]["error"].is_string());
    assert!(body["cadena"]
        .as_str()
        .unwrap()
        .ends_with(&format!("{sub_id},Punto 1,Lectura,25.5,0.0125,5,$")));

    let (status, stored) = app
        .json("GET", &format!("/subprocesses/{sub_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["estatus"], "5");
}

#[tokio::test]
async fn overlong_status_is_rejected() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    let sub_id = app.create_subprocess(id, "Punto 1").await["id"]
        .as_i64()
        .unwrap();

    let (status, body) = app
        .json(
            "PUT",
            &format!("/estatus/{sub_id}"),
            Some(json!({ "estatus": "9".repeat(33) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["estatus"]));
    assert!(app.received.lock().await.is_empty());
}

#[tokio::test]
async fn overlong_values_are_rejected() {
    let app = setup().await;

    let mut body = process_body("P1");
    body["nombre"] = json!("n".repeat(256));
    let (status, rejected) = app.json("POST", "/processes", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["fields"], json!(["nombre"]));

    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    let (status, rejected) = app
        .json(
            "POST",
            &format!("/processes/{id}/subprocesses"),
            Some(json!({
                "nombre": "Punto",
                "descripcion": "Lectura",
                "valor_referencia": "1".repeat(33),
                "incertidumbre_patron": "0.5",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["fields"], json!(["valor_referencia"]));
}

#[tokio::test]
async fn process_replace() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();

    let mut body = process_body("P1 revisado");
    body["fecha_verificacion"] = json!("2/4/2024");
    let (status, updated) = app
        .json("PUT", &format!("/processes/{id}"), Some(body))
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["id"], id);
    assert_eq!(updated["nombre"], "P1 revisado");
    assert_eq!(updated["display"]["fecha_verificacion"], "2 4 2024");

    let (_, fetched) = app.json("GET", &format!("/processes/{id}"), None).await;
    assert_eq!(fetched["nombre"], "P1 revisado");

    let (status, _) = app
        .json("PUT", "/processes/999", Some(process_body("Nadie")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json("PUT", &format!("/processes/{id}"), Some(json!({ "nombre": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn subprocess_read_replace_delete() {
    let app = setup().await;
    let id = app.create_process("P1").await["id"].as_i64().unwrap();
    app.create_subprocess(id, "Punto 1").await;
    let second = app.create_subprocess(id, "Punto 2").await;
    let sub_id = second["id"].as_i64().unwrap();

    let (status, _) = app
        .json("PUT", &format!("/estatus/{sub_id}"), Some(json!({ "estatus": "1" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = app
        .json("GET", &format!("/subprocesses/{sub_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["nombre"], "Punto 2");

    let (status, updated) = app
        .json(
            "PUT",
            &format!("/subprocesses/{sub_id}"),
            Some(json!({
                "nombre": "Punto 2b",
                "descripcion": "Lectura nueva",
                "valor_referencia": "30",
                "incertidumbre_patron": "0.02",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["nombre"], "Punto 2b");
    assert_eq!(updated["valor_referencia"], "30");
    assert_eq!(updated["id_subproceso"], 2);
    assert_eq!(updated["proceso_id"], id);
    assert_eq!(updated["estatus"], "1");

    let (status, _) = app
        .json(
            "PUT",
            "/subprocesses/999",
            Some(json!({
                "nombre": "x",
                "descripcion": "x",
                "valor_referencia": "1",
                "incertidumbre_patron": "1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json("DELETE", &format!("/subprocesses/{sub_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json("GET", &format!("/subprocesses/{sub_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json("DELETE", &format!("/subprocesses/{sub_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, remaining) = app
        .json("GET", &format!("/processes/{id}/subprocesses"), None)
        .await;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn sensor_read_update_delete() {
    let app = setup().await;
    let first = app.create_process("P1").await["id"].as_i64().unwrap();

    let (status, created) = app.json("POST", "/sensores", Some(sensor_body(1))).await;
    assert_eq!(status, StatusCode::CREATED);
    let sensor_id = created["id"].as_i64().unwrap();

    let second = app.create_process("P2").await["id"].as_i64().unwrap();

    let (status, fetched) = app
        .json("GET", &format!("/sensores/{sensor_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["mac_address"], "aa:bb:cc:dd:ee:01");

    // No process in the body: the sensor stays where it was
    let mut body = sensor_body(1);
    body["mac_address"] = json!("A4-CF-12-0B-9E-01");
    let (status, updated) = app
        .json("PUT", &format!("/sensores/{sensor_id}"), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["mac_address"], "a4:cf:12:0b:9e:01");
    assert_eq!(updated["id_proceso"], first);

    body["id_proceso"] = json!(second);
    let (status, moved) = app
        .json("PUT", &format!("/sensores/{sensor_id}"), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["id_proceso"], second);

    body["id_proceso"] = json!(999);
    let (status, _) = app
        .json("PUT", &format!("/sensores/{sensor_id}"), Some(body))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json("PUT", "/sensores/999", Some(sensor_body(2)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json("DELETE", &format!("/sensores/{sensor_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json("GET", &format!("/sensores/{sensor_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .json("DELETE", &format!("/sensores/{sensor_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
