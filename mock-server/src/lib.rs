//! In-memory stand-in for the classifieds platform's auth and app hosts.
//!
//! Serves both hosts from one origin. Seeded with a single registered OAuth
//! application (`CLIENT_ID`, `CLIENT_SECRET`, `REDIRECT_URI`), one unused
//! authorization code (`AUTH_CODE`) and one valid token (`ACCESS_TOKEN`).
//! Every request that reaches a route is recorded so tests can assert on the
//! exact method, path, content type and body the client sent.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{post, put},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const CLIENT_ID: &str = "mock-client";
pub const CLIENT_SECRET: &str = "mock-secret";
pub const REDIRECT_URI: &str = "http://localhost/callback";
pub const AUTH_CODE: &str = "abc123";
pub const ACCESS_TOKEN: &str = "tok-xyz";

/// A request as it arrived, before routing to a handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug)]
pub struct Store {
    codes: HashMap<String, String>,
    tokens: HashSet<String>,
    /// Listings by id, ordered so `published` is deterministic.
    pub listings: BTreeMap<String, Value>,
    /// Import tracking token to the ids it touched.
    pub imports: HashMap<String, Vec<String>>,
    pub requests: Vec<RecordedRequest>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            codes: HashMap::from([(AUTH_CODE.to_string(), ACCESS_TOKEN.to_string())]),
            tokens: HashSet::from([ACCESS_TOKEN.to_string()]),
            listings: BTreeMap::new(),
            imports: HashMap::new(),
            requests: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, body: Value) -> Failure {
    (status, Json(body))
}

pub fn app() -> Router {
    app_with(Db::default())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/oauth/token", post(token))
        .route("/oauth_api/basic_user_info", post(basic_user_info))
        .route("/autoupload/published", post(published))
        .route("/autoupload/import", put(import))
        .route("/autoupload/import/{token}", post(import_status))
        .route("/autoupload/car_info", post(car_brands))
        .route("/autoupload/car_info/{brand_id}", post(car_models))
        .route("/autoupload/car_info/{brand_id}/{model_id}", post(car_versions))
        .route("/autoupload/moto_info", post(moto_brands))
        .route("/autoupload/moto_info/{brand_id}", post(moto_models))
        .route("/autoupload/moto_info/{brand_id}/{model_id}", post(moto_versions))
        .route("/autoupload/moto_cubiccms_info", post(moto_cubiccms_info))
        .layer(middleware::from_fn_with_state(db.clone(), record))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Db::default()).await
}

/// Serve with a caller-held store, so tests can inspect it afterwards.
pub async fn serve(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

async fn record(
    State(db): State<Db>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let entry = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    debug!(method = %entry.method, path = %entry.path, "request recorded");
    db.write().await.requests.push(entry);
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

// --- auth host ---

#[derive(Deserialize)]
pub struct TokenForm {
    pub code: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub grant_type: String,
}

async fn token(State(db): State<Db>, Form(form): Form<TokenForm>) -> Result<Json<Value>, Failure> {
    if form.grant_type != "authorization_code" {
        return Err(failure(StatusCode::BAD_REQUEST, json!({"error": "unsupported_grant_type"})));
    }
    if form.client_id != CLIENT_ID || form.client_secret != CLIENT_SECRET {
        return Err(failure(StatusCode::UNAUTHORIZED, json!({"error": "invalid_client"})));
    }
    if form.redirect_uri != REDIRECT_URI {
        return Err(failure(StatusCode::BAD_REQUEST, json!({"error": "redirect_uri_mismatch"})));
    }
    // Codes are single-use.
    let access_token = db
        .write()
        .await
        .codes
        .remove(&form.code)
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, json!({"error": "invalid_grant"})))?;
    Ok(Json(json!({"access_token": access_token, "token_type": "Bearer"})))
}

// --- app host ---

#[derive(Deserialize)]
pub struct TokenBody {
    pub access_token: Option<String>,
}

#[derive(Deserialize)]
pub struct ImportBody {
    pub access_token: Option<String>,
    #[serde(default)]
    pub ad_list: Vec<Value>,
}

async fn authorize(db: &Db, access_token: Option<&str>) -> Result<(), Failure> {
    let known = match access_token {
        Some(token) => db.read().await.tokens.contains(token),
        None => false,
    };
    if known {
        Ok(())
    } else {
        Err(failure(StatusCode::UNAUTHORIZED, json!({"error": "invalid_token"})))
    }
}

async fn basic_user_info(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    Ok(Json(json!({"user_name": "Mock User", "user_email": "mock.user@example.com"})))
}

async fn published(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    let store = db.read().await;
    Ok(Json(Value::Array(store.listings.values().cloned().collect())))
}

async fn import(
    State(db): State<Db>,
    Json(body): Json<ImportBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    if body.ad_list.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            json!({"statusCode": -1, "statusMessage": "ad_list must not be empty"}),
        ));
    }

    let mut ids = Vec::with_capacity(body.ad_list.len());
    let mut errors = Vec::new();
    for (index, ad) in body.ad_list.iter().enumerate() {
        match ad.get("id").and_then(Value::as_str) {
            Some(id) => ids.push(id.to_string()),
            None => errors.push(json!({"index": index, "messages": ["id is required"]})),
        }
    }
    if !errors.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            json!({"statusCode": -2, "statusMessage": "Invalid ads", "errors": errors}),
        ));
    }

    let mut store = db.write().await;
    for (id, ad) in ids.iter().zip(body.ad_list) {
        if ad.get("operation").and_then(Value::as_str) == Some("delete") {
            store.listings.remove(id);
        } else {
            store.listings.insert(id.clone(), ad);
        }
    }
    let token = Uuid::new_v4().to_string();
    debug!(%token, ads = ids.len(), "import accepted");
    store.imports.insert(token.clone(), ids);
    Ok(Json(json!({
        "token": token,
        "statusCode": 0,
        "statusMessage": "The ads were imported and will be processed"
    })))
}

async fn import_status(
    State(db): State<Db>,
    Path(token): Path<String>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    let store = db.read().await;
    let ids = store
        .imports
        .get(&token)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, json!({"error": "import not found"})))?;
    Ok(Json(json!({
        "token": token,
        "status": "accepted",
        "statusMessage": "All ads were processed",
        "ads": ids
    })))
}

// --- catalogs ---

pub struct Model {
    pub id: u32,
    pub name: &'static str,
    pub versions: &'static [&'static str],
}

pub struct Brand {
    pub id: u32,
    pub name: &'static str,
    pub models: &'static [Model],
}

pub const CARS: &[Brand] = &[
    Brand {
        id: 5,
        name: "Volkswagen",
        models: &[
            Model {
                id: 12,
                name: "Fusca",
                versions: &["1.3 8V", "1.6 8V"],
            },
            Model {
                id: 13,
                name: "Gol",
                versions: &["1.0 MI", "1.6 Power"],
            },
        ],
    },
    Brand {
        id: 7,
        name: "Fiat",
        models: &[Model {
            id: 20,
            name: "Uno",
            versions: &["Mille 1.0"],
        }],
    },
];

pub const MOTOS: &[Brand] = &[Brand {
    id: 3,
    name: "Honda",
    models: &[Model {
        id: 7,
        name: "CG 160",
        versions: &["Fan", "Titan"],
    }],
}];

pub const CUBIC_CAPACITIES: &[&str] = &["50", "125", "150", "160", "250", "300", "600", "1000"];

fn brand_list(catalog: &[Brand]) -> Value {
    catalog.iter().map(|b| json!({"id": b.id, "name": b.name})).collect()
}

fn find_brand(catalog: &'static [Brand], brand_id: u32) -> Result<&'static Brand, Failure> {
    catalog
        .iter()
        .find(|b| b.id == brand_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, json!({"error": "brand not found"})))
}

fn model_list(catalog: &'static [Brand], brand_id: u32) -> Result<Value, Failure> {
    let brand = find_brand(catalog, brand_id)?;
    Ok(brand.models.iter().map(|m| json!({"id": m.id, "name": m.name})).collect())
}

fn version_list(catalog: &'static [Brand], brand_id: u32, model_id: u32) -> Result<Value, Failure> {
    let model = find_brand(catalog, brand_id)?
        .models
        .iter()
        .find(|m| m.id == model_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, json!({"error": "model not found"})))?;
    Ok(model
        .versions
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"id": i + 1, "name": name}))
        .collect())
}

async fn car_brands(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    Ok(Json(brand_list(CARS)))
}

async fn car_models(
    State(db): State<Db>,
    Path(brand_id): Path<u32>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    model_list(CARS, brand_id).map(Json)
}

async fn car_versions(
    State(db): State<Db>,
    Path((brand_id, model_id)): Path<(u32, u32)>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    version_list(CARS, brand_id, model_id).map(Json)
}

async fn moto_brands(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    Ok(Json(brand_list(MOTOS)))
}

async fn moto_models(
    State(db): State<Db>,
    Path(brand_id): Path<u32>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    model_list(MOTOS, brand_id).map(Json)
}

async fn moto_versions(
    State(db): State<Db>,
    Path((brand_id, model_id)): Path<(u32, u32)>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    version_list(MOTOS, brand_id, model_id).map(Json)
}

async fn moto_cubiccms_info(
    State(db): State<Db>,
    Json(body): Json<TokenBody>,
) -> Result<Json<Value>, Failure> {
    authorize(&db, body.access_token.as_deref()).await?;
    let list: Value = CUBIC_CAPACITIES
        .iter()
        .enumerate()
        .map(|(i, cc)| json!({"id": i + 1, "name": format!("{cc} cc")}))
        .collect();
    Ok(Json(list))
}
