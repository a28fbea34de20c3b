use crate::app_state::AppState;
use crate::auth::RequireApiToken;
use crate::domain::{CacheLookup, NewProduct, Product, ProductUpdate, SortKey};
use crate::handlers::shared_types::{ApiResponse, AppError};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

fn parse_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    // ---
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    // ---
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Handler for listing all products (GET /products), ordered by id.
#[tracing::instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Product>>, AppError> {
    // ---
    let mut session = state.connect().await?;
    let products = session.list_products(SortKey::default()).await?;

    Ok(ApiResponse { data: products })
}

/// Handler for listing products in a chosen order (GET /products/sort/{field}).
///
/// Responds with a bare JSON array rather than the `data` envelope.
///
/// - `field` must be one of `id`, `name`, `price`, `quantity`, `created_at`;
///   anything else responds with `400 Bad Request` before touching the database.
#[tracing::instrument(skip(state))]
pub async fn sorted_products(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<Vec<Product>>, AppError> {
    // ---
    let sort: SortKey = field.parse().map_err(AppError::BadRequest)?;

    let mut session = state.connect().await?;
    let products = session.list_products(sort).await?;

    Ok(Json(products))
}

/// Handler for fetching a product by ID (GET /products/{id}).
///
/// Read-through: the product cache is consulted first and a hit is served
/// without opening a database connection. On a miss the row is read and
/// installed in the cache.
///
/// Cached entries are never invalidated, so after the first successful read
/// this endpoint keeps returning that version even if the product is later
/// updated or deleted.
///
/// - `200 OK` with the product.
/// - `404 Not Found` if the product is neither cached nor stored.
#[tracing::instrument(skip(state, id))]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Product>, AppError> {
    // ---
    let id = parse_id(id)?;
    let cache = state.governance().cache();

    if let CacheLookup::Hit(product) = cache.get(id) {
        return Ok(ApiResponse { data: product });
    }

    let mut session = state.connect().await?;
    let product = session
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    cache.put(id, product.clone());

    Ok(ApiResponse { data: product })
}

/// Handler for creating a product (POST /products).
///
/// - `201 Created` with the stored product, including its assigned id.
/// - `400 Bad Request` for malformed or invalid bodies.
/// - `401 Unauthorized` without a valid API token.
#[tracing::instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Product>), AppError> {
    // ---
    let product = parse_body(body)?;
    product.validate().map_err(AppError::BadRequest)?;

    let mut session = state.connect().await?;
    let created = session.create_product(product).await?;

    tracing::info!("Created product {}/{}", created.id, created.name);
    state.governance().metrics().record_product_created();

    Ok((StatusCode::CREATED, ApiResponse { data: created }))
}

/// Handler for updating a product (PUT /products/{id}).
///
/// Does not touch the product cache: a previously cached version keeps being
/// served by `GET /products/{id}`.
///
/// - `200 OK` with the updated product.
/// - `404 Not Found` if no product has this id.
#[tracing::instrument(skip(state, id, body))]
pub async fn update_product(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<ApiResponse<Product>, AppError> {
    // ---
    let id = parse_id(id)?;
    let update = parse_body(body)?;
    update.validate().map_err(AppError::BadRequest)?;

    let mut session = state.connect().await?;
    let updated = session
        .update_product(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    Ok(ApiResponse { data: updated })
}

/// Handler for deleting a product (DELETE /products/{id}).
///
/// Does not touch the product cache.
///
/// - `204 No Content` if the product was deleted.
/// - `404 Not Found` if no product has this id.
#[tracing::instrument(skip(state, id))]
pub async fn delete_product(
    State(state): State<AppState>,
    _auth: RequireApiToken,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    // ---
    let id = parse_id(id)?;

    let mut session = state.connect().await?;
    if session.delete_product(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id} not found")))
    }
}
