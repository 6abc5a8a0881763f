//! Product catalog endpoints

use std::str::FromStr;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::api::middleware::{AdminOnly, AnyRole, Auth};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidatedJson};
use crate::domain::pagination::Pagination;
use crate::domain::product::{Gender, PlainProduct, ProductDraft, ProductId, ProductPatch};

pub fn create_products_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{term}",
            get(get_product).patch(update_product).delete(delete_product),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(range(min = 0.0, message = "price must be positive"))]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[validate(range(min = 0, message = "stock must be positive"))]
    pub stock: Option<i32>,
    pub sizes: Vec<String>,
    pub gender: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProductRequest {
    fn into_draft(self) -> Result<ProductDraft, ApiError> {
        Ok(ProductDraft {
            gender: parse_gender(&self.gender)?,
            title: self.title,
            slug: self.slug,
            price: self.price,
            stock: self.stock,
            description: self.description,
            sizes: self.sizes,
            tags: self.tags,
            images: self.images,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(range(min = 0.0, message = "price must be positive"))]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[validate(range(min = 0, message = "stock must be positive"))]
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl UpdateProductRequest {
    fn into_patch(self) -> Result<ProductPatch, ApiError> {
        Ok(ProductPatch {
            gender: self.gender.as_deref().map(parse_gender).transpose()?,
            title: self.title,
            slug: self.slug,
            price: self.price,
            stock: self.stock,
            description: self.description,
            sizes: self.sizes,
            tags: self.tags,
            images: self.images,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

fn parse_gender(value: &str) -> Result<Gender, ApiError> {
    Gender::from_str(value).map_err(|e| ApiError::from(e).with_param("gender"))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    auth: Auth<AnyRole>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<PlainProduct>), ApiError> {
    let draft = request.into_draft()?;
    let product = state.product_service.create(draft, &auth.user).await?;

    info!(product_id = %product.id, user_id = %auth.user.id(), "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products?limit&offset
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<PlainProduct>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let page = Pagination::new(query.limit, query.offset)?;

    Ok(Json(state.product_service.find_all(page).await?))
}

/// GET /products/{term}
///
/// The term is either a product id or a title/slug.
pub async fn get_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<PlainProduct>, ApiError> {
    Ok(Json(state.product_service.find_one_plain(&term).await?))
}

/// PATCH /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Auth<AdminOnly>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<PlainProduct>, ApiError> {
    let id = ProductId::parse(&id)?;
    let patch = request.into_patch()?;

    let product = state.product_service.update(&id, patch, &auth.user).await?;

    info!(product_id = %id, user_id = %auth.user.id(), "Product updated");

    Ok(Json(product))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Auth<AdminOnly>,
) -> Result<Json<Value>, ApiError> {
    let id = ProductId::parse(&id)?;

    state.product_service.remove(&id).await?;

    info!(product_id = %id, user_id = %auth.user.id(), "Product deleted");

    Ok(Json(json!({ "message": "Product deleted" })))
}
