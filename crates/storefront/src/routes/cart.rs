//! Cart route handlers.
//!
//! Every mutation answers with the updated cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use darccuir_core::{CartItemId, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::OptionalAuth;
use crate::models::{CartView, CurrentUser};
use crate::services::cart::{CartService, current_owner, owner_or_create};
use crate::state::AppState;

/// Body of `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Body of `PATCH /api/cart/items/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

async fn current_cart(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
) -> Result<CartView> {
    let owner = current_owner(session, user).await?;
    let cart = CartService::new(state.pool())
        .get(owner, user.map(|u| u.role))
        .await?;
    Ok(cart)
}

/// `GET /api/cart`: the visitor's cart priced for their role.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<CartView>> {
    Ok(Json(current_cart(&state, &session, user.as_ref()).await?))
}

/// `POST /api/cart/items`: add a product, merging with an existing line.
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>)> {
    let owner = owner_or_create(&session, user.as_ref()).await?;
    CartService::new(state.pool())
        .add(owner, body.product_id, body.quantity)
        .await?;

    let product_id = body.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    let cart = current_cart(&state, &session, user.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

/// `PATCH /api/cart/items/{id}`: set a line's quantity; zero removes it.
#[instrument(skip(state, session, user))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    let owner = current_owner(&session, user.as_ref()).await?;
    CartService::new(state.pool())
        .update(owner, id, body.quantity)
        .await?;

    Ok(Json(current_cart(&state, &session, user.as_ref()).await?))
}

/// `DELETE /api/cart/items/{id}`: remove a line.
#[instrument(skip(state, session, user))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<CartItemId>,
) -> Result<Json<CartView>> {
    let owner = current_owner(&session, user.as_ref()).await?;
    CartService::new(state.pool()).remove(owner, id).await?;

    Ok(Json(current_cart(&state, &session, user.as_ref()).await?))
}
