//! Cart repository.
//!
//! A cart belongs either to a user or to an anonymous session id, never both.
//! Each product appears at most once per cart; adding it again bumps the
//! quantity.

use rust_decimal::Decimal;
use sqlx::PgPool;

use darccuir_core::{CartId, CartItemId, ProductId};

use super::RepositoryError;
use crate::models::{CartItemView, CartOwner, CartProduct};

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    item_id: i32,
    quantity: i32,
    product_id: i32,
    name: String,
    price: Decimal,
    price_wholesale: Option<Decimal>,
    cover_images: Vec<String>,
    stock: i32,
}

impl From<CartLineRow> for CartItemView {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartItemId::new(row.item_id),
            quantity: row.quantity,
            product: CartProduct {
                id: ProductId::new(row.product_id),
                name: row.name,
                price: row.price,
                price_wholesale: row.price_wholesale,
                cover_images: row.cover_images,
                stock: row.stock,
            },
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The cart of `owner`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(&self, owner: CartOwner) -> Result<Option<CartId>, RepositoryError> {
        let id = match owner {
            CartOwner::User(user_id) => {
                sqlx::query_scalar::<_, i32>("SELECT id FROM shop.cart WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_optional(self.pool)
                    .await?
            }
            CartOwner::Session(session_id) => {
                sqlx::query_scalar::<_, i32>("SELECT id FROM shop.cart WHERE session_id = $1")
                    .bind(session_id)
                    .fetch_optional(self.pool)
                    .await?
            }
        };

        Ok(id.map(CartId::new))
    }

    /// The cart of `owner`, created on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, owner: CartOwner) -> Result<CartId, RepositoryError> {
        let id = match owner {
            CartOwner::User(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    r"
                    INSERT INTO shop.cart (user_id) VALUES ($1)
                    ON CONFLICT (user_id) DO UPDATE SET updated_at = now()
                    RETURNING id
                    ",
                )
                .bind(user_id)
                .fetch_one(self.pool)
                .await?
            }
            CartOwner::Session(session_id) => {
                sqlx::query_scalar::<_, i32>(
                    r"
                    INSERT INTO shop.cart (session_id) VALUES ($1)
                    ON CONFLICT (session_id) DO UPDATE SET updated_at = now()
                    RETURNING id
                    ",
                )
                .bind(session_id)
                .fetch_one(self.pool)
                .await?
            }
        };

        Ok(CartId::new(id))
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_item(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO shop.cart_item (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = shop.cart_item.quantity + EXCLUDED.quantity,
                          updated_at = now()
            RETURNING id
            ",
        )
        .bind(cart)
        .bind(product)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(CartItemId::new(id))
    }

    /// Lines of a cart with their product data, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart: CartId) -> Result<Vec<CartItemView>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r"
            SELECT ci.id AS item_id, ci.quantity, p.id AS product_id, p.name, p.price,
                   p.price_wholesale, p.cover_images, p.stock
            FROM shop.cart_item ci
            JOIN shop.product p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC, ci.id ASC
            ",
        )
        .bind(cart)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Set the quantity of a line. Returns `false` if the line is not in `cart`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_quantity(
        &self,
        cart: CartId,
        item: CartItemId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.cart_item SET quantity = $3, updated_at = now()
            WHERE id = $2 AND cart_id = $1
            ",
        )
        .bind(cart)
        .bind(item)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a line. Returns `false` if the line is not in `cart`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(&self, cart: CartId, item: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.cart_item WHERE id = $2 AND cart_id = $1")
            .bind(cart)
            .bind(item)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
