//! Cart operations.
//!
//! Logged-in customers own a cart through their user id. Anonymous visitors
//! get a random `cart_session` id stored in their session on first add.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::Session;
use uuid::Uuid;

use darccuir_core::{CartId, CartItemId, ProductId, UserRole};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{CartOwner, CartView, CurrentUser, session_keys};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Product missing or not on sale.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Line missing from the owner's cart.
    #[error("cart item not found: {0}")]
    ItemNotFound(CartItemId),

    /// Quantity out of range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i32),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// The cart owner for this request, if the visitor has one yet.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn current_owner(
    session: &Session,
    user: Option<&CurrentUser>,
) -> Result<Option<CartOwner>, tower_sessions::session::Error> {
    if let Some(user) = user {
        return Ok(Some(CartOwner::User(user.id)));
    }
    let id = session.get::<Uuid>(session_keys::CART_SESSION).await?;
    Ok(id.map(CartOwner::Session))
}

/// The cart owner for this request, minting an anonymous id when needed.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn owner_or_create(
    session: &Session,
    user: Option<&CurrentUser>,
) -> Result<CartOwner, tower_sessions::session::Error> {
    if let Some(owner) = current_owner(session, user).await? {
        return Ok(owner);
    }
    let id = Uuid::new_v4();
    session.insert(session_keys::CART_SESSION, id).await?;
    Ok(CartOwner::Session(id))
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Add `quantity` units of `product` to the owner's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`.
    /// Returns `CartError::ProductNotFound` if the product is missing or inactive.
    pub async fn add(
        &self,
        owner: CartOwner,
        product: ProductId,
        quantity: i32,
    ) -> Result<CartItemId, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !self.products.is_active(product).await? {
            return Err(CartError::ProductNotFound(product));
        }

        let cart = self.carts.get_or_create(owner).await?;
        let item = self.carts.add_item(cart, product, quantity).await?;
        Ok(item)
    }

    /// The owner's cart priced for `role`. No owner or no cart yields an
    /// empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if a query fails.
    pub async fn get(
        &self,
        owner: Option<CartOwner>,
        role: Option<UserRole>,
    ) -> Result<CartView, CartError> {
        let Some(owner) = owner else {
            return Ok(CartView::empty());
        };
        let Some(cart) = self.carts.find(owner).await? else {
            return Ok(CartView::empty());
        };

        let items = self.carts.lines(cart).await?;
        Ok(CartView::priced(items, role))
    }

    /// Set the quantity of a line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 0`.
    /// Returns `CartError::ItemNotFound` if the line is not in the owner's cart.
    pub async fn update(
        &self,
        owner: Option<CartOwner>,
        item: CartItemId,
        quantity: i32,
    ) -> Result<(), CartError> {
        if quantity < 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if quantity == 0 {
            return self.remove(owner, item).await;
        }

        let cart = self.owned_cart(owner, item).await?;
        if self.carts.set_quantity(cart, item, quantity).await? {
            Ok(())
        } else {
            Err(CartError::ItemNotFound(item))
        }
    }

    /// Remove a line from the owner's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the line is not in the owner's cart.
    pub async fn remove(&self, owner: Option<CartOwner>, item: CartItemId) -> Result<(), CartError> {
        let cart = self.owned_cart(owner, item).await?;
        if self.carts.remove_item(cart, item).await? {
            Ok(())
        } else {
            Err(CartError::ItemNotFound(item))
        }
    }

    async fn owned_cart(
        &self,
        owner: Option<CartOwner>,
        item: CartItemId,
    ) -> Result<CartId, CartError> {
        let owner = owner.ok_or(CartError::ItemNotFound(item))?;
        self.carts
            .find(owner)
            .await?
            .ok_or(CartError::ItemNotFound(item))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    // Never connects: every case below returns before touching the database.
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/darccuir_unused")
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_quantity() {
        let pool = lazy_pool();
        let service = CartService::new(&pool);
        let owner = CartOwner::Session(Uuid::new_v4());

        let result = service.add(owner, ProductId::new(1), 0).await;
        assert!(matches!(result, Err(CartError::InvalidQuantity(0))));
    }

    #[tokio::test]
    async fn test_update_rejects_negative_quantity() {
        let pool = lazy_pool();
        let service = CartService::new(&pool);

        let result = service.update(None, CartItemId::new(3), -2).await;
        assert!(matches!(result, Err(CartError::InvalidQuantity(-2))));
    }

    #[tokio::test]
    async fn test_visitor_without_cart_sees_empty_cart() {
        let pool = lazy_pool();
        let service = CartService::new(&pool);

        let cart = service.get(None, None).await.unwrap();
        assert_eq!(cart, CartView::empty());
    }

    #[tokio::test]
    async fn test_visitor_without_cart_cannot_touch_items() {
        let pool = lazy_pool();
        let service = CartService::new(&pool);

        let result = service.remove(None, CartItemId::new(7)).await;
        assert!(matches!(result, Err(CartError::ItemNotFound(_))));

        let result = service.update(None, CartItemId::new(7), 0).await;
        assert!(matches!(result, Err(CartError::ItemNotFound(_))));
    }
}
