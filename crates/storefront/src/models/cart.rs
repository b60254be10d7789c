//! Cart types and pricing.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use darccuir_core::{CartItemId, PriceType, ProductId, UserId, UserRole};

/// Who a cart belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOwner {
    /// A logged-in account.
    User(UserId),
    /// An anonymous visitor, keyed by the `cart_session` id in their session.
    Session(Uuid),
}

/// Product data shown next to a cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub price_wholesale: Option<Decimal>,
    pub cover_images: Vec<String>,
    pub stock: i32,
}

impl CartProduct {
    /// Unit price for a buyer with `role`.
    ///
    /// Wholesale buyers pay `price_wholesale`, or `price` when the product has
    /// no wholesale price. Everyone else, anonymous visitors included, pays
    /// `price`.
    #[must_use]
    pub fn unit_price(&self, role: Option<UserRole>) -> Decimal {
        match role.map(|r| r.price_type()) {
            Some(PriceType::Mayorista) => self.price_wholesale.unwrap_or(self.price),
            _ => self.price,
        }
    }
}

/// A cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: CartItemId,
    pub quantity: i32,
    pub product: CartProduct,
}

/// A cart with its total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
}

impl CartView {
    /// Price `items` for a buyer with `role`.
    #[must_use]
    pub fn priced(items: Vec<CartItemView>, role: Option<UserRole>) -> Self {
        let total = items
            .iter()
            .map(|item| item.product.unit_price(role) * Decimal::from(item.quantity))
            .sum();
        Self { items, total }
    }

    /// The view of a visitor without a cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
        }
    }
}
