//! The cart store.
//!
//! Holds the single-restaurant cart, applies the merge/replace rules, and
//! snapshots every mutation to local storage so a fresh session starts from
//! the last cart. An explicit context object: callers own a `CartStore` and
//! hand it to whatever needs it, so tests and concurrent sessions stay
//! isolated.
//!
//! Persistence failures do not roll back the in-memory cart; the mutation
//! stands and the failed write is logged. Across such a failure the
//! in-memory and persisted snapshots diverge until the next successful
//! write.

use std::num::NonZeroU32;

use thiserror::Error;
use tracing::{debug, warn};

use samovar_core::{Cart, CartLine, CartLineId, Product, RestaurantId, SelectedOption};

use crate::pricing::{SelectionError, resolve_unit_price, validate_selections};
use crate::storage::{LocalStore, keys};

/// What to do when an added product belongs to a different restaurant than
/// the current cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Refuse the add and report [`CartError::RestaurantMismatch`] so the
    /// caller can confirm with the user first.
    #[default]
    Reject,
    /// Discard the current cart and start over with the new line. This is
    /// the destructive path; callers invoke it only after confirmation.
    Replace,
}

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product belongs to a different restaurant than the cart.
    #[error("cart belongs to restaurant '{in_cart}', product to '{added}'")]
    RestaurantMismatch {
        in_cart: RestaurantId,
        added: RestaurantId,
    },

    /// The selection set does not fit the product's options.
    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),
}

/// The cart store: in-memory cart plus its local-storage handle.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    store: LocalStore,
}

impl CartStore {
    /// Open the cart store, hydrating from the `cart` snapshot if present.
    ///
    /// A missing or corrupt snapshot degrades to an empty cart; corruption
    /// is logged, not surfaced - the cart is reconstructible state.
    #[must_use]
    pub fn open(store: LocalStore) -> Self {
        let cart = match store.get::<Cart>(keys::CART) {
            Ok(Some(cart)) => {
                debug!(
                    lines = cart.items.len(),
                    "hydrated cart from local storage"
                );
                cart
            }
            Ok(None) => Cart::empty(),
            Err(e) => {
                warn!(error = %e, "failed to hydrate cart, starting empty");
                Cart::empty()
            }
        };
        Self { cart, store }
    }

    /// Add `quantity` of `product` with the given option selections.
    ///
    /// Merging: a line with the same product and an identical multiset of
    /// selected (option, value) pairs has its quantity incremented;
    /// otherwise a new line is appended with a fresh identity and the unit
    /// price frozen at this moment. A product from another restaurant is
    /// rejected or replaces the cart wholesale, per `policy`.
    ///
    /// # Errors
    ///
    /// [`CartError::InvalidSelection`] if the selections do not fit the
    /// product; [`CartError::RestaurantMismatch`] on a restaurant conflict
    /// under [`ConflictPolicy::Reject`].
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: NonZeroU32,
        selections: Vec<SelectedOption>,
        policy: ConflictPolicy,
    ) -> Result<(), CartError> {
        validate_selections(product, &selections)?;

        if let Some(in_cart) = &self.cart.restaurant_id
            && *in_cart != product.restaurant_id
        {
            match policy {
                ConflictPolicy::Reject => {
                    return Err(CartError::RestaurantMismatch {
                        in_cart: in_cart.clone(),
                        added: product.restaurant_id.clone(),
                    });
                }
                ConflictPolicy::Replace => {
                    debug!(
                        from = %in_cart,
                        to = %product.restaurant_id,
                        "replacing cart contents on restaurant switch"
                    );
                    self.cart.items.clear();
                    self.cart.restaurant_id = None;
                }
            }
        }

        let key = samovar_core::cart::selection_key(&selections);
        if let Some(line) = self
            .cart
            .items
            .iter_mut()
            .find(|line| line.product_id == product.id && line.selection_key() == key)
        {
            line.quantity += quantity.get();
        } else {
            let unit_price = resolve_unit_price(product, &selections);
            self.cart.items.push(CartLine {
                id: CartLineId::generate(),
                product_id: product.id.clone(),
                product: product.clone(),
                quantity: quantity.get(),
                selected_options: selections,
                unit_price,
            });
            self.cart.restaurant_id = Some(product.restaurant_id.clone());
        }

        self.recompute_and_persist();
        Ok(())
    }

    /// Set a line's quantity exactly (not incrementally). Zero removes the
    /// line; an unknown id is a silent no-op.
    pub fn set_quantity(&mut self, line_id: &CartLineId, quantity: u32) {
        if quantity == 0 {
            self.remove_line(line_id);
            return;
        }
        let Some(line) = self.cart.items.iter_mut().find(|line| &line.id == line_id) else {
            return;
        };
        line.quantity = quantity;
        self.recompute_and_persist();
    }

    /// Remove a line. An unknown id is a silent no-op. Emptying the cart
    /// clears the restaurant binding.
    pub fn remove_line(&mut self, line_id: &CartLineId) {
        let before = self.cart.items.len();
        self.cart.items.retain(|line| &line.id != line_id);
        if self.cart.items.len() == before {
            return;
        }
        if self.cart.items.is_empty() {
            self.cart.restaurant_id = None;
        }
        self.recompute_and_persist();
    }

    /// Reset to the empty cart and persist that empty state.
    pub fn clear(&mut self) {
        self.cart = Cart::empty();
        self.persist();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    /// The denormalized subtotal, recomputed on every mutation.
    #[must_use]
    pub fn subtotal(&self) -> samovar_core::Price {
        self.cart.subtotal
    }

    /// The restaurant the cart is bound to; `None` when empty.
    #[must_use]
    pub const fn restaurant_id(&self) -> Option<&RestaurantId> {
        self.cart.restaurant_id.as_ref()
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.cart.items
    }

    /// A clone of the full cart snapshot (for checkout assembly).
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    fn recompute_and_persist(&mut self) {
        self.cart.subtotal = self.cart.computed_subtotal();
        self.persist();
    }

    /// Snapshot the cart to local storage. A failed write keeps the
    /// in-memory state authoritative for this session.
    fn persist(&self) {
        if let Err(e) = self.store.set(keys::CART, &self.cart) {
            warn!(error = %e, "failed to persist cart snapshot");
        }
    }
}
