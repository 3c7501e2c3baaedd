//! Wishlist types.
//!
//! Wishlist rows are pure join records, so list reads surface the saved
//! products themselves rather than a wishlist entity.

use serde::Serialize;
use utoipa::ToSchema;

/// Membership check result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WishlistStatus {
    pub in_wishlist: bool,
}
