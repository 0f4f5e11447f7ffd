//! Authorization rules

use crate::errors::CoreError;
use crate::types::{ProductView, UserView};

pub const REQUESTER_UNKNOWN: &str = "Unauthorized";
pub const REVIEW_DELETE_DENIED: &str = "Permission denied: Only Admin or Seller can delete this review";

/// A review may be removed by an Admin or by the seller of the reviewed product.
///
/// The seller is identified by email; a requester without an email never
/// matches, even when the product has no `sellerEmail` either.
pub fn authorize_review_deletion(requester: &UserView, product: &ProductView) -> Result<(), CoreError> {
    if requester.is_admin() {
        return Ok(());
    }

    match (&requester.email, &product.seller_email) {
        (Some(email), Some(seller)) if email == seller => Ok(()),
        _ => Err(CoreError::Forbidden(REVIEW_DELETE_DENIED.to_string())),
    }
}
