//! Request handlers, one module per resource

pub mod auth;
pub mod categories;
pub mod health;
pub mod payments;
pub mod stats;
pub mod subscriptions;
pub mod users;

use crate::{error::ApiError, extractors::ValidatedJson};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// A validated JSON body, or the reason it was rejected so the handler can
/// name the failed operation
pub type JsonBody<T> = Result<ValidatedJson<T>, ApiError>;

/// Reads a present key as `Some`, so an explicit `null` becomes
/// `Some(None)`; pair with `#[serde(default)]` so a missing key stays `None`
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Rejects negative prices and amounts
pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_amount")
            .with_message("must not be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(&Decimal::new(0, 0)).is_ok());
        assert!(validate_non_negative(&Decimal::new(2999, 2)).is_ok());
        assert!(validate_non_negative(&Decimal::new(-1, 2)).is_err());
    }
}
