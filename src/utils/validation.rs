//! Address validation
//!
//! Runs before every backend call that takes an address. Input that fails
//! here never reaches the network layer.

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{MSG_EMPTY_ADDRESS, MSG_INVALID_ADDRESS};

/// Length of the hex body after the `0x` prefix
const ADDRESS_HEX_LEN: usize = 40;

/// `0x` followed by exactly 40 hex characters, any case
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(body) => body.len() == ADDRESS_HEX_LEN && hex::decode(body).is_ok(),
        None => false,
    }
}

/// Validate a user-supplied address, returning the reason on failure
pub fn validate_address(address: &str) -> AppResult<()> {
    if address.is_empty() {
        return Err(AppError::invalid_address(MSG_EMPTY_ADDRESS));
    }
    if !is_valid_address(address) {
        return Err(AppError::invalid_address(MSG_INVALID_ADDRESS));
    }
    Ok(())
}
