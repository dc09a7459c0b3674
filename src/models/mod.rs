//! Data models representing credential records.
//!
//! The three collections are independent: no record references another.

/// Identities exempt from key checks
pub mod whitelist;
/// Single-use redemption keys
pub mod redemption_key;
/// Multi-use, time-bounded premium keys
pub mod premium_key;
/// Remote key-check request/response bodies
pub mod check_key;

pub use check_key::{CheckKeyRequest, CheckKeyResponse};
pub use premium_key::{NewPremiumKey, PremiumKey};
pub use redemption_key::RedemptionKey;
pub use whitelist::WhitelistEntry;
