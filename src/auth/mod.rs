//! Authorization subsystem.
//!
//! - [`engine`]: role, whitelist, redemption-key and premium-key decisions
//! - [`guard`]: the check privileged chat commands run before executing
//! - [`secret`]: the process-wide secret guarding `/api/checkKey`

pub mod engine;
pub mod guard;
pub mod secret;

pub use engine::{AuthEngine, PremiumValidation, Redemption, has_admin_role};
pub use guard::{Access, AccessGuard, Actor};
pub use secret::AuthorizationSecret;
