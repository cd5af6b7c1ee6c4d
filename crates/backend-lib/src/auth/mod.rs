// ============================
// sabha-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod rate_limit;
pub mod token;

pub use password::{hash_password, verify_password};
pub use rate_limit::SignInRateLimiter;
pub use token::{Claims, TokenKeys};
