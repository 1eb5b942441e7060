//! User records and their validation.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → model.rs (NewUser, every field optional)
//!     → validation.rs (per-field rules, first failure wins)
//!     → UserRecord (normalized, safe to forward)
//! ```

pub mod model;
pub mod validation;

pub use model::{NewUser, Role, UserRecord};
pub use validation::{
    validate_age, validate_email, validate_name, validate_password, validate_role,
    validate_user, validate_username, ValidationError,
};
