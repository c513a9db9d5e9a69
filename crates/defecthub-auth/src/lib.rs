//! # defecthub-auth
//!
//! Authentication and authorization building blocks for DefectHub.
//!
//! ## Modules
//!
//! - `password`: argon2id credential hashing and constant-time verification
//! - `jwt`: HS256 bearer token issuance and validation
//! - `rbac`: route-level role requirements
//! - `acl`: per-attachment download access

pub mod acl;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use acl::{can_access, require_access};
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Action, RbacEnforcer};
