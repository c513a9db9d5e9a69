//! Route-level role requirements.

pub mod enforcer;
pub mod policies;

pub use enforcer::RbacEnforcer;
pub use policies::Action;
