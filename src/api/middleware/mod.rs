//! Request middleware.
//!
//! Execution order (outermost → innermost):
//! 1. Access log: method, path, status, identity
//! 2. Auth: API routes answer 401, pages redirect to the login page

pub mod audit;
pub mod auth;
