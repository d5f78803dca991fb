//! Domain services called by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Each service is a set of free async functions over `&dyn Store` plus one
//! error enum. Services own validation and defaults; the store only persists.
//! Routes translate service errors into the JSON failure envelope.

pub mod auth;
pub mod board;
pub mod link;
pub mod note;
pub mod settings;
pub mod todo;
