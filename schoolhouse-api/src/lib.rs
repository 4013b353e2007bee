//! Schoolhouse API wire types.
//!
//! Request and response shapes for the REST collaborator. The backend is an
//! opaque HTTP service; these types pin down only the envelope the client
//! depends on: `{ "data": ... }` for reads, `{ "message": ... }` for writes.

pub mod envelope;
pub mod types;

pub use envelope::*;
pub use types::*;
