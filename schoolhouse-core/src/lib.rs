//! Schoolhouse Core - Shared Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

pub mod enums;
pub mod error;
pub mod identity;
pub mod role;
pub mod session;

pub use enums::*;
pub use error::*;
pub use identity::*;
pub use role::*;
pub use session::*;
