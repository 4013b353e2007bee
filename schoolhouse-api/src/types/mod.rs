//! Per-entity request and response types.

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod parents;
pub mod settings;
pub mod students;
pub mod teachers;

pub use attendance::*;
pub use auth::*;
pub use classes::*;
pub use parents::*;
pub use settings::*;
pub use students::*;
pub use teachers::*;
