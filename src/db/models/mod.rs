//! Database models split into domain-specific modules.

pub mod approach_card;
pub mod content;
pub mod homepage;
pub mod tenant;
pub mod user;

pub use approach_card::*;
pub use content::*;
pub use homepage::*;
pub use tenant::*;
pub use user::*;
