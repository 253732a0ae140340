pub mod menu;
pub mod role;
pub mod transaction;
pub mod user;

pub use menu::*;
pub use role::*;
pub use transaction::*;
pub use user::*;
