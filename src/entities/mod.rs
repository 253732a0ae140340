pub mod prelude;

pub mod app_user;
pub mod menu;
pub mod resource;
pub mod role;
pub mod role_menu;
pub mod sea_orm_active_enums;
pub mod user_role;
