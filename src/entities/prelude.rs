pub use super::app_user::Entity as AppUser;
pub use super::menu::Entity as Menu;
pub use super::resource::Entity as Resource;
pub use super::role::Entity as Role;
pub use super::role_menu::Entity as RoleMenu;
pub use super::user_role::Entity as UserRole;
