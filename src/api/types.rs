//! Request and response bodies, and the conversions between them and the
//! persistence models.
//!
//! Create requests carry the identity fields as required values and default
//! everything else. Update requests make every field optional: an omitted
//! field keeps its stored value and `updated` is refreshed unless supplied.
//! Association lists on update follow the same rule, so an absent list keeps
//! the current rows while a present one (even empty) replaces them.

use std::{collections::HashSet, str::FromStr};

use chrono::{NaiveDateTime, SubsecRound, Utc};
use sea_orm::ActiveValue::{self, NotSet, Set, Unchanged};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::{
    api::paging::to_offset_limit,
    entities::{
        app_user, menu, resource, role, role_menu,
        sea_orm_active_enums::{MenuStatus, MenuType, RoleStatus, UserStatus},
        user_role,
    },
    error::{AppError, AppResult},
    repository::{menu::MenuFilter, role::RoleFilter, user::UserFilter},
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIMESTAMP_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Current UTC time at the precision the store keeps.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_INPUT_FORMAT)
        .map(|value| value.trunc_subsecs(6))
        .map_err(|err| AppError::Convert(format!("invalid timestamp {raw:?}: {err}")))
}

fn timestamp_or(raw: &Option<String>, default: NaiveDateTime) -> AppResult<NaiveDateTime> {
    match raw {
        Some(raw) => parse_timestamp(raw),
        None => Ok(default),
    }
}

fn timestamp_opt(raw: &Option<String>) -> AppResult<Option<NaiveDateTime>> {
    raw.as_deref().map(parse_timestamp).transpose()
}

fn set_or_keep<V>(value: Option<V>) -> ActiveValue<V>
where
    V: Into<sea_orm::Value>,
{
    value.map_or(NotSet, Set)
}

/// Keeps an explicit `null` apart from an omitted field: omitted is `None`,
/// `null` is `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Association tables hold one row per pair, so a list naming the same id
/// twice is rejected before anything is written.
fn ensure_distinct(ids: impl IntoIterator<Item = i32>, field: &str) -> AppResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validate(format!("duplicate {field} {id}")));
        }
    }
    Ok(())
}

/// Serde adapter for timestamps in responses.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub remark: Option<String>,
    pub status: Option<UserStatus>,
    pub created: Option<String>,
    pub updated: Option<String>,
    #[serde(default)]
    pub role: Vec<UserRoleRequest>,
}

impl CreateUserRequest {
    pub fn validate_associations(&self) -> AppResult<()> {
        ensure_distinct(self.role.iter().map(|role| role.role_id), "role_id")
    }

    pub fn to_create_params(&self, password_hash: String, now: NaiveDateTime) -> AppResult<app_user::ActiveModel> {
        Ok(app_user::ActiveModel {
            id: NotSet,
            username: Set(self.username.clone()),
            password: Set(password_hash),
            name: Set(self.name.clone().unwrap_or_default()),
            email: Set(self.email.clone().unwrap_or_default()),
            phone: Set(self.phone.clone().unwrap_or_default()),
            remark: Set(self.remark.clone().unwrap_or_default()),
            status: Set(self.status.unwrap_or(UserStatus::Activated)),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub remark: Option<String>,
    pub status: Option<UserStatus>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub role: Option<Vec<UserRoleRequest>>,
}

impl UpdateUserRequest {
    pub fn validate_associations(&self) -> AppResult<()> {
        ensure_distinct(self.role.iter().flatten().map(|role| role.role_id), "role_id")
    }

    pub fn to_update_params(
        &self,
        id: i32,
        password_hash: Option<String>,
        now: NaiveDateTime,
    ) -> AppResult<app_user::ActiveModel> {
        Ok(app_user::ActiveModel {
            id: Unchanged(id),
            username: set_or_keep(self.username.clone()),
            password: set_or_keep(password_hash),
            name: set_or_keep(self.name.clone()),
            email: set_or_keep(self.email.clone()),
            phone: set_or_keep(self.phone.clone()),
            remark: set_or_keep(self.remark.clone()),
            status: set_or_keep(self.status),
            created: set_or_keep(timestamp_opt(&self.created)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRoleRequest {
    pub role_id: i32,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl UserRoleRequest {
    pub fn to_params(&self, user_id: i32, now: NaiveDateTime) -> AppResult<user_role::ActiveModel> {
        Ok(user_role::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            role_id: Set(self.role_id),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub remark: String,
    pub status: UserStatus,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated: NaiveDateTime,
    pub role: Vec<UserRoleResponse>,
}

impl UserResponse {
    pub fn new(user: app_user::Model, roles: Vec<user_role::Model>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            phone: user.phone,
            remark: user.remark,
            status: user.status,
            created: user.created,
            updated: user.updated,
            role: roles.into_iter().map(UserRoleResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleResponse {
    pub id: i32,
    pub user_id: i32,
    pub role_id: i32,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated: NaiveDateTime,
}

impl From<user_role::Model> for UserRoleResponse {
    fn from(row: user_role::Model) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            role_id: row.role_id,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub username: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub current: Option<i64>,
    pub page_size: Option<i64>,
}

impl UserListQuery {
    pub fn filter(&self) -> AppResult<UserFilter> {
        Ok(UserFilter {
            username: non_empty(&self.username),
            name: non_empty(&self.name),
            status: parse_enum(&self.status)?,
        })
    }

    pub fn paging(&self) -> (u64, Option<u64>) {
        to_offset_limit(self.current.unwrap_or(0), self.page_size.unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    pub sequence: Option<i32>,
    pub status: Option<RoleStatus>,
    pub created: Option<String>,
    pub updated: Option<String>,
    #[serde(default)]
    pub menu: Vec<RoleMenuRequest>,
}

impl CreateRoleRequest {
    pub fn validate_associations(&self) -> AppResult<()> {
        ensure_distinct(self.menu.iter().map(|menu| menu.menu_id), "menu_id")
    }

    pub fn to_create_params(&self, now: NaiveDateTime) -> AppResult<role::ActiveModel> {
        Ok(role::ActiveModel {
            id: NotSet,
            code: Set(self.code.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone().unwrap_or_default()),
            sequence: Set(self.sequence.unwrap_or_default()),
            status: Set(self.status.unwrap_or(RoleStatus::Enabled)),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sequence: Option<i32>,
    pub status: Option<RoleStatus>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub menu: Option<Vec<RoleMenuRequest>>,
}

impl UpdateRoleRequest {
    pub fn validate_associations(&self) -> AppResult<()> {
        ensure_distinct(self.menu.iter().flatten().map(|menu| menu.menu_id), "menu_id")
    }

    pub fn to_update_params(&self, id: i32, now: NaiveDateTime) -> AppResult<role::ActiveModel> {
        Ok(role::ActiveModel {
            id: Unchanged(id),
            code: set_or_keep(self.code.clone()),
            name: set_or_keep(self.name.clone()),
            description: set_or_keep(self.description.clone()),
            sequence: set_or_keep(self.sequence),
            status: set_or_keep(self.status),
            created: set_or_keep(timestamp_opt(&self.created)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleMenuRequest {
    pub menu_id: i32,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl RoleMenuRequest {
    pub fn to_params(&self, role_id: i32, now: NaiveDateTime) -> AppResult<role_menu::ActiveModel> {
        Ok(role_menu::ActiveModel {
            id: NotSet,
            role_id: Set(role_id),
            menu_id: Set(self.menu_id),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: String,
    pub sequence: i32,
    pub status: RoleStatus,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated: NaiveDateTime,
    pub menu: Vec<RoleMenuResponse>,
}

impl RoleResponse {
    pub fn new(role: role::Model, menus: Vec<role_menu::Model>) -> Self {
        Self {
            id: role.id,
            code: role.code,
            name: role.name,
            description: role.description,
            sequence: role.sequence,
            status: role.status,
            created: role.created,
            updated: role.updated,
            menu: menus.into_iter().map(RoleMenuResponse::from).collect(),
        }
    }
}

/// A `role_menu` row, listed under a role as `menu` and under a menu as `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMenuResponse {
    pub id: i32,
    pub role_id: i32,
    pub menu_id: i32,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated: NaiveDateTime,
}

impl From<role_menu::Model> for RoleMenuResponse {
    fn from(row: role_menu::Model) -> Self {
        Self {
            id: row.id,
            role_id: row.role_id,
            menu_id: row.menu_id,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListQuery {
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub current: Option<i64>,
    pub page_size: Option<i64>,
}

impl RoleListQuery {
    pub fn filter(&self) -> AppResult<RoleFilter> {
        Ok(RoleFilter {
            code: non_empty(&self.code),
            name: non_empty(&self.name),
            status: parse_enum(&self.status)?,
        })
    }

    pub fn paging(&self) -> (u64, Option<u64>) {
        to_offset_limit(self.current.unwrap_or(0), self.page_size.unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    pub sequence: Option<i32>,
    pub r#type: Option<MenuType>,
    pub path: Option<String>,
    pub property: Option<serde_json::Value>,
    #[validate(range(min = 0))]
    pub parent_id: Option<i32>,
    pub status: Option<MenuStatus>,
    pub created: Option<String>,
    pub updated: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub resource: Vec<ResourceRequest>,
    #[serde(default)]
    pub role: Vec<MenuRoleRequest>,
}

impl CreateMenuRequest {
    pub fn validate_associations(&self) -> AppResult<()> {
        ensure_distinct(self.role.iter().map(|role| role.role_id), "role_id")
    }

    pub fn parent_id(&self) -> i32 {
        self.parent_id.unwrap_or(0)
    }

    pub fn to_create_params(&self, parent_path: String, now: NaiveDateTime) -> AppResult<menu::ActiveModel> {
        Ok(menu::ActiveModel {
            id: NotSet,
            code: Set(self.code.clone()),
            name: Set(self.name.clone()),
            description: Set(self.description.clone().unwrap_or_default()),
            sequence: Set(self.sequence.unwrap_or_default()),
            r#type: Set(self.r#type.unwrap_or(MenuType::Button)),
            path: Set(self.path.clone().unwrap_or_default()),
            property: Set(self.property.clone()),
            parent_id: Set(self.parent_id()),
            parent_path: Set(parent_path),
            status: Set(self.status.unwrap_or(MenuStatus::Enabled)),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

/// `parent_id` is accepted only when it matches the stored value; a menu
/// cannot be moved to another parent. `property: null` clears the stored
/// property, an omitted `property` keeps it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMenuRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: Option<String>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sequence: Option<i32>,
    pub r#type: Option<MenuType>,
    pub path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub property: Option<Option<serde_json::Value>>,
    pub parent_id: Option<i32>,
    pub status: Option<MenuStatus>,
    pub created: Option<String>,
    pub updated: Option<String>,
    #[validate(nested)]
    pub resource: Option<Vec<ResourceRequest>>,
    pub role: Option<Vec<MenuRoleRequest>>,
}

impl UpdateMenuRequest {
    pub fn validate_associations(&self) -> AppResult<()> {
        ensure_distinct(self.role.iter().flatten().map(|role| role.role_id), "role_id")
    }

    pub fn to_update_params(&self, id: i32, now: NaiveDateTime) -> AppResult<menu::ActiveModel> {
        Ok(menu::ActiveModel {
            id: Unchanged(id),
            code: set_or_keep(self.code.clone()),
            name: set_or_keep(self.name.clone()),
            description: set_or_keep(self.description.clone()),
            sequence: set_or_keep(self.sequence),
            r#type: set_or_keep(self.r#type),
            path: set_or_keep(self.path.clone()),
            property: set_or_keep(self.property.clone()),
            parent_id: NotSet,
            parent_path: NotSet,
            status: set_or_keep(self.status),
            created: set_or_keep(timestamp_opt(&self.created)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResourceRequest {
    #[validate(length(min = 1))]
    pub method: String,
    #[validate(length(min = 1))]
    pub path: String,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl ResourceRequest {
    pub fn to_params(&self, menu_id: i32, now: NaiveDateTime) -> AppResult<resource::ActiveModel> {
        Ok(resource::ActiveModel {
            id: NotSet,
            menu_id: Set(menu_id),
            method: Set(self.method.clone()),
            path: Set(self.path.clone()),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuRoleRequest {
    pub role_id: i32,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl MenuRoleRequest {
    pub fn to_params(&self, menu_id: i32, now: NaiveDateTime) -> AppResult<role_menu::ActiveModel> {
        Ok(role_menu::ActiveModel {
            id: NotSet,
            role_id: Set(self.role_id),
            menu_id: Set(menu_id),
            created: Set(timestamp_or(&self.created, now)?),
            updated: Set(timestamp_or(&self.updated, now)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: String,
    pub sequence: i32,
    pub r#type: MenuType,
    pub path: String,
    pub property: Option<serde_json::Value>,
    pub parent_id: i32,
    pub parent_path: String,
    pub status: MenuStatus,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated: NaiveDateTime,
    pub resource: Vec<ResourceResponse>,
    pub role: Vec<RoleMenuResponse>,
}

impl MenuResponse {
    pub fn new(menu: menu::Model, resources: Vec<resource::Model>, roles: Vec<role_menu::Model>) -> Self {
        Self {
            id: menu.id,
            code: menu.code,
            name: menu.name,
            description: menu.description,
            sequence: menu.sequence,
            r#type: menu.r#type,
            path: menu.path,
            property: menu.property,
            parent_id: menu.parent_id,
            parent_path: menu.parent_path,
            status: menu.status,
            created: menu.created,
            updated: menu.updated,
            resource: resources.into_iter().map(ResourceResponse::from).collect(),
            role: roles.into_iter().map(RoleMenuResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: i32,
    pub menu_id: i32,
    pub method: String,
    pub path: String,
    #[serde(with = "timestamp")]
    pub created: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated: NaiveDateTime,
}

impl From<resource::Model> for ResourceResponse {
    fn from(row: resource::Model) -> Self {
        Self {
            id: row.id,
            menu_id: row.menu_id,
            method: row.method,
            path: row.path,
            created: row.created,
            updated: row.updated,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuListQuery {
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub r#type: Option<String>,
    pub parent_id: Option<i32>,
    pub current: Option<i64>,
    pub page_size: Option<i64>,
}

impl MenuListQuery {
    pub fn filter(&self) -> AppResult<MenuFilter> {
        Ok(MenuFilter {
            code: non_empty(&self.code),
            name: non_empty(&self.name),
            status: parse_enum(&self.status)?,
            r#type: parse_enum(&self.r#type)?,
            parent_id: self.parent_id,
        })
    }

    pub fn paging(&self) -> (u64, Option<u64>) {
        to_offset_limit(self.current.unwrap_or(0), self.page_size.unwrap_or(0))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

/// Parses an enum-valued filter; empty means "any".
fn parse_enum<T: FromStr>(value: &Option<String>) -> AppResult<Option<T>> {
    match non_empty(value) {
        Some(raw) => T::from_str(&raw)
            .map(Some)
            .map_err(|_| AppError::Validate(format!("unknown filter value {raw:?}"))),
        None => Ok(None),
    }
}
