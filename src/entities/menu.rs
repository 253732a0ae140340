//! `SeaORM` Entity, hierarchical menu
//!
//! `parent_path` holds the ids of every ancestor, each followed by a dot
//! (`"1.4."` for a menu whose parent is 4 and grandparent is 1). Root menus
//! have `parent_id == 0` and an empty path.

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{MenuStatus, MenuType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "menu")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: String,
    pub sequence: i32,
    pub r#type: MenuType,
    pub path: String,
    pub property: Option<Json>,
    pub parent_id: i32,
    pub parent_path: String,
    pub status: MenuStatus,
    pub created: DateTime,
    pub updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::resource::Entity")]
    Resource,
    #[sea_orm(has_many = "super::role_menu::Entity")]
    RoleMenu,
}

impl Related<super::resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resource.def()
    }
}

impl Related<super::role_menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleMenu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
