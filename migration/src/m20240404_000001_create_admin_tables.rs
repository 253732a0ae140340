use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string_uniq(AppUser::Username))
                    .col(string(AppUser::Password))
                    .col(string(AppUser::Name).default(""))
                    .col(string(AppUser::Email).default(""))
                    .col(string(AppUser::Phone).default(""))
                    .col(string(AppUser::Remark).default(""))
                    .col(string(AppUser::Status).default("activated"))
                    .col(timestamp(AppUser::Created))
                    .col(timestamp(AppUser::Updated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(pk_auto(Role::Id))
                    .col(string_uniq(Role::Code))
                    .col(string(Role::Name))
                    .col(string(Role::Description).default(""))
                    .col(integer(Role::Sequence).default(0))
                    .col(string(Role::Status).default("enabled"))
                    .col(timestamp(Role::Created))
                    .col(timestamp(Role::Updated))
                    .to_owned(),
            )
            .await?;

        // parent_id 0 marks a root menu, so it carries no foreign key
        manager
            .create_table(
                Table::create()
                    .table(Menu::Table)
                    .if_not_exists()
                    .col(pk_auto(Menu::Id))
                    .col(string(Menu::Code))
                    .col(string(Menu::Name))
                    .col(string(Menu::Description).default(""))
                    .col(integer(Menu::Sequence).default(0))
                    .col(string(Menu::Type).default("button"))
                    .col(string(Menu::Path).default(""))
                    .col(json_null(Menu::Property))
                    .col(integer(Menu::ParentId).default(0))
                    .col(string(Menu::ParentPath).default(""))
                    .col(string(Menu::Status).default("enabled"))
                    .col(timestamp(Menu::Created))
                    .col(timestamp(Menu::Updated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-menu-code-parent-unique")
                    .table(Menu::Table)
                    .col(Menu::Code)
                    .col(Menu::ParentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-menu-parent-path")
                    .table(Menu::Table)
                    .col(Menu::ParentPath)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Resource::Table)
                    .if_not_exists()
                    .col(pk_auto(Resource::Id))
                    .col(integer(Resource::MenuId))
                    .col(string(Resource::Method))
                    .col(string(Resource::Path))
                    .col(timestamp(Resource::Created))
                    .col(timestamp(Resource::Updated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-resource-menu")
                            .from(Resource::Table, Resource::MenuId)
                            .to(Menu::Table, Menu::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRole::Table)
                    .if_not_exists()
                    .col(pk_auto(UserRole::Id))
                    .col(integer(UserRole::UserId))
                    .col(integer(UserRole::RoleId))
                    .col(timestamp(UserRole::Created))
                    .col(timestamp(UserRole::Updated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user-role-user")
                            .from(UserRole::Table, UserRole::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user-role-role")
                            .from(UserRole::Table, UserRole::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user-role-unique")
                    .table(UserRole::Table)
                    .col(UserRole::UserId)
                    .col(UserRole::RoleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoleMenu::Table)
                    .if_not_exists()
                    .col(pk_auto(RoleMenu::Id))
                    .col(integer(RoleMenu::RoleId))
                    .col(integer(RoleMenu::MenuId))
                    .col(timestamp(RoleMenu::Created))
                    .col(timestamp(RoleMenu::Updated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-role-menu-role")
                            .from(RoleMenu::Table, RoleMenu::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-role-menu-menu")
                            .from(RoleMenu::Table, RoleMenu::MenuId)
                            .to(Menu::Table, Menu::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-role-menu-unique")
                    .table(RoleMenu::Table)
                    .col(RoleMenu::RoleId)
                    .col(RoleMenu::MenuId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(RoleMenu::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(UserRole::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Resource::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Menu::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AppUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
    Username,
    Password,
    Name,
    Email,
    Phone,
    Remark,
    Status,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum Role {
    Table,
    Id,
    Code,
    Name,
    Description,
    Sequence,
    Status,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum Menu {
    Table,
    Id,
    Code,
    Name,
    Description,
    Sequence,
    Type,
    Path,
    Property,
    ParentId,
    ParentPath,
    Status,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum Resource {
    Table,
    Id,
    MenuId,
    Method,
    Path,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum UserRole {
    Table,
    Id,
    UserId,
    RoleId,
    Created,
    Updated,
}

#[derive(DeriveIden)]
enum RoleMenu {
    Table,
    Id,
    RoleId,
    MenuId,
    Created,
    Updated,
}
