// `MigrationTrait` declares `&SchemaManager` with a late-bound elided
// lifetime, so impls must elide it too (E0195), which conflicts with
// `deny(rust_2018_idioms)` from lib.rs.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_buildings_table::Migration),
            Box::new(m20240101_000002_create_floor_plans_table::Migration),
            Box::new(m20240101_000003_create_rooms_table::Migration),
            Box::new(m20240101_000004_create_seats_table::Migration),
            Box::new(m20240101_000005_create_users_table::Migration),
            Box::new(m20240101_000006_create_bookings_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_buildings_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_buildings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Buildings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Buildings::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Buildings::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Buildings::Address)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            // (name, address) pair is unique on top of the individual columns
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_buildings_name_address")
                        .table(Buildings::Table)
                        .col(Buildings::Name)
                        .col(Buildings::Address)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Buildings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Buildings {
        Table,
        Id,
        Name,
        Address,
    }
}

mod m20240101_000002_create_floor_plans_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_buildings_table::Buildings;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_floor_plans_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FloorPlans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FloorPlans::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(FloorPlans::BuildingId).integer().not_null())
                        .col(ColumnDef::new(FloorPlans::Name).string().not_null())
                        .col(
                            ColumnDef::new(FloorPlans::Level)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(FloorPlans::ImageFile).string().null())
                        .col(
                            ColumnDef::new(FloorPlans::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FloorPlans::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_floor_plans_building_id")
                                .from(FloorPlans::Table, FloorPlans::BuildingId)
                                .to(Buildings::Table, Buildings::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_floor_plans_building_id")
                        .table(FloorPlans::Table)
                        .col(FloorPlans::BuildingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FloorPlans::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum FloorPlans {
        Table,
        Id,
        BuildingId,
        Name,
        Level,
        ImageFile,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_rooms_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000002_create_floor_plans_table::FloorPlans;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_rooms_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Rooms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Rooms::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Rooms::FloorPlanId).integer().not_null())
                        .col(ColumnDef::new(Rooms::Name).string().not_null())
                        .col(ColumnDef::new(Rooms::Type).string().not_null())
                        .col(
                            ColumnDef::new(Rooms::Capacity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Rooms::Equipment).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_rooms_floor_plan_id")
                                .from(Rooms::Table, Rooms::FloorPlanId)
                                .to(FloorPlans::Table, FloorPlans::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_floor_plan_id")
                        .table(Rooms::Table)
                        .col(Rooms::FloorPlanId)
                        .to_owned(),
                )
                .await?;

            // Availability search filters on capacity
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_capacity")
                        .table(Rooms::Table)
                        .col(Rooms::Capacity)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Rooms::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Rooms {
        Table,
        Id,
        FloorPlanId,
        Name,
        Type,
        Capacity,
        Equipment,
    }
}

mod m20240101_000004_create_seats_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_rooms_table::Rooms;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_seats_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Seats::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Seats::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Seats::RoomId).integer().not_null())
                        .col(ColumnDef::new(Seats::Label).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_seats_room_id")
                                .from(Seats::Table, Seats::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_seats_room_id")
                        .table(Seats::Table)
                        .col(Seats::RoomId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Seats::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Seats {
        Table,
        Id,
        RoomId,
        Label,
    }
}

mod m20240101_000005_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string_len(150)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Role).string_len(150).not_null())
                        .col(ColumnDef::new(Users::Password).string_len(150).not_null())
                        .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Email,
        Role,
        Password,
        FirstName,
    }
}

mod m20240101_000006_create_bookings_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000003_create_rooms_table::Rooms;
    use super::m20240101_000005_create_users_table::Users;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_bookings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Bookings::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Bookings::RoomId).integer().not_null())
                        .col(ColumnDef::new(Bookings::UserId).integer().not_null())
                        .col(
                            ColumnDef::new(Bookings::PeopleCount)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Bookings::StartTime).timestamp().not_null())
                        .col(ColumnDef::new(Bookings::EndTime).timestamp().not_null())
                        .col(
                            ColumnDef::new(Bookings::Purpose)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Bookings::Status)
                                .string()
                                .not_null()
                                .default("open"),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_room_id")
                                .from(Bookings::Table, Bookings::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_bookings_user_id")
                                .from(Bookings::Table, Bookings::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Re-booking the same slot must hit this constraint, not create a duplicate
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_bookings_room_user_window")
                        .table(Bookings::Table)
                        .col(Bookings::RoomId)
                        .col(Bookings::UserId)
                        .col(Bookings::StartTime)
                        .col(Bookings::EndTime)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // Overlap queries filter on (room, status, window)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_room_id_status")
                        .table(Bookings::Table)
                        .col(Bookings::RoomId)
                        .col(Bookings::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_user_id")
                        .table(Bookings::Table)
                        .col(Bookings::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Bookings {
        Table,
        Id,
        RoomId,
        UserId,
        PeopleCount,
        StartTime,
        EndTime,
        Purpose,
        Status,
    }
}
