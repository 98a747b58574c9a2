use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub floor_plan_id: i32,
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub room_type: String,
    pub capacity: i32,
    pub equipment: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::floor_plan::Entity",
        from = "Column::FloorPlanId",
        to = "super::floor_plan::Column::Id",
        on_delete = "Cascade"
    )]
    FloorPlan,
    #[sea_orm(has_many = "super::seat::Entity")]
    Seats,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::floor_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FloorPlan.def()
    }
}

impl Related<super::seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seats.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
