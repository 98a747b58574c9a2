use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "buildings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::floor_plan::Entity")]
    FloorPlans,
}

impl Related<super::floor_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FloorPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
