use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const ADMINISTRADOR: i32 = 1;
pub const PASEADOR: i32 = 2;
pub const TUTOR: i32 = 3;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rol")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_rol: i32,
    pub descripcion: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
