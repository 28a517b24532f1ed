use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::usuario;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "administrador")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_administrador: i32,
    pub nombre: String,
    pub apellido: String,
    #[sea_orm(unique)]
    pub codigo_usuario: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Usuario }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Usuario => Entity::belongs_to(usuario::Entity)
                .from(Column::CodigoUsuario)
                .to(usuario::Column::CodigoUsuario)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
