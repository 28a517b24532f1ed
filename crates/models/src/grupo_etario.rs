use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Age bucket covering `[edad_inferior, edad_superior)` years.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grupo_etario")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_etario: i32,
    pub descripcion: String,
    pub edad_inferior: f64,
    pub edad_superior: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn contains(&self, edad: f64) -> bool {
        self.edad_inferior <= edad && edad < self.edad_superior
    }
}

/// First bucket (lowest lower bound) containing `edad`.
pub async fn find_for_age<C: ConnectionTrait>(db: &C, edad: f64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::EdadInferior.lte(edad))
        .filter(Column::EdadSuperior.gt(edad))
        .order_by_asc(Column::EdadInferior)
        .one(db)
        .await?)
}
