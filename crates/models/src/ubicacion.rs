use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ubicacion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_ubicacion: i32,
    pub direccion: String,
    pub departamento: Option<i32>,
    pub latitud: f64,
    pub longitud: f64,
    pub codigo_comuna: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(direccion: &str, latitud: f64, longitud: f64) -> Result<(), ModelError> {
    if direccion.trim().is_empty() || direccion.len() > 200 {
        return Err(ModelError::Validation("La dirección es obligatoria (máximo 200 caracteres)".into()));
    }
    if !(-90.0..=90.0).contains(&latitud) || !(-180.0..=180.0).contains(&longitud) {
        return Err(ModelError::Validation("Coordenadas fuera de rango".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    direccion: &str,
    departamento: Option<i32>,
    latitud: f64,
    longitud: f64,
    codigo_comuna: i32,
) -> Result<Model, ModelError> {
    validate(direccion, latitud, longitud)?;
    let am = ActiveModel {
        direccion: Set(direccion.to_string()),
        departamento: Set(departamento),
        latitud: Set(latitud),
        longitud: Set(longitud),
        codigo_comuna: Set(codigo_comuna),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
