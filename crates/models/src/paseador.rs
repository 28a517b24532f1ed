use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{ubicacion, usuario};

/// Walker profile; one-to-one extension of `usuario` for role 2.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paseador")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_paseador: i32,
    pub rut: String,
    pub dv: String,
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
    pub descripcion: Option<String>,
    pub activado: bool,
    #[sea_orm(unique)]
    pub codigo_usuario: i32,
    pub codigo_ubicacion: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Usuario,
    Ubicacion,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Usuario => Entity::belongs_to(usuario::Entity)
                .from(Column::CodigoUsuario)
                .to(usuario::Column::CodigoUsuario)
                .into(),
            Relation::Ubicacion => Entity::belongs_to(ubicacion::Entity)
                .from(Column::CodigoUbicacion)
                .to(ubicacion::Column::CodigoUbicacion)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Personal data shared by walker and guardian profiles.
#[derive(Debug, Clone)]
pub struct PersonData<'a> {
    pub rut: &'a str,
    pub dv: &'a str,
    pub nombre: &'a str,
    pub apellido: &'a str,
    pub telefono: &'a str,
}

pub fn validate_person(p: &PersonData<'_>) -> Result<(), ModelError> {
    fn bounded(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
        let len = value.trim().chars().count();
        if len == 0 || len > max {
            return Err(ModelError::Validation(format!("El campo {field} es obligatorio (máximo {max} caracteres)")));
        }
        Ok(())
    }
    bounded("rut", p.rut, 11)?;
    bounded("dv", p.dv, 1)?;
    bounded("nombre", p.nombre, 20)?;
    bounded("apellido", p.apellido, 20)?;
    bounded("telefono", p.telefono, 11)?;
    if !p.rut.trim().chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::Validation("El rut debe contener solo dígitos".into()));
    }
    let dv = p.dv.trim();
    if !dv.chars().all(|c| c.is_ascii_digit() || c == 'k' || c == 'K') {
        return Err(ModelError::Validation("El dígito verificador no es válido".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    codigo_usuario: i32,
    person: &PersonData<'_>,
    descripcion: Option<&str>,
    codigo_ubicacion: Option<i32>,
) -> Result<Model, ModelError> {
    validate_person(person)?;
    if descripcion.map(|d| d.chars().count() > 500).unwrap_or(false) {
        return Err(ModelError::Validation("La descripción no puede superar 500 caracteres".into()));
    }
    let am = ActiveModel {
        rut: Set(person.rut.trim().to_string()),
        dv: Set(person.dv.trim().to_uppercase()),
        nombre: Set(person.nombre.trim().to_string()),
        apellido: Set(person.apellido.trim().to_string()),
        telefono: Set(person.telefono.trim().to_string()),
        descripcion: Set(descripcion.map(str::to_string)),
        // New walkers wait for an administrator to enable them.
        activado: Set(false),
        codigo_usuario: Set(codigo_usuario),
        codigo_ubicacion: Set(codigo_ubicacion),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
