use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::paseador::{validate_person, PersonData};
use crate::{ubicacion, usuario};

/// Guardian profile; one-to-one extension of `usuario` for role 3.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tutor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_tutor: i32,
    pub rut: String,
    pub dv: String,
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
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

pub async fn find_by_usuario<C: ConnectionTrait>(db: &C, codigo_usuario: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::CodigoUsuario.eq(codigo_usuario)).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    codigo_usuario: i32,
    person: &PersonData<'_>,
    codigo_ubicacion: Option<i32>,
) -> Result<Model, ModelError> {
    validate_person(person)?;
    let am = ActiveModel {
        rut: Set(person.rut.trim().to_string()),
        dv: Set(person.dv.trim().to_uppercase()),
        nombre: Set(person.nombre.trim().to_string()),
        apellido: Set(person.apellido.trim().to_string()),
        telefono: Set(person.telefono.trim().to_string()),
        codigo_usuario: Set(codigo_usuario),
        codigo_ubicacion: Set(codigo_ubicacion),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
