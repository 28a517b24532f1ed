use sea_orm::{entity::prelude::*, Condition, ConnectionTrait, PaginatorTrait};
use serde::{Deserialize, Serialize};

use crate::catalog::{estado_mascota, raza, sexo, tamanio};
use crate::errors::ModelError;
use crate::{grupo_etario, imagen, tutor};

/// Pet record. `fecha_nacimiento` holds the birth date, or the adoption date
/// when the age was supplied by hand (`edad_registro` is then set).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mascota")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_mascota: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub esterilizado: bool,
    pub fecha_nacimiento: Date,
    pub edad_registro: Option<f64>,
    pub codigo_tutor: i32,
    pub codigo_raza: i32,
    pub codigo_tamanio: i32,
    pub codigo_sexo: i32,
    pub codigo_etario: i32,
    pub codigo_estado_mascota: i32,
    pub codigo_imagen: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Tutor,
    Raza,
    Tamanio,
    Sexo,
    GrupoEtario,
    EstadoMascota,
    Imagen,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Tutor => Entity::belongs_to(tutor::Entity)
                .from(Column::CodigoTutor)
                .to(tutor::Column::CodigoTutor)
                .into(),
            Relation::Raza => Entity::belongs_to(raza::Entity)
                .from(Column::CodigoRaza)
                .to(raza::Column::CodigoRaza)
                .into(),
            Relation::Tamanio => Entity::belongs_to(tamanio::Entity)
                .from(Column::CodigoTamanio)
                .to(tamanio::Column::CodigoTamanio)
                .into(),
            Relation::Sexo => Entity::belongs_to(sexo::Entity)
                .from(Column::CodigoSexo)
                .to(sexo::Column::CodigoSexo)
                .into(),
            Relation::GrupoEtario => Entity::belongs_to(grupo_etario::Entity)
                .from(Column::CodigoEtario)
                .to(grupo_etario::Column::CodigoEtario)
                .into(),
            Relation::EstadoMascota => Entity::belongs_to(estado_mascota::Entity)
                .from(Column::CodigoEstadoMascota)
                .to(estado_mascota::Column::CodigoEstadoMascota)
                .into(),
            Relation::Imagen => Entity::belongs_to(imagen::Entity)
                .from(Column::CodigoImagen)
                .to(imagen::Column::CodigoImagen)
                .into(),
        }
    }
}

impl Related<raza::Entity> for Entity {
    fn to() -> RelationDef { Relation::Raza.def() }
}

impl Related<imagen::Entity> for Entity {
    fn to() -> RelationDef { Relation::Imagen.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Attributes that make two pets "the same pet" for duplicate detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity<'a> {
    pub nombre: &'a str,
    pub esterilizado: bool,
    pub fecha_nacimiento: Date,
    pub edad_registro: Option<f64>,
    pub codigo_tutor: i32,
    pub codigo_raza: i32,
    pub codigo_tamanio: i32,
    pub codigo_sexo: i32,
    pub codigo_etario: i32,
}

pub fn duplicate_condition(id: &Identity<'_>, exclude: Option<i32>) -> Condition {
    let edad = match id.edad_registro {
        Some(edad) => Column::EdadRegistro.eq(edad),
        None => Column::EdadRegistro.is_null(),
    };
    let mut cond = Condition::all()
        .add(Column::CodigoTutor.eq(id.codigo_tutor))
        .add(Column::Nombre.eq(id.nombre))
        .add(Column::Esterilizado.eq(id.esterilizado))
        .add(Column::FechaNacimiento.eq(id.fecha_nacimiento))
        .add(edad)
        .add(Column::CodigoRaza.eq(id.codigo_raza))
        .add(Column::CodigoTamanio.eq(id.codigo_tamanio))
        .add(Column::CodigoSexo.eq(id.codigo_sexo))
        .add(Column::CodigoEtario.eq(id.codigo_etario));
    if let Some(codigo) = exclude {
        cond = cond.add(Column::CodigoMascota.ne(codigo));
    }
    cond
}

pub async fn exists_duplicate<C: ConnectionTrait>(
    db: &C,
    id: &Identity<'_>,
    exclude: Option<i32>,
) -> Result<bool, ModelError> {
    let count = Entity::find().filter(duplicate_condition(id, exclude)).count(db).await?;
    Ok(count > 0)
}

pub fn validate_texts(nombre: &str, descripcion: Option<&str>) -> Result<(), ModelError> {
    let len = nombre.trim().chars().count();
    if len == 0 || len > 30 {
        return Err(ModelError::Validation("El nombre de la mascota es obligatorio (máximo 30 caracteres)".into()));
    }
    if descripcion.map(|d| d.chars().count() > 500).unwrap_or(false) {
        return Err(ModelError::Validation("La descripción no puede superar 500 caracteres".into()));
    }
    Ok(())
}
