use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{imagen, rol};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "usuario")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_usuario: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub password_algorithm: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub codigo_rol: i32,
    pub codigo_imagen: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Rol,
    Imagen,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Rol => Entity::belongs_to(rol::Entity)
                .from(Column::CodigoRol)
                .to(rol::Column::CodigoRol)
                .into(),
            Relation::Imagen => Entity::belongs_to(imagen::Entity)
                .from(Column::CodigoImagen)
                .to(imagen::Column::CodigoImagen)
                .into(),
        }
    }
}

impl Related<rol::Entity> for Entity {
    fn to() -> RelationDef { Relation::Rol.def() }
}

impl Related<imagen::Entity> for Entity {
    fn to() -> RelationDef { Relation::Imagen.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    let valid = email.len() <= 200
        && email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.ends_with('.'))
            .unwrap_or(false);
    if !valid {
        return Err(ModelError::Validation("El email ingresado no es válido".into()));
    }
    Ok(())
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email.trim())).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password_hash: String,
    password_algorithm: &str,
    codigo_rol: i32,
) -> Result<Model, ModelError> {
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        email: Set(email.trim().to_string()),
        password: Set(password_hash),
        password_algorithm: Set(password_algorithm.to_string()),
        token: Set(None),
        codigo_rol: Set(codigo_rol),
        codigo_imagen: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Store the last issued session token. Returns the number of rows touched.
pub async fn set_token<C: ConnectionTrait>(db: &C, codigo_usuario: i32, token: &str) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Token, Expr::value(token.to_string()))
        .filter(Column::CodigoUsuario.eq(codigo_usuario))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn set_password<C: ConnectionTrait>(
    db: &C,
    codigo_usuario: i32,
    password_hash: String,
    password_algorithm: &str,
) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Password, Expr::value(password_hash))
        .col_expr(Column::PasswordAlgorithm, Expr::value(password_algorithm.to_string()))
        .filter(Column::CodigoUsuario.eq(codigo_usuario))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn set_imagen<C: ConnectionTrait>(db: &C, codigo_usuario: i32, codigo_imagen: i32) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::CodigoImagen, Expr::value(codigo_imagen))
        .filter(Column::CodigoUsuario.eq(codigo_usuario))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
