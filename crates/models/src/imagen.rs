use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Descriptor of an externally hosted asset. The asset itself lives on the
/// image host; `public_id` is the handle used to delete it there.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "imagen")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub codigo_imagen: i32,
    pub url: String,
    pub path: String,
    pub public_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_reference(url: &str, path: &str, public_id: &str) -> Result<(), ModelError> {
    if url.trim().is_empty() || path.trim().is_empty() || public_id.trim().is_empty() {
        return Err(ModelError::Validation("La imagen requiere url, path y public_id".into()));
    }
    if url.len() > 500 || path.len() > 500 || public_id.len() > 200 {
        return Err(ModelError::Validation("Los datos de la imagen exceden el largo permitido".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, url: &str, path: &str, public_id: &str) -> Result<Model, ModelError> {
    validate_reference(url, path, public_id)?;
    let am = ActiveModel {
        url: Set(url.to_string()),
        path: Set(path.to_string()),
        public_id: Set(public_id.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Point an existing row at a new hosted asset. Returns the number of rows touched.
pub async fn update_reference<C: ConnectionTrait>(
    db: &C,
    codigo_imagen: i32,
    url: &str,
    path: &str,
    public_id: &str,
) -> Result<u64, ModelError> {
    validate_reference(url, path, public_id)?;
    let res = Entity::update_many()
        .col_expr(Column::Url, Expr::value(url.to_string()))
        .col_expr(Column::Path, Expr::value(path.to_string()))
        .col_expr(Column::PublicId, Expr::value(public_id.to_string()))
        .filter(Column::CodigoImagen.eq(codigo_imagen))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_public_id_is_rejected() {
        assert!(validate_reference("https://img/x.png", "x.png", " ").is_err());
        assert!(validate_reference("https://img/x.png", "x.png", "volta/x").is_ok());
    }
}
