use async_trait::async_trait;
use sea_orm::{sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};

use crate::errors::ServiceError;
use crate::image::domain::{CurrentImage, ImageOwner, ImageRef, StoredImage};
use crate::image::repository::ImageRepository;

pub struct SeaOrmImageRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmImageRepository {
    async fn owner_image_code(&self, owner: ImageOwner) -> Result<Option<Option<i32>>, ServiceError> {
        Ok(match owner {
            ImageOwner::User(codigo) => models::usuario::Entity::find_by_id(codigo)
                .one(&self.db)
                .await?
                .map(|u| u.codigo_imagen),
            ImageOwner::Pet(codigo) => models::mascota::Entity::find_by_id(codigo)
                .one(&self.db)
                .await?
                .map(|m| m.codigo_imagen),
        })
    }
}

#[async_trait]
impl ImageRepository for SeaOrmImageRepository {
    async fn current(&self, owner: ImageOwner) -> Result<CurrentImage, ServiceError> {
        let Some(slot) = self.owner_image_code(owner).await? else {
            return Ok(CurrentImage::OwnerMissing);
        };
        let Some(codigo_imagen) = slot else {
            return Ok(CurrentImage::NoImage);
        };
        Ok(match models::imagen::Entity::find_by_id(codigo_imagen).one(&self.db).await? {
            Some(row) => CurrentImage::Image(StoredImage { codigo_imagen, image: row.into() }),
            None => CurrentImage::NoImage,
        })
    }

    async fn attach(&self, owner: ImageOwner, current: Option<&StoredImage>, image: &ImageRef) -> Result<bool, ServiceError> {
        if let Some(stored) = current {
            let touched =
                models::imagen::update_reference(&self.db, stored.codigo_imagen, &image.url, &image.path, &image.public_id).await?;
            return Ok(touched > 0);
        }

        let txn = self.db.begin().await?;
        let row = models::imagen::create(&txn, &image.url, &image.path, &image.public_id).await?;
        let touched = match owner {
            ImageOwner::User(codigo) => models::usuario::set_imagen(&txn, codigo, row.codigo_imagen).await?,
            ImageOwner::Pet(codigo) => {
                models::mascota::Entity::update_many()
                    .col_expr(models::mascota::Column::CodigoImagen, Expr::value(row.codigo_imagen))
                    .filter(models::mascota::Column::CodigoMascota.eq(codigo))
                    .exec(&txn)
                    .await?
                    .rows_affected
            }
        };
        if touched == 0 {
            txn.rollback().await?;
            return Ok(false);
        }
        txn.commit().await?;
        Ok(true)
    }
}
