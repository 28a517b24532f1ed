use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use models::catalog::{estado_mascota, raza, sexo, tamanio};
use models::{grupo_etario, imagen, mascota};

use crate::errors::ServiceError;
use crate::image::domain::ImageRef;
use crate::pet::domain::{AgeGroup, Descripcion, PetRecord, PetSummary, PetView, StoredPet};
use crate::pet::repository::PetRepository;

pub struct SeaOrmPetRepository {
    pub db: DatabaseConnection,
}

fn record_from(m: &mascota::Model) -> PetRecord {
    PetRecord {
        nombre: m.nombre.clone(),
        descripcion: m.descripcion.clone(),
        esterilizado: m.esterilizado,
        fecha_nacimiento: m.fecha_nacimiento,
        edad_registro: m.edad_registro,
        codigo_tutor: m.codigo_tutor,
        codigo_raza: m.codigo_raza,
        codigo_tamanio: m.codigo_tamanio,
        codigo_sexo: m.codigo_sexo,
        codigo_etario: m.codigo_etario,
    }
}

impl SeaOrmPetRepository {
    async fn image(&self, codigo_imagen: Option<i32>) -> Result<Option<ImageRef>, ServiceError> {
        let Some(codigo) = codigo_imagen else {
            return Ok(None);
        };
        Ok(imagen::Entity::find_by_id(codigo).one(&self.db).await?.map(ImageRef::from))
    }
}

#[async_trait]
impl PetRepository for SeaOrmPetRepository {
    async fn age_group_for(&self, edad: f64) -> Result<Option<AgeGroup>, ServiceError> {
        Ok(grupo_etario::find_for_age(&self.db, edad).await?.map(AgeGroup::from))
    }

    async fn tutor_for_user(&self, codigo_usuario: i32) -> Result<Option<i32>, ServiceError> {
        Ok(models::tutor::find_by_usuario(&self.db, codigo_usuario)
            .await?
            .map(|t| t.codigo_tutor))
    }

    async fn exists_duplicate(&self, record: &PetRecord, exclude: Option<i32>) -> Result<bool, ServiceError> {
        Ok(mascota::exists_duplicate(&self.db, &record.identity(), exclude).await?)
    }

    async fn insert(&self, record: &PetRecord, img: Option<&ImageRef>) -> Result<Option<i32>, ServiceError> {
        mascota::validate_texts(&record.nombre, record.descripcion.as_deref())?;
        let txn = self.db.begin().await?;
        let codigo_imagen = match img {
            Some(img) => Some(imagen::create(&txn, &img.url, &img.path, &img.public_id).await?.codigo_imagen),
            None => None,
        };
        let am = mascota::ActiveModel {
            nombre: Set(record.nombre.trim().to_string()),
            descripcion: Set(record.descripcion.clone()),
            esterilizado: Set(record.esterilizado),
            fecha_nacimiento: Set(record.fecha_nacimiento),
            edad_registro: Set(record.edad_registro),
            codigo_tutor: Set(record.codigo_tutor),
            codigo_raza: Set(record.codigo_raza),
            codigo_tamanio: Set(record.codigo_tamanio),
            codigo_sexo: Set(record.codigo_sexo),
            codigo_etario: Set(record.codigo_etario),
            codigo_estado_mascota: Set(estado_mascota::ACTIVO),
            codigo_imagen: Set(codigo_imagen),
            ..Default::default()
        };
        let created = am.insert(&txn).await?;
        txn.commit().await?;
        Ok(Some(created.codigo_mascota))
    }

    async fn find(&self, codigo_mascota: i32) -> Result<Option<StoredPet>, ServiceError> {
        Ok(mascota::Entity::find_by_id(codigo_mascota)
            .one(&self.db)
            .await?
            .map(|m| StoredPet { codigo_mascota: m.codigo_mascota, record: record_from(&m) }))
    }

    async fn update(&self, codigo_mascota: i32, record: &PetRecord) -> Result<bool, ServiceError> {
        mascota::validate_texts(&record.nombre, record.descripcion.as_deref())?;
        let res = mascota::Entity::update_many()
            .col_expr(mascota::Column::Nombre, Expr::value(record.nombre.trim().to_string()))
            .col_expr(mascota::Column::Descripcion, Expr::value(record.descripcion.clone()))
            .col_expr(mascota::Column::Esterilizado, Expr::value(record.esterilizado))
            .col_expr(mascota::Column::FechaNacimiento, Expr::value(record.fecha_nacimiento))
            .col_expr(mascota::Column::EdadRegistro, Expr::value(record.edad_registro))
            .col_expr(mascota::Column::CodigoRaza, Expr::value(record.codigo_raza))
            .col_expr(mascota::Column::CodigoTamanio, Expr::value(record.codigo_tamanio))
            .col_expr(mascota::Column::CodigoSexo, Expr::value(record.codigo_sexo))
            .col_expr(mascota::Column::CodigoEtario, Expr::value(record.codigo_etario))
            .filter(mascota::Column::CodigoMascota.eq(codigo_mascota))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn view(&self, codigo_mascota: i32) -> Result<Option<PetView>, ServiceError> {
        let Some(m) = mascota::Entity::find_by_id(codigo_mascota).one(&self.db).await? else {
            return Ok(None);
        };
        let grupo = grupo_etario::Entity::find_by_id(m.codigo_etario).one(&self.db).await?;
        let raza = raza::Entity::find_by_id(m.codigo_raza).one(&self.db).await?;
        let tamanio = tamanio::Entity::find_by_id(m.codigo_tamanio).one(&self.db).await?;
        let sexo = sexo::Entity::find_by_id(m.codigo_sexo).one(&self.db).await?;
        let imagen = self.image(m.codigo_imagen).await?;
        Ok(Some(PetView {
            codigo_tutor: m.codigo_tutor,
            nombre: m.nombre,
            descripcion: m.descripcion,
            esterilizado: m.esterilizado,
            fecha_nacimiento: m.fecha_nacimiento,
            edad_registro: m.edad_registro,
            grupo_etario: grupo.map(|g| g.descripcion).unwrap_or_default(),
            raza: raza.map(|r| r.descripcion).unwrap_or_default(),
            tamanio: tamanio.map(|t| t.descripcion).unwrap_or_default(),
            sexo: sexo.map(|s| s.descripcion).unwrap_or_default(),
            imagen,
        }))
    }

    async fn list_by_tutor(&self, codigo_tutor: i32) -> Result<Vec<PetSummary>, ServiceError> {
        let rows = mascota::Entity::find()
            .filter(mascota::Column::CodigoTutor.eq(codigo_tutor))
            .order_by_asc(mascota::Column::CodigoMascota)
            .find_also_related(raza::Entity)
            .all(&self.db)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let estados: HashMap<i32, String> = estado_mascota::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| (e.codigo_estado_mascota, e.descripcion))
            .collect();
        let image_ids: Vec<i32> = rows.iter().filter_map(|(m, _)| m.codigo_imagen).collect();
        let images: HashMap<i32, ImageRef> = if image_ids.is_empty() {
            HashMap::new()
        } else {
            imagen::Entity::find()
                .filter(imagen::Column::CodigoImagen.is_in(image_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|i| (i.codigo_imagen, ImageRef::from(i)))
                .collect()
        };
        Ok(rows
            .into_iter()
            .map(|(m, raza)| PetSummary {
                codigo_mascota: m.codigo_mascota,
                raza: Descripcion::new(raza.map(|r| r.descripcion).unwrap_or_default()),
                imagen: m.codigo_imagen.and_then(|c| images.get(&c).cloned()),
                edad_registro: m.edad_registro,
                estado_mascota: Descripcion::new(estados.get(&m.codigo_estado_mascota).cloned().unwrap_or_default()),
                nombre: m.nombre,
            })
            .collect())
    }
}
