use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use super::age;
use super::domain::{Descripcion, PetDetail, PetInput, PetRecord, PetSummary};
use super::repository::PetRepository;
use super::rules::{self, Assessment};
use crate::errors::ServiceError;
use crate::image::domain::{ImageOwner, ImageRef};
use crate::image::ImageService;

pub const MSG_GROUP_NOT_FOUND: &str = "No se pudo obtener el grupo etario de la mascota";
pub const MSG_TUTOR_NOT_FOUND: &str = "No se pudo encontrar el tutor de la mascota";
pub const MSG_REGISTERED_DUPLICATE: &str = "La mascota registrada ya existe";
pub const MSG_EDITED_DUPLICATE: &str = "La mascota editada ya existe";
pub const MSG_PET_NOT_FOUND: &str = "No se pudo encontrar a la mascota";
pub const MSG_PET_UNAVAILABLE: &str = "No se pudo obtener a la mascota";
pub const MSG_NO_PETS: &str = "No existen mascotas";

fn record_outcome(operation: &str, result: &Result<impl Sized, ServiceError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    common::metrics::PET_WRITES_TOTAL.with_label_values(&[operation, outcome]).inc();
}

/// Pet registration, lookup and edit for the guardian behind a user account.
pub struct PetService {
    repo: Arc<dyn PetRepository>,
    images: Arc<ImageService>,
}

impl PetService {
    pub fn new(repo: Arc<dyn PetRepository>, images: Arc<ImageService>) -> Self {
        Self { repo, images }
    }

    /// Register a pet for the caller's guardian profile. Any failure releases
    /// the image the client already uploaded.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::{Duration, Local};
    /// use service::image::{ImageService, host::NoopImageHost, repository::mock::MockImageRepository};
    /// use service::pet::{PetService, domain::PetInput, repository::mock::MockPetRepository};
    /// let repo = Arc::new(MockPetRepository::default());
    /// repo.add_tutor(10, 1);
    /// let images = Arc::new(ImageService::new(Arc::new(MockImageRepository::default()), Arc::new(NoopImageHost), None));
    /// let svc = PetService::new(repo.clone(), images);
    /// let input = PetInput {
    ///     nombre: "Cachupin".into(), descripcion: None, esterilizado: false,
    ///     fecha_nacimiento: Local::now().date_naive() - Duration::days(800),
    ///     edad_registro: None, is_fecha_nacimiento: true, is_year: true,
    ///     codigo_raza: 1, codigo_tamanio: 1, codigo_sexo: 1, imagen: None,
    /// };
    /// let codigo = tokio_test::block_on(svc.register(10, input)).unwrap();
    /// assert_eq!(repo.record(codigo).unwrap().codigo_etario, 2);
    /// ```
    #[instrument(skip(self, input), fields(nombre = %input.nombre))]
    pub async fn register(&self, codigo_usuario: i32, input: PetInput) -> Result<i32, ServiceError> {
        let result = self.try_register(codigo_usuario, &input, age::today()).await;
        record_outcome("register", &result);
        match &result {
            Ok(codigo_mascota) => info!(codigo_mascota, "pet_registered"),
            Err(e) => {
                warn!(error = %e, "pet_registration_rejected");
                if let Some(img) = &input.imagen {
                    self.images.release(img).await;
                }
            }
        }
        result
    }

    async fn try_register(&self, codigo_usuario: i32, input: &PetInput, today: NaiveDate) -> Result<i32, ServiceError> {
        let assessment = rules::assess(input, today)?;
        let record = self.build_record(codigo_usuario, input, &assessment).await?;
        if self.repo.exists_duplicate(&record, None).await? {
            return Err(ServiceError::Conflict(MSG_REGISTERED_DUPLICATE.into()));
        }
        self.repo
            .insert(&record, input.imagen.as_ref())
            .await?
            .ok_or_else(|| ServiceError::Persistence("No se pudo registrar la mascota".into()))
    }

    /// Resolve age group and guardian, in that order, into the row to persist.
    async fn build_record(&self, codigo_usuario: i32, input: &PetInput, assessment: &Assessment) -> Result<PetRecord, ServiceError> {
        let grupo = self
            .repo
            .age_group_for(assessment.bucket_age)
            .await?
            .ok_or_else(|| ServiceError::NotFound(MSG_GROUP_NOT_FOUND.into()))?;
        let codigo_tutor = self.tutor_of(codigo_usuario, MSG_TUTOR_NOT_FOUND).await?;
        Ok(PetRecord {
            nombre: input.nombre.trim().to_string(),
            descripcion: input.descripcion.clone(),
            esterilizado: input.esterilizado,
            fecha_nacimiento: input.fecha_nacimiento,
            edad_registro: assessment.edad_registro,
            codigo_tutor,
            codigo_raza: input.codigo_raza,
            codigo_tamanio: input.codigo_tamanio,
            codigo_sexo: input.codigo_sexo,
            codigo_etario: grupo.codigo_etario,
        })
    }

    async fn tutor_of(&self, codigo_usuario: i32, not_found: &str) -> Result<i32, ServiceError> {
        self.repo
            .tutor_for_user(codigo_usuario)
            .await?
            .ok_or_else(|| ServiceError::NotFound(not_found.into()))
    }

    /// Edit a pet owned by the caller's guardian profile. The image is not touched.
    #[instrument(skip(self, input))]
    pub async fn edit(&self, codigo_usuario: i32, codigo_mascota: i32, input: PetInput) -> Result<(), ServiceError> {
        let result = self.try_edit(codigo_usuario, codigo_mascota, &input, age::today()).await;
        record_outcome("edit", &result);
        match &result {
            Ok(()) => info!("pet_edited"),
            Err(e) => warn!(error = %e, "pet_edit_rejected"),
        }
        result
    }

    async fn try_edit(&self, codigo_usuario: i32, codigo_mascota: i32, input: &PetInput, today: NaiveDate) -> Result<(), ServiceError> {
        let assessment = rules::assess(input, today)?;
        let record = self.build_record(codigo_usuario, input, &assessment).await?;
        match self.repo.find(codigo_mascota).await? {
            Some(stored) if stored.record.codigo_tutor == record.codigo_tutor => {}
            _ => return Err(ServiceError::NotFound(MSG_PET_NOT_FOUND.into())),
        }
        if self.repo.exists_duplicate(&record, Some(codigo_mascota)).await? {
            return Err(ServiceError::Conflict(MSG_EDITED_DUPLICATE.into()));
        }
        if !self.repo.update(codigo_mascota, &record).await? {
            return Err(ServiceError::Persistence("No se pudo editar la mascota".into()));
        }
        Ok(())
    }

    /// Pet detail with its current age: derived from the birth date, or the
    /// stored age for adoption registrations.
    #[instrument(skip(self))]
    pub async fn get(&self, codigo_usuario: i32, codigo_mascota: i32) -> Result<PetDetail, ServiceError> {
        let codigo_tutor = self.tutor_of(codigo_usuario, "No se pudo encontrar al tutor").await?;
        let view = self
            .repo
            .view(codigo_mascota)
            .await?
            .filter(|v| v.codigo_tutor == codigo_tutor)
            .ok_or_else(|| ServiceError::NotFound(MSG_PET_UNAVAILABLE.into()))?;
        let edad = view
            .edad_registro
            .unwrap_or_else(|| age::years_since(view.fecha_nacimiento, age::today()));
        Ok(PetDetail {
            nombre: view.nombre,
            edad,
            grupo_etario: Descripcion::new(view.grupo_etario),
            raza: Descripcion::new(view.raza),
            tamanio: Descripcion::new(view.tamanio),
            sexo: Descripcion::new(view.sexo),
            esterilizado: view.esterilizado,
            descripcion: view.descripcion,
            imagen: view.imagen,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_mine(&self, codigo_usuario: i32) -> Result<Vec<PetSummary>, ServiceError> {
        let codigo_tutor = self.tutor_of(codigo_usuario, "No se pudo encontrar al tutor").await?;
        let pets = self.repo.list_by_tutor(codigo_tutor).await?;
        if pets.is_empty() {
            return Err(ServiceError::NotFound(MSG_NO_PETS.into()));
        }
        Ok(pets)
    }

    /// Replace the image of a pet owned by the caller.
    #[instrument(skip(self, image), fields(public_id = %image.public_id))]
    pub async fn change_image(&self, codigo_usuario: i32, codigo_mascota: i32, image: ImageRef) -> Result<(), ServiceError> {
        if let Err(e) = self.ensure_owned(codigo_usuario, codigo_mascota).await {
            self.images.release(&image).await;
            return Err(e);
        }
        self.images.replace(ImageOwner::Pet(codigo_mascota), image).await
    }

    async fn ensure_owned(&self, codigo_usuario: i32, codigo_mascota: i32) -> Result<(), ServiceError> {
        let codigo_tutor = self.tutor_of(codigo_usuario, MSG_TUTOR_NOT_FOUND).await?;
        match self.repo.find(codigo_mascota).await? {
            Some(stored) if stored.record.codigo_tutor == codigo_tutor => Ok(()),
            _ => Err(ServiceError::NotFound(MSG_PET_UNAVAILABLE.into())),
        }
    }
}
