use async_trait::async_trait;

use super::domain::{AgeGroup, PetRecord, PetSummary, PetView, StoredPet};
use crate::errors::ServiceError;
use crate::image::domain::ImageRef;

#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Age group whose `[edad_inferior, edad_superior)` range holds `edad`.
    async fn age_group_for(&self, edad: f64) -> Result<Option<AgeGroup>, ServiceError>;
    /// Guardian profile code of a user.
    async fn tutor_for_user(&self, codigo_usuario: i32) -> Result<Option<i32>, ServiceError>;
    async fn exists_duplicate(&self, record: &PetRecord, exclude: Option<i32>) -> Result<bool, ServiceError>;
    /// Insert an active pet; `None` when no row was written.
    async fn insert(&self, record: &PetRecord, imagen: Option<&ImageRef>) -> Result<Option<i32>, ServiceError>;
    async fn find(&self, codigo_mascota: i32) -> Result<Option<StoredPet>, ServiceError>;
    async fn update(&self, codigo_mascota: i32, record: &PetRecord) -> Result<bool, ServiceError>;
    async fn view(&self, codigo_mascota: i32) -> Result<Option<PetView>, ServiceError>;
    async fn list_by_tutor(&self, codigo_tutor: i32) -> Result<Vec<PetSummary>, ServiceError>;
}

/// In-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use crate::pet::domain::Descripcion;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    pub struct MockPetRepository {
        groups: Vec<AgeGroup>,
        tutors: Mutex<HashMap<i32, i32>>,
        pets: Mutex<BTreeMap<i32, (PetRecord, Option<ImageRef>)>>,
        reject_writes: bool,
    }

    impl Default for MockPetRepository {
        fn default() -> Self {
            let groups = [("Cachorro", 0.0, 1.0), ("Joven", 1.0, 3.0), ("Adulto", 3.0, 8.0), ("Senior", 8.0, 31.0)]
                .into_iter()
                .enumerate()
                .map(|(i, (descripcion, edad_inferior, edad_superior))| AgeGroup {
                    codigo_etario: i as i32 + 1,
                    descripcion: descripcion.to_string(),
                    edad_inferior,
                    edad_superior,
                })
                .collect();
            Self { groups, tutors: Mutex::default(), pets: Mutex::default(), reject_writes: false }
        }
    }

    impl MockPetRepository {
        pub fn with_groups(groups: Vec<AgeGroup>) -> Self {
            Self { groups, ..Default::default() }
        }

        /// Repository whose writes touch no rows.
        pub fn rejecting_writes() -> Self {
            Self { reject_writes: true, ..Default::default() }
        }

        pub fn add_tutor(&self, codigo_usuario: i32, codigo_tutor: i32) {
            self.tutors.lock().unwrap().insert(codigo_usuario, codigo_tutor);
        }

        pub fn record(&self, codigo_mascota: i32) -> Option<PetRecord> {
            self.pets.lock().unwrap().get(&codigo_mascota).map(|(r, _)| r.clone())
        }

        pub fn count(&self) -> usize {
            self.pets.lock().unwrap().len()
        }

        fn catalog(kind: &str, codigo: i32) -> String {
            format!("{kind} {codigo}")
        }
    }

    #[async_trait]
    impl PetRepository for MockPetRepository {
        async fn age_group_for(&self, edad: f64) -> Result<Option<AgeGroup>, ServiceError> {
            Ok(self
                .groups
                .iter()
                .filter(|g| g.edad_inferior <= edad && edad < g.edad_superior)
                .min_by(|a, b| a.edad_inferior.total_cmp(&b.edad_inferior))
                .cloned())
        }

        async fn tutor_for_user(&self, codigo_usuario: i32) -> Result<Option<i32>, ServiceError> {
            Ok(self.tutors.lock().unwrap().get(&codigo_usuario).copied())
        }

        async fn exists_duplicate(&self, record: &PetRecord, exclude: Option<i32>) -> Result<bool, ServiceError> {
            let pets = self.pets.lock().unwrap();
            Ok(pets
                .iter()
                .any(|(codigo, (stored, _))| Some(*codigo) != exclude && stored.same_identity(record)))
        }

        async fn insert(&self, record: &PetRecord, imagen: Option<&ImageRef>) -> Result<Option<i32>, ServiceError> {
            if self.reject_writes {
                return Ok(None);
            }
            let mut pets = self.pets.lock().unwrap();
            let codigo = pets.keys().next_back().copied().unwrap_or(0) + 1;
            pets.insert(codigo, (record.clone(), imagen.cloned()));
            Ok(Some(codigo))
        }

        async fn find(&self, codigo_mascota: i32) -> Result<Option<StoredPet>, ServiceError> {
            Ok(self
                .record(codigo_mascota)
                .map(|record| StoredPet { codigo_mascota, record }))
        }

        async fn update(&self, codigo_mascota: i32, record: &PetRecord) -> Result<bool, ServiceError> {
            if self.reject_writes {
                return Ok(false);
            }
            let mut pets = self.pets.lock().unwrap();
            match pets.get_mut(&codigo_mascota) {
                Some((stored, _)) => {
                    *stored = record.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn view(&self, codigo_mascota: i32) -> Result<Option<PetView>, ServiceError> {
            let pets = self.pets.lock().unwrap();
            let Some((r, imagen)) = pets.get(&codigo_mascota) else {
                return Ok(None);
            };
            let grupo = self
                .groups
                .iter()
                .find(|g| g.codigo_etario == r.codigo_etario)
                .map(|g| g.descripcion.clone())
                .unwrap_or_default();
            Ok(Some(PetView {
                codigo_tutor: r.codigo_tutor,
                nombre: r.nombre.clone(),
                descripcion: r.descripcion.clone(),
                esterilizado: r.esterilizado,
                fecha_nacimiento: r.fecha_nacimiento,
                edad_registro: r.edad_registro,
                grupo_etario: grupo,
                raza: Self::catalog("Raza", r.codigo_raza),
                tamanio: Self::catalog("Tamaño", r.codigo_tamanio),
                sexo: Self::catalog("Sexo", r.codigo_sexo),
                imagen: imagen.clone(),
            }))
        }

        async fn list_by_tutor(&self, codigo_tutor: i32) -> Result<Vec<PetSummary>, ServiceError> {
            let pets = self.pets.lock().unwrap();
            Ok(pets
                .iter()
                .filter(|(_, (r, _))| r.codigo_tutor == codigo_tutor)
                .map(|(codigo, (r, imagen))| PetSummary {
                    codigo_mascota: *codigo,
                    nombre: r.nombre.clone(),
                    raza: Descripcion::new(Self::catalog("Raza", r.codigo_raza)),
                    imagen: imagen.clone(),
                    edad_registro: r.edad_registro,
                    estado_mascota: Descripcion::new("Activo"),
                })
                .collect())
        }
    }
}
