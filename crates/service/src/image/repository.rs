use async_trait::async_trait;

use super::domain::{CurrentImage, ImageOwner, ImageRef, StoredImage};
use crate::errors::ServiceError;

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn current(&self, owner: ImageOwner) -> Result<CurrentImage, ServiceError>;

    /// Make `image` the owner's current image, overwriting `current` in place
    /// when there is one. Returns `false` when nothing was written.
    async fn attach(&self, owner: ImageOwner, current: Option<&StoredImage>, image: &ImageRef) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockImageRepository {
        owners: Mutex<HashMap<ImageOwner, Option<i32>>>,
        images: Mutex<HashMap<i32, ImageRef>>,
        reject_writes: bool,
    }

    impl MockImageRepository {
        /// Repository whose writes touch no rows.
        pub fn rejecting_writes() -> Self {
            Self { reject_writes: true, ..Default::default() }
        }

        pub fn add_owner(&self, owner: ImageOwner, image: Option<ImageRef>) {
            let codigo = image.map(|img| {
                let mut images = self.images.lock().unwrap();
                let codigo = images.len() as i32 + 1;
                images.insert(codigo, img);
                codigo
            });
            self.owners.lock().unwrap().insert(owner, codigo);
        }

        pub fn image_of(&self, owner: ImageOwner) -> Option<ImageRef> {
            let owners = self.owners.lock().unwrap();
            let codigo = (*owners.get(&owner)?)?;
            self.images.lock().unwrap().get(&codigo).cloned()
        }

        pub fn image_rows(&self) -> usize {
            self.images.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageRepository for MockImageRepository {
        async fn current(&self, owner: ImageOwner) -> Result<CurrentImage, ServiceError> {
            let owners = self.owners.lock().unwrap();
            let Some(slot) = owners.get(&owner) else {
                return Ok(CurrentImage::OwnerMissing);
            };
            let images = self.images.lock().unwrap();
            Ok(match slot.and_then(|codigo| images.get(&codigo).map(|img| (codigo, img))) {
                Some((codigo_imagen, image)) => CurrentImage::Image(StoredImage { codigo_imagen, image: image.clone() }),
                None => CurrentImage::NoImage,
            })
        }

        async fn attach(&self, owner: ImageOwner, current: Option<&StoredImage>, image: &ImageRef) -> Result<bool, ServiceError> {
            if self.reject_writes {
                return Ok(false);
            }
            match current {
                Some(stored) => {
                    self.images.lock().unwrap().insert(stored.codigo_imagen, image.clone());
                }
                None => {
                    let codigo = {
                        let mut images = self.images.lock().unwrap();
                        let codigo = images.len() as i32 + 1;
                        images.insert(codigo, image.clone());
                        codigo
                    };
                    self.owners.lock().unwrap().insert(owner, Some(codigo));
                }
            }
            Ok(true)
        }
    }
}
