use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{CurrentImage, ImageOwner, ImageRef};
use super::host::{self, ImageHost};
use super::repository::ImageRepository;
use crate::errors::ServiceError;

/// Swaps the current image of a user or pet and keeps the image host in sync:
/// a failed swap releases the new upload, a successful one releases the old asset.
pub struct ImageService {
    repo: Arc<dyn ImageRepository>,
    host: Arc<dyn ImageHost>,
    default_public_id: Option<String>,
}

impl ImageService {
    pub fn new(repo: Arc<dyn ImageRepository>, host: Arc<dyn ImageHost>, default_public_id: Option<String>) -> Self {
        Self { repo, host, default_public_id }
    }

    /// Delete an uploaded asset from the host, logging failures.
    pub async fn release(&self, image: &ImageRef) {
        host::release(self.host.as_ref(), image).await
    }

    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::image::{ImageService, domain::{ImageOwner, ImageRef}};
    /// use service::image::{host::mock::RecordingImageHost, repository::mock::MockImageRepository};
    /// let repo = Arc::new(MockImageRepository::default());
    /// let old = ImageRef { url: "https://img/a.png".into(), path: "a.png".into(), public_id: "volta/a".into() };
    /// repo.add_owner(ImageOwner::User(1), Some(old));
    /// let host = Arc::new(RecordingImageHost::default());
    /// let svc = ImageService::new(repo.clone(), host.clone(), None);
    /// let new = ImageRef { url: "https://img/b.png".into(), path: "b.png".into(), public_id: "volta/b".into() };
    /// tokio_test::block_on(svc.replace(ImageOwner::User(1), new.clone())).unwrap();
    /// assert_eq!(repo.image_of(ImageOwner::User(1)), Some(new));
    /// assert_eq!(host.destroyed(), vec!["volta/a".to_string()]);
    /// ```
    #[instrument(skip(self, image), fields(owner = ?owner, public_id = %image.public_id))]
    pub async fn replace(&self, owner: ImageOwner, image: ImageRef) -> Result<(), ServiceError> {
        self.apply(owner, image, true).await
    }

    /// First image of an owner, for callers without a session. Only an owner
    /// with no image or with the shared placeholder accepts it; otherwise the
    /// new upload is released and the current image is left alone.
    #[instrument(skip(self, image), fields(owner = ?owner, public_id = %image.public_id))]
    pub async fn attach_first(&self, owner: ImageOwner, image: ImageRef) -> Result<(), ServiceError> {
        self.apply(owner, image, false).await
    }

    async fn apply(&self, owner: ImageOwner, image: ImageRef, overwrite: bool) -> Result<(), ServiceError> {
        match self.swap(owner, &image, overwrite).await {
            Ok(previous) => {
                if let Some(previous) = previous.filter(|p| !self.is_retained(p, &image)) {
                    self.release(&previous).await;
                }
                info!("image_replaced");
                Ok(())
            }
            Err(e) => {
                self.release(&image).await;
                Err(e)
            }
        }
    }

    async fn swap(&self, owner: ImageOwner, image: &ImageRef, overwrite: bool) -> Result<Option<ImageRef>, ServiceError> {
        image.validate()?;
        let current = match self.repo.current(owner).await? {
            CurrentImage::OwnerMissing => return Err(ServiceError::NotFound(owner.not_found_message().into())),
            CurrentImage::NoImage => None,
            CurrentImage::Image(stored) => Some(stored),
        };
        if let Some(stored) = current.as_ref().filter(|_| !overwrite) {
            if !self.is_default(&stored.image) {
                return Err(ServiceError::Conflict(owner.taken_message().into()));
            }
        }
        if !self.repo.attach(owner, current.as_ref(), image).await? {
            return Err(ServiceError::Persistence(owner.failure_message().into()));
        }
        Ok(current.map(|stored| stored.image))
    }

    fn is_default(&self, image: &ImageRef) -> bool {
        self.default_public_id.as_deref() == Some(image.public_id.as_str())
    }

    /// The shared placeholder and an unchanged asset stay on the host.
    fn is_retained(&self, previous: &ImageRef, new: &ImageRef) -> bool {
        previous.public_id == new.public_id || self.is_default(previous)
    }
}
