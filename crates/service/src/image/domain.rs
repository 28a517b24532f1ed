use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Reference to an asset already uploaded to the image host by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    pub path: String,
    #[serde(alias = "public_Id", alias = "public_id")]
    pub public_id: String,
}

impl ImageRef {
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::imagen::validate_reference(&self.url, &self.path, &self.public_id)?;
        Ok(())
    }
}

impl From<models::imagen::Model> for ImageRef {
    fn from(m: models::imagen::Model) -> Self {
        Self { url: m.url, path: m.path, public_id: m.public_id }
    }
}

/// Entity that holds at most one current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOwner {
    User(i32),
    Pet(i32),
}

impl ImageOwner {
    pub(crate) fn not_found_message(&self) -> &'static str {
        match self {
            ImageOwner::User(_) => "Usuario no encontrado",
            ImageOwner::Pet(_) => "No se pudo obtener a la mascota",
        }
    }

    pub(crate) fn taken_message(&self) -> &'static str {
        match self {
            ImageOwner::User(_) => "El usuario ya tiene una imagen de perfil",
            ImageOwner::Pet(_) => "La mascota ya tiene una imagen",
        }
    }

    pub(crate) fn failure_message(&self) -> &'static str {
        match self {
            ImageOwner::User(_) => "No se pudo cambiar la imagen de perfil",
            ImageOwner::Pet(_) => "No se pudo cambiar la imagen de la mascota",
        }
    }
}

/// Image row currently linked to an owner.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub codigo_imagen: i32,
    pub image: ImageRef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CurrentImage {
    OwnerMissing,
    NoImage,
    Image(StoredImage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_public_id_spelling() {
        let img: ImageRef = serde_json::from_str(
            r#"{"url":"https://res.cloudinary.com/demo/a.png","path":"a.png","public_Id":"volta/a"}"#,
        )
        .unwrap();
        assert_eq!(img.public_id, "volta/a");
        let back = serde_json::to_value(&img).unwrap();
        assert_eq!(back["publicId"], "volta/a");
    }
}
