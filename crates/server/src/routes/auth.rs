use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use sea_orm::DatabaseConnection;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use configs::JwtConfig;
use service::auth::{
    domain::{Caller, Role},
    repo::seaorm::SeaOrmAuthRepository,
    repository::AuthRepository,
    token::TokenIssuer,
    AuthService,
};
use service::image::{
    domain::ImageRef,
    host::ImageHost, repo::seaorm::SeaOrmImageRepository, repository::ImageRepository, ImageService,
};
use service::pet::{repo::seaorm::SeaOrmPetRepository, repository::PetRepository, PetService};

use crate::errors::ApiError;

const MSG_TOKEN_REQUIRED: &str = "Token de acceso requerido";

/// Storage backends behind the services.
#[derive(Clone)]
pub struct Repositories {
    pub auth: Arc<dyn AuthRepository>,
    pub pets: Arc<dyn PetRepository>,
    pub images: Arc<dyn ImageRepository>,
}

impl Repositories {
    pub fn seaorm(db: DatabaseConnection) -> Self {
        Self {
            auth: Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            pets: Arc::new(SeaOrmPetRepository { db: db.clone() }),
            images: Arc::new(SeaOrmImageRepository { db }),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub pets: Arc<PetService>,
    pub images: Arc<ImageService>,
}

impl ServerState {
    pub fn new(
        repos: Repositories,
        host: Arc<dyn ImageHost>,
        jwt: &JwtConfig,
        default_public_id: Option<String>,
    ) -> Self {
        let images = Arc::new(ImageService::new(repos.images, host, default_public_id));
        Self {
            auth: Arc::new(AuthService::new(repos.auth, TokenIssuer::new(&jwt.secret, jwt.ttl_days))),
            pets: Arc::new(PetService::new(repos.pets, Arc::clone(&images))),
            images,
        }
    }
}

/// JSON body whose rejections render as `{ "mensaje": ... }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// JSON body that may carry an image already uploaded by the client. When the
/// body does not match `T` that image is released before rejecting.
pub struct UploadJson<T>(pub T);

#[async_trait]
impl<T> FromRequest<ServerState> for UploadJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &ServerState) -> Result<Self, Self::Rejection> {
        let ApiJson(body) = ApiJson::<Value>::from_request(req, state).await?;
        let err = match T::deserialize(&body) {
            Ok(value) => return Ok(UploadJson(value)),
            Err(e) => e.to_string(),
        };
        if let Some(image) = uploaded_image(&body) {
            state.images.release(&image).await;
        }
        Err(ApiError::bad_request(format!("Solicitud inválida: {err}")))
    }
}

/// Image reference under `imagen`, or the body itself for image-only payloads.
fn uploaded_image(body: &Value) -> Option<ImageRef> {
    let candidate = body.get("imagen").filter(|v| !v.is_null()).unwrap_or(body);
    ImageRef::deserialize(candidate).ok()
}

/// Any authenticated user, taken from `Authorization: Bearer <token>`.
pub struct AuthUser(pub Caller);

#[async_trait]
impl FromRequestParts<ServerState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::unauthorized(MSG_TOKEN_REQUIRED))?;
        let caller = state.auth.verify(bearer.token())?;
        Ok(AuthUser(caller))
    }
}

/// Authenticated user holding the guardian role.
pub struct TutorUser(pub Caller);

#[async_trait]
impl FromRequestParts<ServerState> for TutorUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let AuthUser(caller) = AuthUser::from_request_parts(parts, state).await?;
        caller.require(Role::Tutor)?;
        Ok(TutorUser(caller))
    }
}
