use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use service::auth::domain::{AuthSession, LoginInput, RegisterInput, UserProfile};
use service::image::domain::{ImageOwner, ImageRef};

use super::auth::{ApiJson, AuthUser, ServerState, UploadJson};
use crate::errors::ApiError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub codigo_usuario: i32,
    pub mensaje: String,
}

/// Image uploaded right after sign-up, before the user has a session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserImageInput {
    pub codigo_usuario: i32,
    #[serde(flatten)]
    pub imagen: ImageRef,
}

#[utoipa::path(post, path = "/api/v1/Usuario/Login", tag = "usuario", request_body = crate::openapi::LoginRequest,
    responses((status = 200, body = crate::openapi::SessionDoc), (status = 401, body = crate::openapi::MensajeDoc), (status = 404, body = crate::openapi::MensajeDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<AuthSession>, ApiError> {
    Ok(Json(state.auth.login(input).await?))
}

#[utoipa::path(post, path = "/api/v1/Usuario/Registrar", tag = "usuario", request_body = crate::openapi::RegisterRequest,
    responses((status = 201, body = crate::openapi::RegisteredUserDoc), (status = 400, body = crate::openapi::MensajeDoc), (status = 409, body = crate::openapi::MensajeDoc)))]
pub async fn registrar(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let account = state.auth.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            codigo_usuario: account.codigo_usuario,
            mensaje: "Usuario registrado con éxito".into(),
        }),
    ))
}

#[utoipa::path(get, path = "/api/v1/Usuario/getUsuarioToken", tag = "usuario", security(("bearer" = [])),
    responses((status = 200, body = crate::openapi::UserProfileDoc), (status = 401, body = crate::openapi::MensajeDoc), (status = 404, body = crate::openapi::MensajeDoc)))]
pub async fn get_usuario_token(
    State(state): State<ServerState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.auth.profile(&caller).await?))
}

#[utoipa::path(put, path = "/api/v1/Usuario/RegistrarImagen", tag = "usuario", request_body = crate::openapi::UserImageRequest,
    responses((status = 204), (status = 400, body = crate::openapi::MensajeDoc), (status = 404, body = crate::openapi::MensajeDoc), (status = 409, body = crate::openapi::MensajeDoc)))]
pub async fn registrar_imagen(
    State(state): State<ServerState>,
    UploadJson(input): UploadJson<UserImageInput>,
) -> Result<StatusCode, ApiError> {
    state.images.attach_first(ImageOwner::User(input.codigo_usuario), input.imagen).await?;
    info!(codigo_usuario = input.codigo_usuario, "profile_image_registered");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/api/v1/Usuario/CambiarImagen", tag = "usuario", security(("bearer" = [])), request_body = crate::openapi::ImageDoc,
    responses((status = 204), (status = 400, body = crate::openapi::MensajeDoc), (status = 401, body = crate::openapi::MensajeDoc)))]
pub async fn cambiar_imagen(
    State(state): State<ServerState>,
    AuthUser(caller): AuthUser,
    UploadJson(imagen): UploadJson<ImageRef>,
) -> Result<StatusCode, ApiError> {
    state.images.replace(ImageOwner::User(caller.codigo_usuario), imagen).await?;
    Ok(StatusCode::NO_CONTENT)
}
