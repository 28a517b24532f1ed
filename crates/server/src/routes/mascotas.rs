use axum::{extract::State, http::StatusCode, Json};

use common::types::Mensaje;
use service::image::domain::ImageRef;
use service::pet::domain::{PetDetail, PetInput, PetRegistered, PetSummary};

use super::auth::{ApiJson, ApiPath, ServerState, TutorUser, UploadJson};
use crate::errors::ApiError;

#[utoipa::path(post, path = "/api/v1/Mascota/Registrar", tag = "mascota", security(("bearer" = [])), request_body = crate::openapi::PetRequest,
    responses((status = 200, body = crate::openapi::PetRegisteredDoc), (status = 400, body = crate::openapi::MensajeDoc), (status = 409, body = crate::openapi::MensajeDoc)))]
pub async fn registrar(
    State(state): State<ServerState>,
    TutorUser(caller): TutorUser,
    UploadJson(input): UploadJson<PetInput>,
) -> Result<Json<PetRegistered>, ApiError> {
    let codigo_mascota = state.pets.register(caller.codigo_usuario, input).await?;
    Ok(Json(PetRegistered {
        codigo_mascota,
        mensaje: "Mascota registrada con éxito".into(),
    }))
}

#[utoipa::path(get, path = "/api/v1/Mascota/Obtener/{codigoMascota}", tag = "mascota", security(("bearer" = [])),
    params(("codigoMascota" = i32, Path, description = "Pet code")),
    responses((status = 200, body = crate::openapi::PetDetailDoc), (status = 404, body = crate::openapi::MensajeDoc)))]
pub async fn obtener(
    State(state): State<ServerState>,
    TutorUser(caller): TutorUser,
    ApiPath(codigo_mascota): ApiPath<i32>,
) -> Result<Json<PetDetail>, ApiError> {
    Ok(Json(state.pets.get(caller.codigo_usuario, codigo_mascota).await?))
}

#[utoipa::path(get, path = "/api/v1/Mascota/Obtener/MisMascotas", tag = "mascota", security(("bearer" = [])),
    responses((status = 200, body = [crate::openapi::PetSummaryDoc]), (status = 404, body = crate::openapi::MensajeDoc)))]
pub async fn mis_mascotas(
    State(state): State<ServerState>,
    TutorUser(caller): TutorUser,
) -> Result<Json<Vec<PetSummary>>, ApiError> {
    Ok(Json(state.pets.list_mine(caller.codigo_usuario).await?))
}

#[utoipa::path(put, path = "/api/v1/Mascota/Editar/{codigoMascota}", tag = "mascota", security(("bearer" = [])), request_body = crate::openapi::PetRequest,
    params(("codigoMascota" = i32, Path, description = "Pet code")),
    responses((status = 200, body = crate::openapi::MensajeDoc), (status = 400, body = crate::openapi::MensajeDoc), (status = 404, body = crate::openapi::MensajeDoc), (status = 409, body = crate::openapi::MensajeDoc)))]
pub async fn editar(
    State(state): State<ServerState>,
    TutorUser(caller): TutorUser,
    ApiPath(codigo_mascota): ApiPath<i32>,
    ApiJson(input): ApiJson<PetInput>,
) -> Result<Json<Mensaje>, ApiError> {
    state.pets.edit(caller.codigo_usuario, codigo_mascota, input).await?;
    Ok(Json(Mensaje::new("Mascota editada con éxito")))
}

#[utoipa::path(put, path = "/api/v1/Mascota/CambiarImagen/{codigoMascota}", tag = "mascota", security(("bearer" = [])), request_body = crate::openapi::ImageDoc,
    params(("codigoMascota" = i32, Path, description = "Pet code")),
    responses((status = 204), (status = 400, body = crate::openapi::MensajeDoc), (status = 404, body = crate::openapi::MensajeDoc)))]
pub async fn cambiar_imagen(
    State(state): State<ServerState>,
    TutorUser(caller): TutorUser,
    ApiPath(codigo_mascota): ApiPath<i32>,
    UploadJson(imagen): UploadJson<ImageRef>,
) -> Result<StatusCode, ApiError> {
    state.pets.change_image(caller.codigo_usuario, codigo_mascota, imagen).await?;
    Ok(StatusCode::NO_CONTENT)
}
