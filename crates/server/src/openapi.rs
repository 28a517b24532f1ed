use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MensajeDoc { pub mensaje: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SessionDoc { pub token: String, pub codigo_rol: i32 }

/// `perfil` carries `rol` = `Paseador` | `Tutor` plus rut, dv, nombre, apellido, telefono
/// (and an optional descripcion for walkers).
#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[schema(value_type = Object)]
    pub perfil: serde_json::Value,
    #[schema(value_type = Option<Object>)]
    pub ubicacion: Option<serde_json::Value>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RegisteredUserDoc { pub codigo_usuario: i32, pub mensaje: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ImageDoc { pub url: String, pub path: String, pub public_id: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UserImageRequest { pub codigo_usuario: i32, pub url: String, pub path: String, pub public_id: String }

#[derive(ToSchema)]
pub struct UserProfileDoc {
    pub id: i32,
    pub rol: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub imagen: Option<ImageDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PetRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub esterilizado: bool,
    #[schema(value_type = String, format = Date)]
    pub fecha_nacimiento: String,
    pub edad_registro: Option<f64>,
    pub is_fecha_nacimiento: bool,
    pub is_year: Option<bool>,
    pub codigo_raza: i32,
    pub codigo_tamanio: i32,
    pub codigo_sexo: i32,
    pub imagen: Option<ImageDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PetRegisteredDoc { pub codigo_mascota: i32, pub mensaje: String }

#[derive(ToSchema)]
pub struct DescripcionDoc { pub descripcion: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PetDetailDoc {
    pub nombre: String,
    pub edad: f64,
    pub grupo_etario: DescripcionDoc,
    pub raza: DescripcionDoc,
    pub tamanio: DescripcionDoc,
    pub sexo: DescripcionDoc,
    pub esterilizado: bool,
    pub descripcion: Option<String>,
    pub imagen: Option<ImageDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PetSummaryDoc {
    pub codigo_mascota: i32,
    pub nombre: String,
    pub raza: DescripcionDoc,
    pub imagen: Option<ImageDoc>,
    pub edad_registro: Option<f64>,
    pub estado_mascota: DescripcionDoc,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::usuarios::login,
        crate::routes::usuarios::registrar,
        crate::routes::usuarios::get_usuario_token,
        crate::routes::usuarios::registrar_imagen,
        crate::routes::usuarios::cambiar_imagen,
        crate::routes::mascotas::registrar,
        crate::routes::mascotas::obtener,
        crate::routes::mascotas::mis_mascotas,
        crate::routes::mascotas::editar,
        crate::routes::mascotas::cambiar_imagen,
    ),
    components(
        schemas(
            HealthResponse,
            MensajeDoc,
            LoginRequest,
            SessionDoc,
            RegisterRequest,
            RegisteredUserDoc,
            ImageDoc,
            UserImageRequest,
            UserProfileDoc,
            PetRequest,
            PetRegisteredDoc,
            DescripcionDoc,
            PetDetailDoc,
            PetSummaryDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "usuario"),
        (name = "mascota")
    )
)]
pub struct ApiDoc;
