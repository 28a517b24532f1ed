use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use crate::image::domain::ImageRef;

/// Account role, keyed by `codigo_rol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Administrador,
    Paseador,
    Tutor,
}

impl Role {
    pub fn from_code(codigo_rol: i32) -> Option<Self> {
        match codigo_rol {
            models::rol::ADMINISTRADOR => Some(Role::Administrador),
            models::rol::PASEADOR => Some(Role::Paseador),
            models::rol::TUTOR => Some(Role::Tutor),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Role::Administrador => models::rol::ADMINISTRADOR,
            Role::Paseador => models::rol::PASEADOR,
            Role::Tutor => models::rol::TUTOR,
        }
    }
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login result (session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub codigo_rol: i32,
}

/// Stored account with its hashed credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct UserAccount {
    pub codigo_usuario: i32,
    pub email: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub codigo_rol: i32,
}

/// Authenticated identity extracted from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub codigo_usuario: i32,
    pub email: String,
    pub role: Role,
}

impl Caller {
    /// Authorization policy check for role-restricted operations.
    pub fn require(&self, role: Role) -> Result<(), AuthError> {
        if self.role != role {
            return Err(AuthError::Forbidden("No tiene permisos para acceder a este recurso".into()));
        }
        Ok(())
    }
}

/// Personal data submitted for a guardian profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    pub rut: String,
    pub dv: String,
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
}

/// Walker profile data; walkers may add a short presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkerInput {
    pub rut: String,
    pub dv: String,
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// Role profile created together with the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rol")]
pub enum NewProfile {
    Paseador(WalkerInput),
    Tutor(PersonInput),
}

impl NewProfile {
    pub fn role(&self) -> Role {
        match self {
            NewProfile::Paseador(_) => Role::Paseador,
            NewProfile::Tutor(_) => Role::Tutor,
        }
    }

    pub fn person(&self) -> models::paseador::PersonData<'_> {
        let (rut, dv, nombre, apellido, telefono) = match self {
            NewProfile::Paseador(w) => (&w.rut, &w.dv, &w.nombre, &w.apellido, &w.telefono),
            NewProfile::Tutor(p) => (&p.rut, &p.dv, &p.nombre, &p.apellido, &p.telefono),
        };
        models::paseador::PersonData { rut, dv, nombre, apellido, telefono }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub direccion: String,
    #[serde(default)]
    pub departamento: Option<i32>,
    pub latitud: f64,
    pub longitud: f64,
    pub codigo_comuna: i32,
}

/// Registration input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub perfil: NewProfile,
    #[serde(default)]
    pub ubicacion: Option<LocationInput>,
}

/// Account ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub perfil: NewProfile,
    pub ubicacion: Option<LocationInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub nombre: String,
    pub apellido: String,
}

/// Role-specific extension of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleProfile {
    Administrador(PersonName),
    Paseador(PersonName),
    Tutor(PersonName),
}

impl RoleProfile {
    pub fn name(&self) -> &PersonName {
        match self {
            RoleProfile::Administrador(n) | RoleProfile::Paseador(n) | RoleProfile::Tutor(n) => n,
        }
    }

    /// Administrators have no profile image.
    pub fn has_image(&self) -> bool {
        !matches!(self, RoleProfile::Administrador(_))
    }
}

/// Current-user payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub rol: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<ImageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_is_tagged_by_role() {
        let input: RegisterInput = serde_json::from_str(
            r#"{
                "email": "ana@voltapets.cl",
                "password": "Secreta123",
                "perfil": {
                    "rol": "Paseador",
                    "rut": "12345678", "dv": "K",
                    "nombre": "Ana", "apellido": "Rojas", "telefono": "56912345678",
                    "descripcion": "Paseos largos"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(input.perfil.role(), Role::Paseador);
        assert_eq!(input.perfil.person().dv, "K");
        assert!(input.ubicacion.is_none());
    }

    #[test]
    fn role_codes_round_trip() {
        for role in [Role::Administrador, Role::Paseador, Role::Tutor] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code(9), None);
    }
}
