use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::image::domain::ImageRef;

fn default_true() -> bool {
    true
}

/// Accepts `2020-05-01`, `2020-05-01T10:30:00` or an RFC 3339 timestamp and
/// keeps the calendar date.
fn date_or_datetime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("fecha inválida: {raw}")))
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.parse::<NaiveDate>()
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Pet attributes submitted on registration and edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetInput {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    pub esterilizado: bool,
    /// Birth date, or adoption date when `is_fecha_nacimiento` is false.
    #[serde(deserialize_with = "date_or_datetime")]
    pub fecha_nacimiento: NaiveDate,
    #[serde(default)]
    pub edad_registro: Option<f64>,
    pub is_fecha_nacimiento: bool,
    /// When false `edad_registro` is expressed in months.
    #[serde(default = "default_true")]
    pub is_year: bool,
    pub codigo_raza: i32,
    pub codigo_tamanio: i32,
    pub codigo_sexo: i32,
    #[serde(default)]
    pub imagen: Option<ImageRef>,
}

/// Columns written for a pet, minus state and image.
#[derive(Debug, Clone, PartialEq)]
pub struct PetRecord {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub esterilizado: bool,
    pub fecha_nacimiento: NaiveDate,
    pub edad_registro: Option<f64>,
    pub codigo_tutor: i32,
    pub codigo_raza: i32,
    pub codigo_tamanio: i32,
    pub codigo_sexo: i32,
    pub codigo_etario: i32,
}

impl PetRecord {
    pub fn identity(&self) -> models::mascota::Identity<'_> {
        models::mascota::Identity {
            nombre: &self.nombre,
            esterilizado: self.esterilizado,
            fecha_nacimiento: self.fecha_nacimiento,
            edad_registro: self.edad_registro,
            codigo_tutor: self.codigo_tutor,
            codigo_raza: self.codigo_raza,
            codigo_tamanio: self.codigo_tamanio,
            codigo_sexo: self.codigo_sexo,
            codigo_etario: self.codigo_etario,
        }
    }

    /// Same pet for duplicate detection (description is not part of it).
    pub fn same_identity(&self, other: &PetRecord) -> bool {
        self.identity() == other.identity()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredPet {
    pub codigo_mascota: i32,
    pub record: PetRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgeGroup {
    pub codigo_etario: i32,
    pub descripcion: String,
    pub edad_inferior: f64,
    pub edad_superior: f64,
}

impl From<models::grupo_etario::Model> for AgeGroup {
    fn from(m: models::grupo_etario::Model) -> Self {
        Self {
            codigo_etario: m.codigo_etario,
            descripcion: m.descripcion,
            edad_inferior: m.edad_inferior,
            edad_superior: m.edad_superior,
        }
    }
}

/// Catalog entry as exposed in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descripcion {
    pub descripcion: String,
}

impl Descripcion {
    pub fn new(descripcion: impl Into<String>) -> Self {
        Self { descripcion: descripcion.into() }
    }
}

/// Stored pet joined with its catalog descriptions.
#[derive(Debug, Clone, PartialEq)]
pub struct PetView {
    pub codigo_tutor: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub esterilizado: bool,
    pub fecha_nacimiento: NaiveDate,
    pub edad_registro: Option<f64>,
    pub grupo_etario: String,
    pub raza: String,
    pub tamanio: String,
    pub sexo: String,
    pub imagen: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDetail {
    pub nombre: String,
    pub edad: f64,
    pub grupo_etario: Descripcion,
    pub raza: Descripcion,
    pub tamanio: Descripcion,
    pub sexo: Descripcion,
    pub esterilizado: bool,
    pub descripcion: Option<String>,
    pub imagen: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetSummary {
    pub codigo_mascota: i32,
    pub nombre: String,
    pub raza: Descripcion,
    pub imagen: Option<ImageRef>,
    pub edad_registro: Option<f64>,
    pub estado_mascota: Descripcion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRegistered {
    pub codigo_mascota: i32,
    pub mensaje: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(fecha: &str) -> serde_json::Result<PetInput> {
        serde_json::from_value(serde_json::json!({
            "nombre": "Luna",
            "esterilizado": false,
            "fechaNacimiento": fecha,
            "isFechaNacimiento": true,
            "codigoRaza": 1,
            "codigoTamanio": 1,
            "codigoSexo": 2
        }))
    }

    #[test]
    fn birth_date_accepts_plain_dates_and_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        for fecha in ["2020-05-01", "2020-05-01T00:00:00", "2020-05-01T18:45:10.250", "2020-05-01T03:00:00Z"] {
            assert_eq!(input(fecha).unwrap().fecha_nacimiento, expected, "{fecha}");
        }
        let parsed = input("2020-05-01").unwrap();
        assert!(parsed.is_year);
        assert_eq!(parsed.imagen, None);
    }

    #[test]
    fn malformed_birth_date_is_rejected() {
        let err = input("01/05/2020").unwrap_err();
        assert!(err.to_string().contains("fecha inválida"));
    }
}
