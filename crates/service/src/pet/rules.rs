//! Ordered pet validation. Every rule is independent and the first failure
//! is reported; registration and edit run the same list.

use chrono::NaiveDate;

use super::age;
use super::domain::PetInput;
use crate::errors::ServiceError;

pub const MIN_DAYS_BY_BIRTH: i64 = 180;
pub const MAX_DAYS: i64 = 10_950;
pub const MIN_TOTAL_YEARS: f64 = 0.5;
pub const MAX_YEARS: f64 = 30.0;

pub const MSG_UNDER_SIX_MONTHS: &str = "No se permiten mascotas menores a 6 meses de edad";
pub const MSG_OVER_THIRTY_YEARS: &str =
    "Ingresa una fecha de nacimiento o adopción real (No es posible que un perro tenga más de 30 años)";
pub const MSG_AGE_MISMATCH: &str = "La edad ingresada no coincide con la edad calculada desde la fecha de nacimiento (La edad no es obligatoria si ingresa una fecha de nacimiento)";
pub const MSG_ADOPTION_AGE_REQUIRED: &str =
    "La fecha de adopcion requiere que ingrese la edad de la mascota para poder actualizarla automáticamente";
pub const MSG_FUTURE_DATE: &str = "La fecha de nacimiento o adopción no puede ser posterior a hoy";

/// Values derived from the input once, before any rule runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeFacts {
    pub elapsed_days: i64,
    pub elapsed_years: f64,
    /// Supplied age in years, converted from months when needed.
    pub edad: Option<f64>,
    pub by_birth: bool,
}

impl AgeFacts {
    pub fn derive(input: &PetInput, today: NaiveDate) -> Self {
        let edad = input.edad_registro.map(|edad| {
            if !input.is_year && edad > 0.0 {
                age::months_to_years(edad)
            } else {
                edad
            }
        });
        Self {
            elapsed_days: age::days_since(input.fecha_nacimiento, today),
            elapsed_years: age::years_since(input.fecha_nacimiento, today),
            edad,
            by_birth: input.is_fecha_nacimiento,
        }
    }
}

/// Outcome of a passing validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// Value stored in `edad_registro`; always `None` for birth-date registrations.
    pub edad_registro: Option<f64>,
    /// Age used to pick the age group.
    pub bucket_age: f64,
}

type Rule = fn(&PetInput, &AgeFacts) -> Result<(), String>;

const RULES: &[Rule] = &[
    fields_are_valid,
    date_not_in_future,
    birth_date_at_least_six_months,
    date_within_thirty_years,
    birth_age_matches_date,
    adoption_requires_age,
    adoption_age_within_thirty_years,
    adoption_age_covers_elapsed,
    adoption_total_at_least_six_months,
];

pub fn assess(input: &PetInput, today: NaiveDate) -> Result<Assessment, ServiceError> {
    let facts = AgeFacts::derive(input, today);
    for rule in RULES {
        rule(input, &facts).map_err(ServiceError::Validation)?;
    }
    Ok(if facts.by_birth {
        Assessment { edad_registro: None, bucket_age: facts.elapsed_years }
    } else {
        let edad = facts.edad.unwrap_or_default();
        Assessment { edad_registro: Some(edad), bucket_age: edad }
    })
}

fn fields_are_valid(input: &PetInput, _: &AgeFacts) -> Result<(), String> {
    models::mascota::validate_texts(&input.nombre, input.descripcion.as_deref()).map_err(model_message)?;
    if input.codigo_raza <= 0 || input.codigo_tamanio <= 0 || input.codigo_sexo <= 0 {
        return Err("Raza, tamaño y sexo son obligatorios".into());
    }
    if let Some(img) = &input.imagen {
        models::imagen::validate_reference(&img.url, &img.path, &img.public_id).map_err(model_message)?;
    }
    Ok(())
}

fn date_not_in_future(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    if f.elapsed_days < 0 {
        return Err(MSG_FUTURE_DATE.into());
    }
    Ok(())
}

fn birth_date_at_least_six_months(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    if f.by_birth && (f.elapsed_days < MIN_DAYS_BY_BIRTH || f.elapsed_years < MIN_TOTAL_YEARS) {
        return Err(MSG_UNDER_SIX_MONTHS.into());
    }
    Ok(())
}

fn date_within_thirty_years(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    if f.elapsed_days >= MAX_DAYS {
        return Err(MSG_OVER_THIRTY_YEARS.into());
    }
    Ok(())
}

fn birth_age_matches_date(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    match f.edad {
        Some(edad) if f.by_birth && edad > 0.0 && edad != f.elapsed_years => Err(MSG_AGE_MISMATCH.into()),
        _ => Ok(()),
    }
}

fn adoption_requires_age(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    if !f.by_birth && f.edad.map(|edad| edad == 0.0).unwrap_or(true) {
        return Err(MSG_ADOPTION_AGE_REQUIRED.into());
    }
    Ok(())
}

fn adoption_age_within_thirty_years(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    match f.edad {
        Some(edad) if !f.by_birth && edad > MAX_YEARS => Err(MSG_OVER_THIRTY_YEARS.into()),
        _ => Ok(()),
    }
}

fn adoption_age_covers_elapsed(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    match f.edad {
        Some(edad) if !f.by_birth && edad < f.elapsed_years => Err(format!(
            "La edad ingresada no puede ser menor a {} años, correspondiente al tiempo de adopcion",
            f.elapsed_years
        )),
        _ => Ok(()),
    }
}

fn adoption_total_at_least_six_months(_: &PetInput, f: &AgeFacts) -> Result<(), String> {
    match f.edad {
        Some(edad) if !f.by_birth && f.elapsed_years + edad < MIN_TOTAL_YEARS => Err(MSG_UNDER_SIX_MONTHS.into()),
        _ => Ok(()),
    }
}

fn model_message(e: models::errors::ModelError) -> String {
    match e {
        models::errors::ModelError::Validation(msg) | models::errors::ModelError::Db(msg) => msg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn by_birth(days_ago: i64) -> PetInput {
        PetInput {
            nombre: "Firulais".into(),
            descripcion: None,
            esterilizado: true,
            fecha_nacimiento: today() - Duration::days(days_ago),
            edad_registro: None,
            is_fecha_nacimiento: true,
            is_year: true,
            codigo_raza: 1,
            codigo_tamanio: 2,
            codigo_sexo: 1,
            imagen: None,
        }
    }

    fn by_adoption(days_ago: i64, edad: Option<f64>) -> PetInput {
        PetInput { is_fecha_nacimiento: false, edad_registro: edad, ..by_birth(days_ago) }
    }

    fn message(input: &PetInput) -> String {
        match assess(input, today()) {
            Err(ServiceError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn birth_date_younger_than_six_months_is_rejected() {
        assert_eq!(message(&by_birth(179)), MSG_UNDER_SIX_MONTHS);
        assert_eq!(message(&by_birth(0)), MSG_UNDER_SIX_MONTHS);
        for days in 180..=182 {
            assert_eq!(message(&by_birth(days)), MSG_UNDER_SIX_MONTHS, "{days} days");
        }
        let ok = assess(&by_birth(183), today()).unwrap();
        assert_eq!(ok.edad_registro, None);
        assert_eq!(ok.bucket_age, 0.5);
    }

    #[test]
    fn thirty_years_or_more_is_rejected_in_both_modes() {
        assert_eq!(message(&by_birth(10_950)), MSG_OVER_THIRTY_YEARS);
        assert_eq!(message(&by_birth(11_000)), MSG_OVER_THIRTY_YEARS);
        assert_eq!(message(&by_adoption(11_000, Some(31.0))), MSG_OVER_THIRTY_YEARS);
        assert!(assess(&by_birth(10_949), today()).is_ok());
    }

    #[test]
    fn supplied_age_must_match_birth_date() {
        let mut input = by_birth(4 * 366);
        input.edad_registro = Some(3.0);
        assert_eq!(message(&input), MSG_AGE_MISMATCH);

        input.edad_registro = Some(4.0);
        let ok = assess(&input, today()).unwrap();
        assert_eq!(ok.edad_registro, None);
        assert_eq!(ok.bucket_age, 4.0);
    }

    #[test]
    fn adoption_needs_an_age() {
        assert_eq!(message(&by_adoption(400, Some(0.0))), MSG_ADOPTION_AGE_REQUIRED);
        assert_eq!(message(&by_adoption(400, None)), MSG_ADOPTION_AGE_REQUIRED);
    }

    #[test]
    fn supplied_adoption_age_is_capped_at_thirty_years() {
        let ok = assess(&by_adoption(400, Some(30.0)), today()).unwrap();
        assert_eq!(ok.edad_registro, Some(30.0));
        assert_eq!(message(&by_adoption(400, Some(30.01))), MSG_OVER_THIRTY_YEARS);
        assert_eq!(message(&by_adoption(400, Some(80.0))), MSG_OVER_THIRTY_YEARS);

        let mut months = by_adoption(400, Some(372.0));
        months.is_year = false;
        assert_eq!(message(&months), MSG_OVER_THIRTY_YEARS);
    }

    #[test]
    fn adoption_age_cannot_be_below_time_since_adoption() {
        assert_eq!(
            message(&by_adoption(3 * 366, Some(2.0))),
            "La edad ingresada no puede ser menor a 3 años, correspondiente al tiempo de adopcion"
        );
        let ok = assess(&by_adoption(3 * 366, Some(5.0)), today()).unwrap();
        assert_eq!(ok.edad_registro, Some(5.0));
        assert_eq!(ok.bucket_age, 5.0);
    }

    #[test]
    fn adoption_total_below_half_a_year_is_rejected() {
        assert_eq!(message(&by_adoption(10, Some(0.3))), MSG_UNDER_SIX_MONTHS);
        assert!(assess(&by_adoption(10, Some(0.6)), today()).is_ok());
    }

    #[test]
    fn months_are_converted_before_age_rules() {
        let mut input = by_adoption(30, Some(18.0));
        input.is_year = false;
        let ok = assess(&input, today()).unwrap();
        assert_eq!(ok.edad_registro, Some(1.0));

        let mut input = by_birth(2 * 366);
        input.is_year = false;
        input.edad_registro = Some(24.0);
        assert!(assess(&input, today()).is_ok());
    }

    #[test]
    fn field_rule_runs_first() {
        let mut input = by_birth(10);
        input.nombre = String::new();
        assert!(message(&input).starts_with("El nombre de la mascota"));
        assert_eq!(message(&by_birth(-3)), MSG_FUTURE_DATE);
    }
}
