//! Seed catalog rows. Codes follow insertion order on a fresh schema, so
//! roles are 1 = Administrador, 2 = Paseador, 3 = Tutor and the initial pet
//! state is 1 = Activo.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const ROLES: [&str; 3] = ["Administrador", "Paseador", "Tutor"];
const RAZAS: [&str; 6] = ["Mestizo", "Labrador", "Poodle", "Pastor Alemán", "Beagle", "Quiltro"];
const TAMANIOS: [&str; 3] = ["Pequeño", "Mediano", "Grande"];
const SEXOS: [&str; 2] = ["Macho", "Hembra"];
const ESTADOS: [&str; 2] = ["Activo", "Inactivo"];
const GRUPOS: [(&str, f64, f64); 4] = [
    ("Cachorro", 0.0, 1.0),
    ("Joven", 1.0, 3.0),
    ("Adulto", 3.0, 8.0),
    ("Senior", 8.0, 31.0),
];

async fn seed_descriptions<T>(manager: &SchemaManager<'_>, table: T, column: T, rows: &[&str]) -> Result<(), DbErr>
where
    T: IntoIden + Copy + 'static,
{
    let mut insert = Query::insert();
    insert.into_table(table).columns([column]);
    for row in rows {
        insert.values_panic([(*row).into()]);
    }
    manager.exec_stmt(insert).await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        seed_descriptions(manager, Rol::Table, Rol::Descripcion, &ROLES).await?;
        seed_descriptions(manager, Raza::Table, Raza::Descripcion, &RAZAS).await?;
        seed_descriptions(manager, Tamanio::Table, Tamanio::Descripcion, &TAMANIOS).await?;
        seed_descriptions(manager, Sexo::Table, Sexo::Descripcion, &SEXOS).await?;
        seed_descriptions(manager, EstadoMascota::Table, EstadoMascota::Descripcion, &ESTADOS).await?;

        let mut grupos = Query::insert();
        grupos
            .into_table(GrupoEtario::Table)
            .columns([GrupoEtario::Descripcion, GrupoEtario::EdadInferior, GrupoEtario::EdadSuperior]);
        for (descripcion, inferior, superior) in GRUPOS {
            grupos.values_panic([descripcion.into(), inferior.into(), superior.into()]);
        }
        manager.exec_stmt(grupos).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.exec_stmt(Query::delete().from_table(GrupoEtario::Table).to_owned()).await?;
        manager.exec_stmt(Query::delete().from_table(EstadoMascota::Table).to_owned()).await?;
        manager.exec_stmt(Query::delete().from_table(Sexo::Table).to_owned()).await?;
        manager.exec_stmt(Query::delete().from_table(Tamanio::Table).to_owned()).await?;
        manager.exec_stmt(Query::delete().from_table(Raza::Table).to_owned()).await?;
        manager.exec_stmt(Query::delete().from_table(Rol::Table).to_owned()).await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Rol { Table, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum Raza { Table, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum Tamanio { Table, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum Sexo { Table, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum EstadoMascota { Table, Descripcion }

#[derive(DeriveIden)]
enum GrupoEtario { Table, Descripcion, EdadInferior, EdadSuperior }
