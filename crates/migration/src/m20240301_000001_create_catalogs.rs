//! Create lookup tables referenced by users and pets.
//!
//! `rol`, `raza`, `tamanio`, `sexo` and `estado_mascota` are plain
//! code/description catalogs; `grupo_etario` carries the half-open age range
//! `[edad_inferior, edad_superior)`; `imagen` and `ubicacion` are owned rows.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn catalog<T>(table: T, id: T, descripcion: T, len: u32) -> TableCreateStatement
where
    T: IntoIden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(pk_auto(id))
        .col(string_len(descripcion, len).not_null())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(catalog(Rol::Table, Rol::CodigoRol, Rol::Descripcion, 30)).await?;
        manager.create_table(catalog(Raza::Table, Raza::CodigoRaza, Raza::Descripcion, 50)).await?;
        manager
            .create_table(catalog(Tamanio::Table, Tamanio::CodigoTamanio, Tamanio::Descripcion, 20))
            .await?;
        manager.create_table(catalog(Sexo::Table, Sexo::CodigoSexo, Sexo::Descripcion, 20)).await?;
        manager
            .create_table(catalog(
                EstadoMascota::Table,
                EstadoMascota::CodigoEstadoMascota,
                EstadoMascota::Descripcion,
                20,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GrupoEtario::Table)
                    .if_not_exists()
                    .col(pk_auto(GrupoEtario::CodigoEtario))
                    .col(string_len(GrupoEtario::Descripcion, 20).not_null())
                    .col(double(GrupoEtario::EdadInferior).not_null())
                    .col(double(GrupoEtario::EdadSuperior).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Imagen::Table)
                    .if_not_exists()
                    .col(pk_auto(Imagen::CodigoImagen))
                    .col(string_len(Imagen::Url, 500).not_null())
                    .col(string_len(Imagen::Path, 500).not_null())
                    .col(string_len(Imagen::PublicId, 200).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ubicacion::Table)
                    .if_not_exists()
                    .col(pk_auto(Ubicacion::CodigoUbicacion))
                    .col(string_len(Ubicacion::Direccion, 200).not_null())
                    .col(integer_null(Ubicacion::Departamento))
                    .col(double(Ubicacion::Latitud).not_null())
                    .col(double(Ubicacion::Longitud).not_null())
                    .col(integer(Ubicacion::CodigoComuna).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Ubicacion::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Imagen::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(GrupoEtario::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(EstadoMascota::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Sexo::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Tamanio::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Raza::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Rol::Table).to_owned()).await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Rol { Table, CodigoRol, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum Raza { Table, CodigoRaza, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum Tamanio { Table, CodigoTamanio, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum Sexo { Table, CodigoSexo, Descripcion }

#[derive(DeriveIden, Clone, Copy)]
enum EstadoMascota { Table, CodigoEstadoMascota, Descripcion }

#[derive(DeriveIden)]
enum GrupoEtario { Table, CodigoEtario, Descripcion, EdadInferior, EdadSuperior }

#[derive(DeriveIden)]
enum Imagen { Table, CodigoImagen, Url, Path, PublicId }

#[derive(DeriveIden)]
enum Ubicacion { Table, CodigoUbicacion, Direccion, Departamento, Latitud, Longitud, CodigoComuna }
