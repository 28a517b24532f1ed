//! Create `mascota`.
//!
//! `fecha_nacimiento` is the birth date or, for adopted pets, the adoption
//! date; `edad_registro` is only stored for the latter.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn fk(name: &str, column: Mascota, table: impl IntoIden + 'static, to: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(Mascota::Table, column)
        .to(table, to)
        .on_delete(ForeignKeyAction::Restrict)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mascota::Table)
                    .if_not_exists()
                    .col(pk_auto(Mascota::CodigoMascota))
                    .col(string_len(Mascota::Nombre, 30).not_null())
                    .col(string_len_null(Mascota::Descripcion, 500))
                    .col(boolean(Mascota::Esterilizado).not_null())
                    .col(date(Mascota::FechaNacimiento).not_null())
                    .col(double_null(Mascota::EdadRegistro))
                    .col(integer(Mascota::CodigoTutor).not_null())
                    .col(integer(Mascota::CodigoRaza).not_null())
                    .col(integer(Mascota::CodigoTamanio).not_null())
                    .col(integer(Mascota::CodigoSexo).not_null())
                    .col(integer(Mascota::CodigoEtario).not_null())
                    .col(integer(Mascota::CodigoEstadoMascota).not_null())
                    .col(integer_null(Mascota::CodigoImagen))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mascota_tutor")
                            .from(Mascota::Table, Mascota::CodigoTutor)
                            .to(Tutor::Table, Tutor::CodigoTutor)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(&mut fk("fk_mascota_raza", Mascota::CodigoRaza, Raza::Table, Raza::CodigoRaza))
                    .foreign_key(&mut fk(
                        "fk_mascota_tamanio",
                        Mascota::CodigoTamanio,
                        Tamanio::Table,
                        Tamanio::CodigoTamanio,
                    ))
                    .foreign_key(&mut fk("fk_mascota_sexo", Mascota::CodigoSexo, Sexo::Table, Sexo::CodigoSexo))
                    .foreign_key(&mut fk(
                        "fk_mascota_grupo_etario",
                        Mascota::CodigoEtario,
                        GrupoEtario::Table,
                        GrupoEtario::CodigoEtario,
                    ))
                    .foreign_key(&mut fk(
                        "fk_mascota_estado",
                        Mascota::CodigoEstadoMascota,
                        EstadoMascota::Table,
                        EstadoMascota::CodigoEstadoMascota,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mascota_imagen")
                            .from(Mascota::Table, Mascota::CodigoImagen)
                            .to(Imagen::Table, Imagen::CodigoImagen)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Mascota::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Mascota {
    Table,
    CodigoMascota,
    Nombre,
    Descripcion,
    Esterilizado,
    FechaNacimiento,
    EdadRegistro,
    CodigoTutor,
    CodigoRaza,
    CodigoTamanio,
    CodigoSexo,
    CodigoEtario,
    CodigoEstadoMascota,
    CodigoImagen,
}

#[derive(DeriveIden)]
enum Tutor { Table, CodigoTutor }

#[derive(DeriveIden)]
enum Raza { Table, CodigoRaza }

#[derive(DeriveIden)]
enum Tamanio { Table, CodigoTamanio }

#[derive(DeriveIden)]
enum Sexo { Table, CodigoSexo }

#[derive(DeriveIden)]
enum GrupoEtario { Table, CodigoEtario }

#[derive(DeriveIden)]
enum EstadoMascota { Table, CodigoEstadoMascota }

#[derive(DeriveIden)]
enum Imagen { Table, CodigoImagen }
