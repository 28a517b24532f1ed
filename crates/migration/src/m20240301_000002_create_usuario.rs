//! Create `usuario` and its one-to-one role profiles.
//!
//! `administrador`, `paseador` and `tutor` each hold a unique FK to
//! `usuario`; which one applies is decided by `usuario.codigo_rol`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Usuario::Table)
                    .if_not_exists()
                    .col(pk_auto(Usuario::CodigoUsuario))
                    .col(string_len(Usuario::Email, 200).unique_key().not_null())
                    .col(string_len(Usuario::Password, 255).not_null())
                    .col(string_len(Usuario::PasswordAlgorithm, 32).not_null())
                    .col(text_null(Usuario::Token))
                    .col(integer(Usuario::CodigoRol).not_null())
                    .col(integer_null(Usuario::CodigoImagen))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_rol")
                            .from(Usuario::Table, Usuario::CodigoRol)
                            .to(Rol::Table, Rol::CodigoRol)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_imagen")
                            .from(Usuario::Table, Usuario::CodigoImagen)
                            .to(Imagen::Table, Imagen::CodigoImagen)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Administrador::Table)
                    .if_not_exists()
                    .col(pk_auto(Administrador::CodigoAdministrador))
                    .col(string_len(Administrador::Nombre, 20).not_null())
                    .col(string_len(Administrador::Apellido, 20).not_null())
                    .col(integer(Administrador::CodigoUsuario).unique_key().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_administrador_usuario")
                            .from(Administrador::Table, Administrador::CodigoUsuario)
                            .to(Usuario::Table, Usuario::CodigoUsuario)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Paseador::Table)
                    .if_not_exists()
                    .col(pk_auto(Paseador::CodigoPaseador))
                    .col(string_len(Paseador::Rut, 11).not_null())
                    .col(string_len(Paseador::Dv, 1).not_null())
                    .col(string_len(Paseador::Nombre, 20).not_null())
                    .col(string_len(Paseador::Apellido, 20).not_null())
                    .col(string_len(Paseador::Telefono, 11).not_null())
                    .col(string_len_null(Paseador::Descripcion, 500))
                    .col(boolean(Paseador::Activado).not_null())
                    .col(integer(Paseador::CodigoUsuario).unique_key().not_null())
                    .col(integer_null(Paseador::CodigoUbicacion))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_paseador_usuario")
                            .from(Paseador::Table, Paseador::CodigoUsuario)
                            .to(Usuario::Table, Usuario::CodigoUsuario)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_paseador_ubicacion")
                            .from(Paseador::Table, Paseador::CodigoUbicacion)
                            .to(Ubicacion::Table, Ubicacion::CodigoUbicacion)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tutor::Table)
                    .if_not_exists()
                    .col(pk_auto(Tutor::CodigoTutor))
                    .col(string_len(Tutor::Rut, 11).not_null())
                    .col(string_len(Tutor::Dv, 1).not_null())
                    .col(string_len(Tutor::Nombre, 20).not_null())
                    .col(string_len(Tutor::Apellido, 20).not_null())
                    .col(string_len(Tutor::Telefono, 11).not_null())
                    .col(integer(Tutor::CodigoUsuario).unique_key().not_null())
                    .col(integer_null(Tutor::CodigoUbicacion))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tutor_usuario")
                            .from(Tutor::Table, Tutor::CodigoUsuario)
                            .to(Usuario::Table, Usuario::CodigoUsuario)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tutor_ubicacion")
                            .from(Tutor::Table, Tutor::CodigoUbicacion)
                            .to(Ubicacion::Table, Ubicacion::CodigoUbicacion)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tutor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Paseador::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Administrador::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Usuario::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Usuario { Table, CodigoUsuario, Email, Password, PasswordAlgorithm, Token, CodigoRol, CodigoImagen }

#[derive(DeriveIden)]
enum Administrador { Table, CodigoAdministrador, Nombre, Apellido, CodigoUsuario }

#[derive(DeriveIden)]
enum Paseador {
    Table,
    CodigoPaseador,
    Rut,
    Dv,
    Nombre,
    Apellido,
    Telefono,
    Descripcion,
    Activado,
    CodigoUsuario,
    CodigoUbicacion,
}

#[derive(DeriveIden)]
enum Tutor { Table, CodigoTutor, Rut, Dv, Nombre, Apellido, Telefono, CodigoUsuario, CodigoUbicacion }

#[derive(DeriveIden)]
enum Rol { Table, CodigoRol }

#[derive(DeriveIden)]
enum Imagen { Table, CodigoImagen }

#[derive(DeriveIden)]
enum Ubicacion { Table, CodigoUbicacion }
