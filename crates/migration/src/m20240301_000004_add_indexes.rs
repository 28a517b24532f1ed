use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Mascota: listing by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_mascota_tutor")
                    .table(Mascota::Table)
                    .col(Mascota::CodigoTutor)
                    .to_owned(),
            )
            .await?;

        // Mascota: duplicate lookup narrows on owner + name first
        manager
            .create_index(
                Index::create()
                    .name("idx_mascota_tutor_nombre")
                    .table(Mascota::Table)
                    .col(Mascota::CodigoTutor)
                    .col(Mascota::Nombre)
                    .to_owned(),
            )
            .await?;

        // GrupoEtario: range lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_grupo_etario_rango")
                    .table(GrupoEtario::Table)
                    .col(GrupoEtario::EdadInferior)
                    .col(GrupoEtario::EdadSuperior)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_grupo_etario_rango").table(GrupoEtario::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_mascota_tutor_nombre").table(Mascota::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_mascota_tutor").table(Mascota::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Mascota { Table, CodigoTutor, Nombre }

#[derive(DeriveIden)]
enum GrupoEtario { Table, EdadInferior, EdadSuperior }
