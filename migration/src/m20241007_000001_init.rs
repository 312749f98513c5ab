use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== PROCESOS ==========
        manager
            .create_table(
                Table::create()
                    .table(Procesos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Procesos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Procesos::Nombre).string_len(255).not_null())
                    .col(ColumnDef::new(Procesos::Descripcion).text().not_null())
                    .col(ColumnDef::new(Procesos::Estandar).string_len(255).not_null())
                    .col(ColumnDef::new(Procesos::Marca).string_len(255).not_null())
                    .col(ColumnDef::new(Procesos::Modelo).string_len(255).not_null())
                    .col(ColumnDef::new(Procesos::Serie).string_len(255).not_null())
                    .col(ColumnDef::new(Procesos::Resolucion).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Procesos::IntervaloIndicacion)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Procesos::CalibradoPatron)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Procesos::ProxCalibracionPatron)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Procesos::FechaVerificacion)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Procesos::ProximaVerificacion)
                            .string_len(64)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SUBPROCESOS ==========
        // Children are removed by the application before their parent, so the
        // foreign keys keep the default NO ACTION behaviour.
        manager
            .create_table(
                Table::create()
                    .table(Subprocesos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subprocesos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subprocesos::IdSubproceso).integer())
                    .col(ColumnDef::new(Subprocesos::ProcesoId).integer().not_null())
                    .col(ColumnDef::new(Subprocesos::Nombre).string_len(255).not_null())
                    .col(ColumnDef::new(Subprocesos::Descripcion).text().not_null())
                    .col(
                        ColumnDef::new(Subprocesos::ValorReferencia)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subprocesos::IncertidumbrePatron)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subprocesos::Estatus)
                            .string_len(32)
                            .not_null()
                            .default("0"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subprocesos_proceso")
                            .from(Subprocesos::Table, Subprocesos::ProcesoId)
                            .to(Procesos::Table, Procesos::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subprocesos_proceso_id")
                    .table(Subprocesos::Table)
                    .col(Subprocesos::ProcesoId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // ========== SENSORES ==========
        manager
            .create_table(
                Table::create()
                    .table(Sensores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sensores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sensores::IdProceso).integer())
                    .col(ColumnDef::new(Sensores::NombreSensor).string_len(255))
                    .col(ColumnDef::new(Sensores::MacAddress).string_len(17).not_null())
                    .col(ColumnDef::new(Sensores::Instrumento).string_len(255).not_null())
                    .col(ColumnDef::new(Sensores::Marca).string_len(255).not_null())
                    .col(ColumnDef::new(Sensores::Modelo).string_len(255).not_null())
                    .col(ColumnDef::new(Sensores::Serie).string_len(255).not_null())
                    .col(ColumnDef::new(Sensores::Resolucion).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Sensores::IntervaloIndicacion)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sensores::Emp).string_len(64).not_null())
                    .col(ColumnDef::new(Sensores::TempInicial).string_len(64).not_null())
                    .col(ColumnDef::new(Sensores::TempFinal).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Sensores::HumedadRelativaInicial)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sensores::HumedadRelativaFinal)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sensores::PresionAtmosferica)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sensores::NumeroInforme)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensores_proceso")
                            .from(Sensores::Table, Sensores::IdProceso)
                            .to(Procesos::Table, Procesos::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensores_id_proceso")
                    .table(Sensores::Table)
                    .col(Sensores::IdProceso)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sensores::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subprocesos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Procesos::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Procesos {
    Table,
    Id,
    Nombre,
    Descripcion,
    Estandar,
    Marca,
    Modelo,
    Serie,
    Resolucion,
    IntervaloIndicacion,
    CalibradoPatron,
    ProxCalibracionPatron,
    FechaVerificacion,
    ProximaVerificacion,
}

#[derive(DeriveIden)]
enum Subprocesos {
    Table,
    Id,
    IdSubproceso,
    ProcesoId,
    Nombre,
    Descripcion,
    ValorReferencia,
    IncertidumbrePatron,
    Estatus,
}

#[derive(DeriveIden)]
enum Sensores {
    Table,
    Id,
    IdProceso,
    NombreSensor,
    MacAddress,
    Instrumento,
    Marca,
    Modelo,
    Serie,
    Resolucion,
    IntervaloIndicacion,
    Emp,
    TempInicial,
    TempFinal,
    HumedadRelativaInicial,
    HumedadRelativaFinal,
    PresionAtmosferica,
    NumeroInforme,
}
