use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub id_proceso: Option<i32>,
    pub nombre_sensor: Option<String>,
    /// Canonical lowercase, colon-delimited form
    pub mac_address: String,
    pub instrumento: String,
    pub marca: String,
    pub modelo: String,
    pub serie: String,
    pub resolucion: String,
    pub intervalo_indicacion: String,
    pub emp: String,
    pub temp_inicial: String,
    pub temp_final: String,
    pub humedad_relativa_inicial: String,
    pub humedad_relativa_final: String,
    pub presion_atmosferica: String,
    pub numero_informe: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::procesos::Entity",
        from = "Column::IdProceso",
        to = "super::procesos::Column::Id"
    )]
    Proceso,
}

impl Related<super::procesos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proceso.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
