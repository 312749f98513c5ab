use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "procesos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nombre: String,
    #[sea_orm(column_type = "Text")]
    pub descripcion: String,
    pub estandar: String,
    pub marca: String,
    pub modelo: String,
    pub serie: String,
    pub resolucion: String,
    pub intervalo_indicacion: String,
    /// Stored as `dd/mm/yyyy`
    pub calibrado_patron: String,
    pub prox_calibracion_patron: String,
    pub fecha_verificacion: String,
    pub proxima_verificacion: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subprocesos::Entity")]
    Subprocesos,
    #[sea_orm(has_many = "super::sensores::Entity")]
    Sensores,
}

impl Related<super::subprocesos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subprocesos.def()
    }
}

impl Related<super::sensores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
