use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subprocesos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Consecutive number within the parent process
    pub id_subproceso: Option<i32>,
    pub proceso_id: i32,
    pub nombre: String,
    #[sea_orm(column_type = "Text")]
    pub descripcion: String,
    /// Decimal text, at most 2 fractional digits
    pub valor_referencia: String,
    /// Decimal text, at most 4 fractional digits
    pub incertidumbre_patron: String,
    pub estatus: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::procesos::Entity",
        from = "Column::ProcesoId",
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
