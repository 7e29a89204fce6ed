use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Free-text intake date as typed by the user
    pub fecha: String,

    pub cliente: String,

    pub contacto: Option<String>,

    pub equipo: String,

    pub marca: Option<String>,

    pub modelo: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub falla: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub diagnostico: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub trabajo: Option<String>,

    pub estado: String,

    /// Owning technician, fixed at creation
    pub tecnico_id: Option<i32>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TecnicoId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Technician,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technician.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
