use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub year: i32,
    pub department_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, year: i32, department_id: i64) -> Result<Model, DbErr> {
        let batch = ActiveModel {
            year: Set(year),
            department_id: Set(department_id),
            ..Default::default()
        };
        batch.insert(db).await
    }

    pub async fn get_by_year_and_department(
        db: &DbConn,
        year: i32,
        department_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Year.eq(year))
            .filter(Column::DepartmentId.eq(department_id))
            .one(db)
            .await
    }
}
