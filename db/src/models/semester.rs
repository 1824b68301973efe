use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "semesters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub number: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course::Entity")]
    Courses,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(db: &DbConn, number: i32, is_active: bool) -> Result<Model, DbErr> {
        let semester = ActiveModel {
            number: Set(number),
            is_active: Set(is_active),
            ..Default::default()
        };
        semester.insert(db).await
    }

    pub async fn current_active(db: &DbConn) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Number)
            .one(db)
            .await
    }

    /// Marks one semester active and deactivates all the others.
    pub async fn activate(db: &DbConn, id: i64) -> Result<Model, DbErr> {
        use sea_orm::sea_query::Expr;

        Entity::update_many()
            .col_expr(Column::IsActive, Expr::value(false))
            .exec(db)
            .await?;

        let semester = ActiveModel {
            id: Set(id),
            is_active: Set(true),
            ..Default::default()
        };
        semester.update(db).await
    }
}
