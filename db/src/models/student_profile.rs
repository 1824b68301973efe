use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "student_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub roll_no: String,
    pub department_id: i64,
    pub batch_id: i64,
    pub current_semester_id: Option<i64>,
    pub division: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
    #[sea_orm(
        belongs_to = "super::semester::Entity",
        from = "Column::CurrentSemesterId",
        to = "super::semester::Column::Id"
    )]
    CurrentSemester,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        user_id: i64,
        roll_no: &str,
        department_id: i64,
        batch_id: i64,
        current_semester_id: Option<i64>,
        division: &str,
    ) -> Result<Model, DbErr> {
        let profile = ActiveModel {
            user_id: Set(user_id),
            roll_no: Set(roll_no.to_owned()),
            department_id: Set(department_id),
            batch_id: Set(batch_id),
            current_semester_id: Set(current_semester_id),
            division: Set(division.to_owned()),
            ..Default::default()
        };
        profile.insert(db).await
    }

    pub async fn get_by_user_id(db: &DbConn, user_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await
    }

    pub async fn get_by_roll_no(db: &DbConn, roll_no: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::RollNo.eq(roll_no))
            .one(db)
            .await
    }
}
