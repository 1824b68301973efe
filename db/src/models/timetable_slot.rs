use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

/// A recurring weekly slot. `day_of_week` runs 0 = Monday .. 6 = Sunday,
/// matching `chrono::Weekday::num_days_from_monday`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "timetable_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub course_id: i64,
    pub classroom_id: i64,
    pub teacher_id: i64,
    pub division: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::classroom::Entity",
        from = "Column::ClassroomId",
        to = "super::classroom::Column::Id"
    )]
    Classroom,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        day_of_week: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
        course_id: i64,
        classroom_id: i64,
        teacher_id: i64,
        division: &str,
    ) -> Result<Model, DbErr> {
        let slot = ActiveModel {
            day_of_week: Set(day_of_week),
            start_time: Set(start_time),
            end_time: Set(end_time),
            course_id: Set(course_id),
            classroom_id: Set(classroom_id),
            teacher_id: Set(teacher_id),
            division: Set(division.to_owned()),
            ..Default::default()
        };
        slot.insert(db).await
    }

    /// Finds the slot scheduled in `classroom_id` that covers the given
    /// weekday and time of day. Both boundaries are inclusive.
    pub async fn find_covering(
        db: &DbConn,
        classroom_id: i64,
        day_of_week: i32,
        at: NaiveTime,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::DayOfWeek.eq(day_of_week))
            .filter(Column::StartTime.lte(at))
            .filter(Column::EndTime.gte(at))
            .one(db)
            .await
    }

    /// All slots, ordered for the weekly overview.
    pub async fn list_ordered(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartTime)
            .all(db)
            .await
    }

    /// A division's slots for one weekday, ordered by start time.
    pub async fn list_for_day_and_division(
        db: &DbConn,
        day_of_week: i32,
        division: &str,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::DayOfWeek.eq(day_of_week))
            .filter(Column::Division.eq(division))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::Model as Slot;
    use crate::models::{classroom, course, department, semester, user};
    use crate::test_utils::setup_test_db;
    use chrono::NaiveTime;
    use sea_orm::DatabaseConnection;

    async fn seed(db: &DatabaseConnection) -> (i64, i64, i64) {
        let dept = department::Model::create(db, "Computer Science", "CS")
            .await
            .unwrap();
        let sem = semester::Model::create(db, 4, true).await.unwrap();
        let course = course::Model::create(db, "Databases", "CS204", dept.id, sem.id)
            .await
            .unwrap();
        let room = classroom::Model::create(db, "101", 60, Some("ESP_ROOM_101"))
            .await
            .unwrap();
        let teacher = user::Model::create(
            db,
            "t-100",
            "t100@example.edu",
            "pw",
            user::Role::Teacher,
            "Grace",
            "Dlamini",
        )
        .await
        .unwrap();
        (course.id, room.id, teacher.id)
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn find_covering_matches_inclusive_bounds() {
        let db = setup_test_db().await;
        let (course_id, room_id, teacher_id) = seed(&db).await;

        let slot = Slot::create(&db, 0, t(9, 0), t(10, 0), course_id, room_id, teacher_id, "A")
            .await
            .unwrap();

        for at in [t(9, 0), t(9, 30), t(10, 0)] {
            let found = Slot::find_covering(&db, room_id, 0, at).await.unwrap();
            assert_eq!(found.as_ref().map(|s| s.id), Some(slot.id));
        }

        assert!(Slot::find_covering(&db, room_id, 0, t(8, 59))
            .await
            .unwrap()
            .is_none());
        assert!(Slot::find_covering(&db, room_id, 0, t(10, 1))
            .await
            .unwrap()
            .is_none());
        // Wrong weekday
        assert!(Slot::find_covering(&db, room_id, 1, t(9, 30))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_day_start_classroom_rejected() {
        let db = setup_test_db().await;
        let (course_id, room_id, teacher_id) = seed(&db).await;

        Slot::create(&db, 2, t(11, 0), t(12, 0), course_id, room_id, teacher_id, "A")
            .await
            .unwrap();
        let dup = Slot::create(&db, 2, t(11, 0), t(13, 0), course_id, room_id, teacher_id, "B").await;
        assert!(dup.is_err());
    }
}
