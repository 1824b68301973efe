use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};
use uuid::Uuid;

use super::timetable_slot;

/// One concrete meeting of a course, either started manually by the
/// teacher or auto-materialized from the timetable when a scanner
/// reports activity in the room.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "lectures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub classroom_id: i64,
    pub teacher_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub session_token: String,
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
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
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

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Starts an active lecture with a fresh session token.
    pub async fn start(
        db: &DbConn,
        course_id: i64,
        classroom_id: i64,
        teacher_id: i64,
    ) -> Result<Model, DbErr> {
        let lecture = ActiveModel {
            course_id: Set(course_id),
            classroom_id: Set(classroom_id),
            teacher_id: Set(teacher_id),
            start_time: Set(Utc::now()),
            end_time: Set(None),
            is_active: Set(true),
            session_token: Set(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        lecture.insert(db).await
    }

    /// Ends a lecture: deactivates it and stamps the end time.
    pub async fn end(db: &DbConn, id: i64) -> Result<Model, DbErr> {
        let lecture = ActiveModel {
            id: Set(id),
            is_active: Set(false),
            end_time: Set(Some(Utc::now())),
            ..Default::default()
        };
        lecture.update(db).await
    }

    pub async fn get_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_active_for_classroom(
        db: &DbConn,
        classroom_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::IsActive.eq(true))
            .one(db)
            .await
    }

    pub async fn find_active_for_teacher(
        db: &DbConn,
        teacher_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::StartTime)
            .all(db)
            .await
    }

    pub async fn find_by_session_token(
        db: &DbConn,
        session_token: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::SessionToken.eq(session_token))
            .one(db)
            .await
    }

    /// Resolves the lecture in session for a classroom at `now` (local
    /// wall-clock time, passed in so the lookup is deterministic).
    ///
    /// Order of precedence:
    /// 1. a lecture already running in the room (manually started or
    ///    previously auto-started),
    /// 2. a timetable slot covering (weekday, time-of-day) for the room,
    ///    which is materialized into a new active lecture,
    /// 3. nothing scheduled: `Ok(None)`.
    pub async fn resolve_for_classroom(
        db: &DbConn,
        classroom_id: i64,
        now: NaiveDateTime,
    ) -> Result<Option<Model>, DbErr> {
        if let Some(active) = Self::find_active_for_classroom(db, classroom_id).await? {
            return Ok(Some(active));
        }

        let day_of_week = now.weekday().num_days_from_monday() as i32;
        let slot =
            timetable_slot::Model::find_covering(db, classroom_id, day_of_week, now.time()).await?;

        match slot {
            Some(slot) => {
                let lecture =
                    Self::start(db, slot.course_id, slot.classroom_id, slot.teacher_id).await?;
                tracing::info!(
                    lecture_id = lecture.id,
                    classroom_id,
                    course_id = slot.course_id,
                    "auto-started lecture from timetable slot"
                );
                Ok(Some(lecture))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Model as Lecture;
    use crate::models::{classroom, course, department, semester, timetable_slot, user};
    use crate::test_utils::setup_test_db;
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm::DatabaseConnection;

    struct Fixture {
        course_id: i64,
        room_id: i64,
        teacher_id: i64,
    }

    async fn seed(db: &DatabaseConnection) -> Fixture {
        let dept = department::Model::create(db, "Electronics", "EC").await.unwrap();
        let sem = semester::Model::create(db, 2, true).await.unwrap();
        let course = course::Model::create(db, "Signals", "EC201", dept.id, sem.id)
            .await
            .unwrap();
        let room = classroom::Model::create(db, "204", 60, Some("ESP_ROOM_204"))
            .await
            .unwrap();
        let teacher = user::Model::create(
            db,
            "t-204",
            "t204@example.edu",
            "pw",
            user::Role::Teacher,
            "Ravi",
            "Iyer",
        )
        .await
        .unwrap();
        Fixture {
            course_id: course.id,
            room_id: room.id,
            teacher_id: teacher.id,
        }
    }

    // Wednesday 2026-08-26
    fn wednesday_at(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 26)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[tokio::test]
    async fn resolve_prefers_manually_started_lecture() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;

        let started = Lecture::start(&db, fx.course_id, fx.room_id, fx.teacher_id)
            .await
            .unwrap();
        assert!(started.is_active);

        let resolved = Lecture::resolve_for_classroom(&db, fx.room_id, wednesday_at(9, 30))
            .await
            .unwrap()
            .expect("active lecture should resolve");
        assert_eq!(resolved.id, started.id);
    }

    #[tokio::test]
    async fn resolve_auto_starts_from_timetable() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;

        timetable_slot::Model::create(
            &db,
            2, // Wednesday
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            fx.course_id,
            fx.room_id,
            fx.teacher_id,
            "A",
        )
        .await
        .unwrap();

        let resolved = Lecture::resolve_for_classroom(&db, fx.room_id, wednesday_at(9, 30))
            .await
            .unwrap()
            .expect("slot should auto-start a lecture");
        assert!(resolved.is_active);
        assert_eq!(resolved.course_id, fx.course_id);
        assert_eq!(resolved.teacher_id, fx.teacher_id);

        // Resolving again reuses the auto-started lecture instead of
        // creating a second one.
        let again = Lecture::resolve_for_classroom(&db, fx.room_id, wednesday_at(9, 45))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.id, resolved.id);
    }

    #[tokio::test]
    async fn resolve_returns_none_outside_schedule() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;

        timetable_slot::Model::create(
            &db,
            2,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            fx.course_id,
            fx.room_id,
            fx.teacher_id,
            "A",
        )
        .await
        .unwrap();

        // Same day, after the slot ended
        let resolved = Lecture::resolve_for_classroom(&db, fx.room_id, wednesday_at(14, 0))
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn end_deactivates_and_stamps_end_time() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;

        let lecture = Lecture::start(&db, fx.course_id, fx.room_id, fx.teacher_id)
            .await
            .unwrap();
        let ended = Lecture::end(&db, lecture.id).await.unwrap();

        assert!(!ended.is_active);
        assert!(ended.end_time.is_some());
        assert!(
            Lecture::find_active_for_classroom(&db, fx.room_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn session_tokens_are_unique_per_lecture() {
        let db = setup_test_db().await;
        let fx = seed(&db).await;

        let a = Lecture::start(&db, fx.course_id, fx.room_id, fx.teacher_id)
            .await
            .unwrap();
        Lecture::end(&db, a.id).await.unwrap();
        let b = Lecture::start(&db, fx.course_id, fx.room_id, fx.teacher_id)
            .await
            .unwrap();

        assert_ne!(a.session_token, b.session_token);
        let by_token = Lecture::find_by_session_token(&db, &b.session_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_token.id, b.id);
    }
}
