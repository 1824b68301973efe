use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One student's presence at one lecture. The (student, lecture) pair is
/// unique; every marking path goes through the helpers below so a repeat
/// scan never produces a second row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub lecture_id: i64,
    pub recorded_at: DateTime<Utc>,
    pub status: Status,
    /// Scanner that reported the student, when hardware-marked.
    pub device_id: Option<String>,
    pub is_manual_override: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "excused")]
    Excused,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::lecture::Entity",
        from = "Column::LectureId",
        to = "super::lecture::Column::Id"
    )]
    Lecture,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::lecture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lecture.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn get_for(
        db: &DbConn,
        student_id: i64,
        lecture_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::LectureId.eq(lecture_id))
            .one(db)
            .await
    }

    /// Records a hardware scan. Returns `true` when a new row was
    /// created and `false` when the student was already marked for the
    /// lecture (the scan is then a no-op).
    pub async fn mark_scan(
        db: &DbConn,
        student_id: i64,
        lecture_id: i64,
        device_id: &str,
    ) -> Result<bool, DbErr> {
        if Self::get_for(db, student_id, lecture_id).await?.is_some() {
            return Ok(false);
        }

        let record = ActiveModel {
            student_id: Set(student_id),
            lecture_id: Set(lecture_id),
            recorded_at: Set(Utc::now()),
            status: Set(Status::Present),
            device_id: Set(Some(device_id.to_owned())),
            is_manual_override: Set(false),
            ..Default::default()
        };
        record.insert(db).await?;
        Ok(true)
    }

    /// Marks the calling student present from their phone. Duplicate
    /// marks surface as `DbErr::Custom` for the handler to map to 400.
    pub async fn mark_mobile(
        db: &DbConn,
        student_id: i64,
        lecture_id: i64,
    ) -> Result<Model, DbErr> {
        if Self::get_for(db, student_id, lecture_id).await?.is_some() {
            return Err(DbErr::Custom("Attendance already recorded".into()));
        }

        let record = ActiveModel {
            student_id: Set(student_id),
            lecture_id: Set(lecture_id),
            recorded_at: Set(Utc::now()),
            status: Set(Status::Present),
            device_id: Set(None),
            is_manual_override: Set(false),
            ..Default::default()
        };
        record.insert(db).await
    }

    /// Teacher correction. Upserts on the (student, lecture) key: an
    /// existing row has its status replaced rather than duplicated.
    pub async fn override_mark(
        db: &DbConn,
        student_id: i64,
        lecture_id: i64,
        status: Status,
    ) -> Result<Model, DbErr> {
        match Self::get_for(db, student_id, lecture_id).await? {
            Some(existing) => {
                let record = ActiveModel {
                    id: Set(existing.id),
                    status: Set(status),
                    is_manual_override: Set(true),
                    ..Default::default()
                };
                record.update(db).await
            }
            None => {
                let record = ActiveModel {
                    student_id: Set(student_id),
                    lecture_id: Set(lecture_id),
                    recorded_at: Set(Utc::now()),
                    status: Set(status),
                    device_id: Set(None),
                    is_manual_override: Set(true),
                    ..Default::default()
                };
                record.insert(db).await
            }
        }
    }

    pub async fn count_for_lecture(db: &DbConn, lecture_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::LectureId.eq(lecture_id))
            .count(db)
            .await
    }

    pub async fn list_for_lecture(db: &DbConn, lecture_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::LectureId.eq(lecture_id))
            .order_by_asc(Column::RecordedAt)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::{Model as Record, Status};
    use crate::models::{classroom, course, department, lecture, semester, user};
    use crate::test_utils::setup_test_db;
    use sea_orm::DatabaseConnection;

    async fn seed_lecture(db: &DatabaseConnection) -> (i64, i64) {
        let dept = department::Model::create(db, "Mechanical", "ME").await.unwrap();
        let sem = semester::Model::create(db, 1, true).await.unwrap();
        let course = course::Model::create(db, "Statics", "ME101", dept.id, sem.id)
            .await
            .unwrap();
        let room = classroom::Model::create(db, "B12", 80, Some("ESP_ROOM_B12"))
            .await
            .unwrap();
        let teacher = user::Model::create(
            db,
            "t-b12",
            "tb12@example.edu",
            "pw",
            user::Role::Teacher,
            "Sam",
            "Khumalo",
        )
        .await
        .unwrap();
        let student = user::Model::create(
            db,
            "2526B071",
            "2526b071@example.edu",
            "pw",
            user::Role::Student,
            "Tina",
            "Moyo",
        )
        .await
        .unwrap();
        let lecture = lecture::Model::start(db, course.id, room.id, teacher.id)
            .await
            .unwrap();
        (student.id, lecture.id)
    }

    #[tokio::test]
    async fn scan_marks_once_then_noops() {
        let db = setup_test_db().await;
        let (student_id, lecture_id) = seed_lecture(&db).await;

        let created = Record::mark_scan(&db, student_id, lecture_id, "ESP_ROOM_B12")
            .await
            .unwrap();
        assert!(created);

        // Re-scan of the same card in the same lecture is a no-op.
        let created_again = Record::mark_scan(&db, student_id, lecture_id, "ESP_ROOM_B12")
            .await
            .unwrap();
        assert!(!created_again);

        assert_eq!(Record::count_for_lecture(&db, lecture_id).await.unwrap(), 1);
        let row = Record::get_for(&db, student_id, lecture_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.status, Status::Present);
        assert_eq!(row.device_id.as_deref(), Some("ESP_ROOM_B12"));
        assert!(!row.is_manual_override);
    }

    #[tokio::test]
    async fn mobile_duplicate_is_an_error() {
        let db = setup_test_db().await;
        let (student_id, lecture_id) = seed_lecture(&db).await;

        Record::mark_mobile(&db, student_id, lecture_id).await.unwrap();
        let dup = Record::mark_mobile(&db, student_id, lecture_id).await;
        assert!(matches!(dup, Err(sea_orm::DbErr::Custom(_))));
    }

    #[tokio::test]
    async fn override_updates_existing_row_in_place() {
        let db = setup_test_db().await;
        let (student_id, lecture_id) = seed_lecture(&db).await;

        Record::mark_scan(&db, student_id, lecture_id, "ESP_ROOM_B12")
            .await
            .unwrap();
        let updated = Record::override_mark(&db, student_id, lecture_id, Status::Excused)
            .await
            .unwrap();

        assert_eq!(updated.status, Status::Excused);
        assert!(updated.is_manual_override);
        assert_eq!(Record::count_for_lecture(&db, lecture_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn override_inserts_when_absent() {
        let db = setup_test_db().await;
        let (student_id, lecture_id) = seed_lecture(&db).await;

        let row = Record::override_mark(&db, student_id, lecture_id, Status::Late)
            .await
            .unwrap();
        assert_eq!(row.status, Status::Late);
        assert!(row.is_manual_override);
        assert!(row.device_id.is_none());
    }
}
