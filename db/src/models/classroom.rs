use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// A physical room. `esp_device_id` links the ESP32 scanner mounted in it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub room_number: String,
    pub capacity: i32,
    pub esp_device_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lecture::Entity")]
    Lectures,
    #[sea_orm(has_many = "super::timetable_slot::Entity")]
    TimetableSlots,
}

impl Related<super::lecture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lectures.def()
    }
}

impl Related<super::timetable_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimetableSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        room_number: &str,
        capacity: i32,
        esp_device_id: Option<&str>,
    ) -> Result<Model, DbErr> {
        let classroom = ActiveModel {
            room_number: Set(room_number.to_owned()),
            capacity: Set(capacity),
            esp_device_id: Set(esp_device_id.map(str::to_owned)),
            ..Default::default()
        };
        classroom.insert(db).await
    }

    pub async fn get_by_device_id(db: &DbConn, device_id: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::EspDeviceId.eq(device_id))
            .one(db)
            .await
    }

    /// Binds (or re-binds) the room's scanner device id.
    pub async fn bind_device(db: &DbConn, id: i64, device_id: &str) -> Result<Model, DbErr> {
        let classroom = ActiveModel {
            id: Set(id),
            esp_device_id: Set(Some(device_id.to_owned())),
            ..Default::default()
        };
        classroom.update(db).await
    }
}
