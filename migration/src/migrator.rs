use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608250001_create_users::Migration),
            Box::new(migrations::m202608250002_create_departments::Migration),
            Box::new(migrations::m202608250003_create_semesters::Migration),
            Box::new(migrations::m202608250004_create_classrooms::Migration),
            Box::new(migrations::m202608250005_create_courses::Migration),
            Box::new(migrations::m202608250006_create_profiles::Migration),
            Box::new(migrations::m202608250007_create_timetable_slots::Migration),
            Box::new(migrations::m202608250008_create_lectures::Migration),
            Box::new(migrations::m202608250009_create_attendance_records::Migration),
        ]
    }
}
