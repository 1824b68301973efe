//! Scan-batch ingestion: the decision logic behind `POST /hardware/scan`.
//!
//! Given a scanner's device id and the student identifiers it saw,
//! resolve the classroom, resolve the lecture in session (explicitly
//! started, or auto-started from the weekly timetable), and record
//! attendance exactly once per (student, lecture).

use chrono::NaiveDateTime;
use sea_orm::{DbConn, DbErr, EntityTrait};
use thiserror::Error;

use crate::models::{attendance_record, classroom, course, lecture, user};

#[derive(Debug, Error)]
pub enum ScanError {
    /// Device id not bound to any classroom.
    #[error("Device {0} not registered to any room")]
    UnknownDevice(String),
    #[error("Missing device_id or scans")]
    EmptyBatch,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// What happened to a batch that reached a classroom.
#[derive(Debug)]
pub enum ScanOutcome {
    /// No active lecture and no timetable slot covering now; the scans
    /// were deliberately dropped.
    NoScheduledClass,
    Marked(ScanSummary),
}

#[derive(Debug)]
pub struct ScanSummary {
    pub lecture_id: i64,
    pub course_name: String,
    /// Records created by this batch (repeat scans don't count).
    pub marked_new: u64,
    /// Total records for the lecture after the batch.
    pub total_present: u64,
    /// Scanned identifiers that matched no known student.
    pub unknown_ids: Vec<String>,
}

/// Processes one scan batch at wall-clock instant `now`.
///
/// Unknown student identifiers are collected and reported rather than
/// failing the batch; an unknown device fails the whole request.
pub async fn ingest_scan_batch(
    db: &DbConn,
    device_id: &str,
    scans: &[String],
    now: NaiveDateTime,
) -> Result<ScanOutcome, ScanError> {
    if device_id.is_empty() || scans.is_empty() {
        return Err(ScanError::EmptyBatch);
    }

    let room = classroom::Model::get_by_device_id(db, device_id)
        .await?
        .ok_or_else(|| ScanError::UnknownDevice(device_id.to_owned()))?;

    let Some(lecture) = lecture::Model::resolve_for_classroom(db, room.id, now).await? else {
        tracing::debug!(device_id, classroom_id = room.id, "no class scheduled, scans ignored");
        return Ok(ScanOutcome::NoScheduledClass);
    };

    let mut marked_new = 0u64;
    let mut unknown_ids = Vec::new();

    for roll_no in scans {
        match user::Model::get_by_username(db, roll_no).await? {
            Some(student) => {
                if attendance_record::Model::mark_scan(db, student.id, lecture.id, device_id)
                    .await?
                {
                    marked_new += 1;
                }
            }
            None => {
                tracing::warn!(roll_no, device_id, "unknown student id scanned");
                unknown_ids.push(roll_no.clone());
            }
        }
    }

    let total_present = attendance_record::Model::count_for_lecture(db, lecture.id).await?;
    let course_name = course::Entity::find_by_id(lecture.course_id)
        .one(db)
        .await?
        .map(|c| c.name)
        .unwrap_or_default();

    Ok(ScanOutcome::Marked(ScanSummary {
        lecture_id: lecture.id,
        course_name,
        marked_new,
        total_present,
        unknown_ids,
    }))
}
