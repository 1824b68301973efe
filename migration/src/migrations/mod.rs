pub mod m202608250001_create_users;
pub mod m202608250002_create_departments;
pub mod m202608250003_create_semesters;
pub mod m202608250004_create_classrooms;
pub mod m202608250005_create_courses;
pub mod m202608250006_create_profiles;
pub mod m202608250007_create_timetable_slots;
pub mod m202608250008_create_lectures;
pub mod m202608250009_create_attendance_records;
