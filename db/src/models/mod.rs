pub mod attendance_record;
pub mod batch;
pub mod classroom;
pub mod course;
pub mod department;
pub mod lecture;
pub mod semester;
pub mod student_profile;
pub mod teacher_profile;
pub mod timetable_slot;
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use batch::Entity as Batch;
pub use classroom::Entity as Classroom;
pub use course::Entity as Course;
pub use department::Entity as Department;
pub use lecture::Entity as Lecture;
pub use semester::Entity as Semester;
pub use student_profile::Entity as StudentProfile;
pub use teacher_profile::Entity as TeacherProfile;
pub use timetable_slot::Entity as TimetableSlot;
pub use user::Entity as User;
