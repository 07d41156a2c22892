pub mod m202608030001_create_students;
pub mod m202608030002_create_attendance_events;
