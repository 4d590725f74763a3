pub mod announcement;
pub mod class;
pub mod course;
pub mod user;

pub use announcement::{Announcement, NewAnnouncement};
pub use class::{Class, ClassContent, ClassKind, ClassPatch, NewClass, VideoFile};
pub use course::{Course, CourseIcon, CoursePatch, NewCourse};
pub use user::{NewStudent, Role, StudentPatch, User};
