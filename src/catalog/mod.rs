//! In-memory catalog: courses, classes, announcements and students.
//!
//! Every mutator requires an [`AdminGrant`] and reports a missing id as
//! `CatalogError::NotFound` instead of silently doing nothing.

pub mod seed;

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::access::AdminGrant;
use crate::domain::{
    Announcement, Class, ClassPatch, Course, CoursePatch, NewAnnouncement, NewClass, NewCourse,
    NewStudent, Role, StudentPatch, User,
};
use crate::error::{CatalogError, RecordKind};

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Generate a fresh opaque record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Record counts for the admin overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub courses: usize,
    pub classes: usize,
    pub announcements: usize,
    pub students: usize,
    pub students_with_class_access: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    classes: Vec<Class>,
    announcements: Vec<Announcement>,
    students: Vec<User>,
    /// Fixture-supplied admin accounts, not editable through the catalog
    admins: Vec<User>,
}

impl Catalog {
    /// Build a catalog from existing records (fixtures or tests).
    pub fn from_parts(
        courses: Vec<Course>,
        classes: Vec<Class>,
        announcements: Vec<Announcement>,
        students: Vec<User>,
        admins: Vec<User>,
    ) -> Self {
        Self {
            courses,
            classes,
            announcements,
            students,
            admins,
        }
    }

    // ==================== Reads ====================

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    /// Most recent first
    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    pub fn students(&self) -> &[User] {
        &self.students
    }

    pub fn admins(&self) -> &[User] {
        &self.admins
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn student(&self, id: &str) -> Option<&User> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Any account, admin or student
    pub fn user(&self, id: &str) -> Option<&User> {
        self.admins
            .iter()
            .chain(self.students.iter())
            .find(|u| u.id == id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.admins
            .iter()
            .chain(self.students.iter())
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Class whose video content references the given uploaded file
    pub fn class_with_video(&self, file_id: &str) -> Option<&Class> {
        self.classes
            .iter()
            .find(|c| c.content.video_file().is_some_and(|f| f.id == file_id))
    }

    pub fn classes_in_course(&self, course_id: &str) -> usize {
        self.classes.iter().filter(|c| c.course_id == course_id).count()
    }

    pub fn overview(&self) -> Overview {
        Overview {
            courses: self.courses.len(),
            classes: self.classes.len(),
            announcements: self.announcements.len(),
            students: self.students.len(),
            students_with_class_access: self
                .students
                .iter()
                .filter(|s| s.can_access_classes)
                .count(),
        }
    }

    // ==================== Courses ====================

    pub fn add_course(&mut self, grant: &AdminGrant, data: NewCourse) -> Result<Course> {
        let name = required("name", &data.name)?;
        let course = Course {
            id: new_id(),
            name,
            description: data.description,
            icon: data.icon,
        };
        tracing::info!(
            "Created course {} ({}) by admin {}",
            course.id,
            course.name,
            grant.admin_id()
        );
        self.courses.push(course.clone());
        Ok(course)
    }

    pub fn update_course(
        &mut self,
        _grant: &AdminGrant,
        id: &str,
        patch: CoursePatch,
    ) -> Result<Course> {
        let name = patch.name.as_deref().map(|n| required("name", n)).transpose()?;
        let course = self
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Course, id))?;

        if let Some(name) = name {
            course.name = name;
        }
        if let Some(description) = patch.description {
            course.description = description;
        }
        if let Some(icon) = patch.icon {
            course.icon = icon;
        }
        Ok(course.clone())
    }

    /// Remove a course. Its classes stay in the catalog.
    pub fn delete_course(&mut self, grant: &AdminGrant, id: &str) -> Result<Course> {
        let index = self
            .courses
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Course, id))?;
        let course = self.courses.remove(index);
        tracing::info!("Deleted course {} by admin {}", id, grant.admin_id());
        let orphans = self.classes_in_course(id);
        if orphans > 0 {
            tracing::info!("Deleted course {} leaving {} classes without a course", id, orphans);
        }
        Ok(course)
    }

    // ==================== Classes ====================

    pub fn add_class(&mut self, grant: &AdminGrant, data: NewClass) -> Result<Class> {
        let title = required("title", &data.title)?;
        self.check_course_ref(&data.course_id)?;

        let class = Class {
            id: new_id(),
            title,
            description: data.description,
            course_id: data.course_id,
            content: data.content,
            created_at: Utc::now(),
            updated_at: None,
        };
        tracing::info!(
            "Created {} class {} in course {} by admin {}",
            class.kind(),
            class.id,
            class.course_id,
            grant.admin_id()
        );
        self.classes.push(class.clone());
        Ok(class)
    }

    pub fn update_class(&mut self, _grant: &AdminGrant, id: &str, patch: ClassPatch) -> Result<Class> {
        if !self.classes.iter().any(|c| c.id == id) {
            return Err(CatalogError::not_found(RecordKind::Class, id));
        }
        let title = patch.title.as_deref().map(|t| required("title", t)).transpose()?;
        if let Some(course_id) = &patch.course_id {
            self.check_course_ref(course_id)?;
        }

        let class = self
            .classes
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Class, id))?;
        if let Some(title) = title {
            class.title = title;
        }
        if let Some(description) = patch.description {
            class.description = description;
        }
        if let Some(course_id) = patch.course_id {
            class.course_id = course_id;
        }
        if let Some(content) = patch.content {
            class.content = content;
        }
        class.updated_at = Some(Utc::now());
        Ok(class.clone())
    }

    pub fn delete_class(&mut self, _grant: &AdminGrant, id: &str) -> Result<Class> {
        let index = self
            .classes
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Class, id))?;
        Ok(self.classes.remove(index))
    }

    fn check_course_ref(&self, course_id: &str) -> Result<()> {
        if course_id.trim().is_empty() {
            return Err(CatalogError::validation("course_id", "must not be empty"));
        }
        if self.course(course_id).is_none() {
            return Err(CatalogError::validation(
                "course_id",
                format!("no course with id {}", course_id),
            ));
        }
        Ok(())
    }

    // ==================== Announcements ====================

    pub fn add_announcement(
        &mut self,
        _grant: &AdminGrant,
        data: NewAnnouncement,
    ) -> Result<Announcement> {
        let title = required("title", &data.title)?;
        let announcement = Announcement {
            id: new_id(),
            title,
            content: data.content,
            created_at: Utc::now(),
        };
        self.announcements.insert(0, announcement.clone());
        Ok(announcement)
    }

    pub fn delete_announcement(&mut self, _grant: &AdminGrant, id: &str) -> Result<Announcement> {
        let index = self
            .announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Announcement, id))?;
        Ok(self.announcements.remove(index))
    }

    // ==================== Students ====================

    pub fn add_student(&mut self, grant: &AdminGrant, data: NewStudent) -> Result<User> {
        let name = required("name", &data.name)?;
        let email = self.check_email(&data.email, None)?;

        let student = User {
            id: new_id(),
            name,
            email,
            role: Role::Student,
            can_access_classes: data.can_access_classes,
            course_access: data.course_access.unwrap_or_default().into_iter().collect(),
        };
        tracing::info!(
            "Created student {} <{}> by admin {}",
            student.id,
            student.email,
            grant.admin_id()
        );
        self.students.push(student.clone());
        Ok(student)
    }

    pub fn update_student(
        &mut self,
        _grant: &AdminGrant,
        id: &str,
        patch: StudentPatch,
    ) -> Result<User> {
        if self.student(id).is_none() {
            return Err(CatalogError::not_found(RecordKind::Student, id));
        }
        let name = patch.name.as_deref().map(|n| required("name", n)).transpose()?;
        let email = patch
            .email
            .as_deref()
            .map(|e| self.check_email(e, Some(id)))
            .transpose()?;

        let student = self.student_mut(id)?;
        if let Some(name) = name {
            student.name = name;
        }
        if let Some(email) = email {
            student.email = email;
        }
        if let Some(gate) = patch.can_access_classes {
            student.can_access_classes = gate;
        }
        if let Some(access) = patch.course_access {
            student.course_access = access.into_iter().collect::<BTreeSet<_>>();
        }
        Ok(student.clone())
    }

    pub fn delete_student(&mut self, grant: &AdminGrant, id: &str) -> Result<User> {
        let index = self
            .students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Student, id))?;
        let student = self.students.remove(index);
        tracing::info!(
            "Deleted student {} <{}> by admin {}",
            student.id,
            student.email,
            grant.admin_id()
        );
        Ok(student)
    }

    /// Grant or revoke one course for a student. Both directions are idempotent.
    ///
    /// Granting requires the course to exist; revoking does not, so stale
    /// entries can always be removed.
    pub fn set_course_access(
        &mut self,
        _grant: &AdminGrant,
        student_id: &str,
        course_id: &str,
        granted: bool,
    ) -> Result<User> {
        if granted && self.course(course_id).is_none() {
            return Err(CatalogError::validation(
                "course_id",
                format!("no course with id {}", course_id),
            ));
        }
        let student = self.student_mut(student_id)?;
        if granted {
            student.course_access.insert(course_id.to_string());
        } else {
            student.course_access.remove(course_id);
        }
        tracing::debug!(
            "Course {} access for {} set to {}",
            course_id,
            student_id,
            granted
        );
        Ok(student.clone())
    }

    /// Turn the global class gate on or off for a student.
    pub fn set_class_access(
        &mut self,
        _grant: &AdminGrant,
        student_id: &str,
        enabled: bool,
    ) -> Result<User> {
        let student = self.student_mut(student_id)?;
        student.can_access_classes = enabled;
        Ok(student.clone())
    }

    fn student_mut(&mut self, id: &str) -> Result<&mut User> {
        self.students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::not_found(RecordKind::Student, id))
    }

    /// Normalize and validate an email, rejecting duplicates of other accounts.
    fn check_email(&self, email: &str, except_id: Option<&str>) -> Result<String> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(CatalogError::validation("email", "not a valid e-mail address"));
        }
        if let Some(existing) = self.find_user_by_email(email) {
            if Some(existing.id.as_str()) != except_id {
                return Err(CatalogError::validation("email", "already registered"));
            }
        }
        Ok(email.to_string())
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::validation(field, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Loose check: one '@' with something on both sides and a dot in the domain
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access;
    use crate::domain::{ClassContent, CourseIcon};

    fn admin_grant(catalog: &Catalog) -> AdminGrant {
        access::authorize(&catalog.admins()[0]).unwrap()
    }

    fn seeded() -> (Catalog, AdminGrant) {
        let catalog = seed::fixture_catalog();
        let grant = admin_grant(&catalog);
        (catalog, grant)
    }

    fn new_class(course_id: &str) -> NewClass {
        NewClass {
            title: "Flexbox".into(),
            description: String::new(),
            course_id: course_id.into(),
            content: ClassContent::text("<p>flex</p>"),
        }
    }

    #[test]
    fn test_add_course_appends_with_fresh_id() {
        let (mut catalog, grant) = seeded();
        let before = catalog.courses().len();
        let course = catalog
            .add_course(
                &grant,
                NewCourse {
                    name: "Photography".into(),
                    description: "Light".into(),
                    icon: CourseIcon::from_tag("Camera"),
                },
            )
            .unwrap();
        assert_eq!(catalog.courses().len(), before + 1);
        assert_eq!(catalog.courses().last().unwrap().id, course.id);
        assert_eq!(course.icon, CourseIcon::BookOpen);
        assert!(catalog.courses()[..before].iter().all(|c| c.id != course.id));
    }

    #[test]
    fn test_add_course_allows_duplicate_names() {
        let (mut catalog, grant) = seeded();
        let data = NewCourse {
            name: "Web".into(),
            description: String::new(),
            icon: CourseIcon::Code,
        };
        let a = catalog.add_course(&grant, data.clone()).unwrap();
        let b = catalog.add_course(&grant, data).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_class_requires_existing_course() {
        let (mut catalog, grant) = seeded();
        let err = catalog.add_class(&grant, new_class("")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "course_id", .. }));
        let err = catalog.add_class(&grant, new_class("404")).unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "course_id", .. }));

        let class = catalog.add_class(&grant, new_class("1")).unwrap();
        assert!(class.updated_at.is_none());
        assert_eq!(catalog.classes().last().unwrap().id, class.id);
    }

    #[test]
    fn test_update_class_merges_and_stamps() {
        let (mut catalog, grant) = seeded();
        let class = catalog.add_class(&grant, new_class("1")).unwrap();
        let updated = catalog
            .update_class(
                &grant,
                &class.id,
                ClassPatch {
                    title: Some("Grid".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Grid");
        assert_eq!(updated.content, class.content);
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, class.created_at);
    }

    #[test]
    fn test_update_class_switches_type_wholesale() {
        let (mut catalog, grant) = seeded();
        let class = catalog.add_class(&grant, new_class("1")).unwrap();
        let updated = catalog
            .update_class(
                &grant,
                &class.id,
                ClassPatch {
                    content: Some(ClassContent::video_url("https://vimeo.com/1")),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.content, ClassContent::video_url("https://vimeo.com/1"));
    }

    fn is_not_found(err: CatalogError, expected: RecordKind) -> bool {
        matches!(err, CatalogError::NotFound { kind, .. } if kind == expected)
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let (mut catalog, grant) = seeded();
        let err = catalog.update_class(&grant, "nope", ClassPatch::default()).unwrap_err();
        assert!(is_not_found(err, RecordKind::Class));
        let err = catalog.delete_class(&grant, "nope").unwrap_err();
        assert!(is_not_found(err, RecordKind::Class));
        let err = catalog.update_course(&grant, "nope", CoursePatch::default()).unwrap_err();
        assert!(is_not_found(err, RecordKind::Course));
        let err = catalog.delete_course(&grant, "nope").unwrap_err();
        assert!(is_not_found(err, RecordKind::Course));
        let err = catalog.update_student(&grant, "nope", StudentPatch::default()).unwrap_err();
        assert!(is_not_found(err, RecordKind::Student));
        let err = catalog.delete_student(&grant, "nope").unwrap_err();
        assert!(is_not_found(err, RecordKind::Student));
        let err = catalog.set_course_access(&grant, "nope", "1", false).unwrap_err();
        assert!(is_not_found(err, RecordKind::Student));
        let err = catalog.set_class_access(&grant, "nope", true).unwrap_err();
        assert!(is_not_found(err, RecordKind::Student));
        let err = catalog.delete_announcement(&grant, "nope").unwrap_err();
        assert!(is_not_found(err, RecordKind::Announcement));
    }

    #[test]
    fn test_delete_course_keeps_classes() {
        let (mut catalog, grant) = seeded();
        let classes_before = catalog.classes().len();
        assert!(catalog.classes_in_course("1") > 0);
        catalog.delete_course(&grant, "1").unwrap();
        assert!(catalog.course("1").is_none());
        assert_eq!(catalog.classes().len(), classes_before);
    }

    #[test]
    fn test_announcements_newest_first() {
        let (mut catalog, grant) = seeded();
        let first = catalog
            .add_announcement(
                &grant,
                NewAnnouncement {
                    title: "Exams".into(),
                    content: "Next week".into(),
                },
            )
            .unwrap();
        let second = catalog
            .add_announcement(
                &grant,
                NewAnnouncement {
                    title: "Holiday".into(),
                    content: String::new(),
                },
            )
            .unwrap();
        assert_eq!(catalog.announcements()[0].id, second.id);
        assert_eq!(catalog.announcements()[1].id, first.id);
    }

    #[test]
    fn test_add_student_forces_role_and_default_access() {
        let (mut catalog, grant) = seeded();
        let student = catalog
            .add_student(
                &grant,
                NewStudent {
                    name: "Lia".into(),
                    email: "lia@example.com".into(),
                    can_access_classes: true,
                    course_access: None,
                },
            )
            .unwrap();
        assert_eq!(student.role, Role::Student);
        assert!(student.course_access.is_empty());
        assert_eq!(catalog.students().last().unwrap().id, student.id);
    }

    #[test]
    fn test_add_student_rejects_duplicate_email() {
        let (mut catalog, grant) = seeded();
        let existing = catalog.students()[0].email.to_uppercase();
        let err = catalog
            .add_student(
                &grant,
                NewStudent {
                    name: "Dup".into(),
                    email: existing,
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, CatalogError::validation("email", "already registered"));

        let admin_email = catalog.admins()[0].email.clone();
        let err = catalog
            .add_student(
                &grant,
                NewStudent {
                    name: "Dup".into(),
                    email: admin_email,
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "email", .. }));
    }

    #[test]
    fn test_update_student_keeps_own_email() {
        let (mut catalog, grant) = seeded();
        let student = catalog.students()[0].clone();
        let updated = catalog
            .update_student(
                &grant,
                &student.id,
                StudentPatch {
                    email: Some(student.email.clone()),
                    can_access_classes: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.can_access_classes);
        assert_eq!(updated.role, Role::Student);
    }

    #[test]
    fn test_grant_is_idempotent() {
        let (mut catalog, grant) = seeded();
        let id = catalog.students()[1].id.clone();
        catalog.set_course_access(&grant, &id, "1", true).unwrap();
        let student = catalog.set_course_access(&grant, &id, "1", true).unwrap();
        assert_eq!(student.course_access.iter().filter(|c| *c == "1").count(), 1);
    }

    #[test]
    fn test_grant_then_revoke_restores_access() {
        let (mut catalog, grant) = seeded();
        for student in catalog.students().to_vec() {
            for course in ["1", "2", "3"] {
                if student.has_course(course) {
                    continue;
                }
                catalog.set_course_access(&grant, &student.id, course, true).unwrap();
                let after = catalog.set_course_access(&grant, &student.id, course, false).unwrap();
                assert_eq!(after.course_access, student.course_access);
            }
        }
    }

    #[test]
    fn test_revoke_is_idempotent_and_cleans_stale_ids() {
        let (mut catalog, grant) = seeded();
        let id = catalog.students()[0].id.clone();
        catalog
            .update_student(
                &grant,
                &id,
                StudentPatch {
                    course_access: Some(vec!["1".into(), "ghost".into(), "1".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(catalog.student(&id).unwrap().course_access.len(), 2);

        let student = catalog.set_course_access(&grant, &id, "ghost", false).unwrap();
        let again = catalog.set_course_access(&grant, &id, "ghost", false).unwrap();
        assert_eq!(student, again);
        assert!(!again.has_course("ghost"));
    }

    #[test]
    fn test_grant_unknown_course_is_validation_error() {
        let (mut catalog, grant) = seeded();
        let id = catalog.students()[0].id.clone();
        let err = catalog.set_course_access(&grant, &id, "404", true).unwrap_err();
        assert!(matches!(err, CatalogError::Validation { field: "course_id", .. }));
    }

    #[test]
    fn test_set_class_access_toggles_gate() {
        let (mut catalog, grant) = seeded();
        let id = catalog.students()[0].id.clone();
        assert!(!catalog.set_class_access(&grant, &id, false).unwrap().can_access_classes);
        assert!(catalog.set_class_access(&grant, &id, true).unwrap().can_access_classes);
    }

    #[test]
    fn test_find_user_by_email_is_case_insensitive() {
        let (catalog, _) = seeded();
        let admin = catalog.find_user_by_email(" ADMIN@AGORA.EDU ").unwrap();
        assert!(admin.is_admin());
        assert!(catalog.find_user_by_email("nobody@agora.edu").is_none());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("a na@example.com"));
    }

    #[test]
    fn test_overview_counts() {
        let (catalog, _) = seeded();
        let overview = catalog.overview();
        assert_eq!(overview.courses, 3);
        assert_eq!(overview.students, 3);
        assert_eq!(overview.students_with_class_access, 2);
    }
}
