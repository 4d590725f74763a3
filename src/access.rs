//! Visibility and edit rights derived from a user and the catalog.
//!
//! Nothing here is cached: every answer is computed from the records passed
//! in, so flipping a grant or the class gate takes effect on the next query.

use crate::domain::{Class, Course, User};
use crate::error::CatalogError;

/// Proof that the caller holds the admin role.
///
/// Catalog mutators take a reference to one; the only way to obtain it is
/// [`authorize`].
#[derive(Debug, Clone)]
pub struct AdminGrant {
    admin_id: String,
}

impl AdminGrant {
    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }
}

/// Whether a class is reachable for a given user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// True iff the user may create, edit or delete catalog records.
pub fn can_edit(user: &User) -> bool {
    user.is_admin()
}

/// Mint an [`AdminGrant`] for an admin, or fail with `Unauthorized`.
pub fn authorize(user: &User) -> Result<AdminGrant, CatalogError> {
    if !can_edit(user) {
        tracing::debug!("Denied catalog write for {}", user.id);
        return Err(CatalogError::Unauthorized);
    }
    Ok(AdminGrant {
        admin_id: user.id.clone(),
    })
}

/// Courses the user may see, in catalog order.
///
/// Admins see everything; students see the courses listed in their grants.
pub fn visible_courses<'a>(user: &User, courses: &'a [Course]) -> Vec<&'a Course> {
    if user.is_admin() {
        return courses.iter().collect();
    }
    courses
        .iter()
        .filter(|course| user.has_course(&course.id))
        .collect()
}

/// Classes the user may see, in catalog order.
///
/// For students the class gate wins over any course grant, and a class is only
/// listed when its course is among [`visible_courses`]. A class whose course
/// was deleted is therefore hidden from students but still listed for admins.
pub fn visible_classes<'a>(user: &User, classes: &'a [Class], courses: &[Course]) -> Vec<&'a Class> {
    if user.is_admin() {
        return classes.iter().collect();
    }
    if !user.can_access_classes {
        return Vec::new();
    }
    let allowed = visible_courses(user, courses);
    classes
        .iter()
        .filter(|class| allowed.iter().any(|course| course.id == class.course_id))
        .collect()
}

pub fn class_visibility(user: &User, class: &Class, courses: &[Course]) -> Visibility {
    if user.is_admin() {
        return Visibility::Visible;
    }
    let course_exists = courses.iter().any(|course| course.id == class.course_id);
    if user.can_access_classes && user.has_course(&class.course_id) && course_exists {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}
