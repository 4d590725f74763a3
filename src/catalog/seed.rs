//! Fixture records loaded at startup when `catalog.seed` is enabled.

use chrono::Utc;

use super::Catalog;
use crate::domain::{Announcement, Class, ClassContent, Course, CourseIcon, Role, User};

fn course(id: &str, name: &str, description: &str, icon: CourseIcon) -> Course {
    Course {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon,
    }
}

fn user(id: &str, name: &str, email: &str, role: Role, gate: bool, access: &[&str]) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        can_access_classes: gate,
        course_access: access.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn fixture_courses() -> Vec<Course> {
    vec![
        course(
            "1",
            "Full Stack Web Development",
            "HTML, CSS, JavaScript, React and Node.js from scratch to advanced.",
            CourseIcon::Code,
        ),
        course(
            "2",
            "Digital Marketing",
            "Digital marketing strategy and social media.",
            CourseIcon::Megaphone,
        ),
        course(
            "3",
            "Graphic Design",
            "Visual identities and professional print material.",
            CourseIcon::Palette,
        ),
    ]
}

pub fn fixture_classes() -> Vec<Class> {
    let now = Utc::now();
    vec![
        Class {
            id: "1".to_string(),
            title: "Introduction to HTML".to_string(),
            description: "Markup language fundamentals".to_string(),
            course_id: "1".to_string(),
            content: ClassContent::video_url("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            created_at: now,
            updated_at: None,
        },
        Class {
            id: "2".to_string(),
            title: "CSS Basics".to_string(),
            description: "Styling fundamentals".to_string(),
            course_id: "1".to_string(),
            content: ClassContent::text(
                "<h2>Introduction to CSS</h2><p>CSS (Cascading Style Sheets) describes how an \
                 HTML document is presented.</p><h3>Key concepts:</h3><ul><li>Selectors</li>\
                 <li>Properties</li><li>Values</li><li>Specificity</li></ul>",
            ),
            created_at: now,
            updated_at: None,
        },
    ]
}

pub fn fixture_announcements() -> Vec<Announcement> {
    vec![Announcement {
        id: "1".to_string(),
        title: "Welcome to Agora!".to_string(),
        content: "We are glad to have you here. Make the most of your courses!".to_string(),
        created_at: Utc::now(),
    }]
}

pub fn fixture_students() -> Vec<User> {
    vec![
        user("2", "Joao Silva", "joao@email.com", Role::Student, true, &["1", "2"]),
        user("3", "Maria Santos", "maria@email.com", Role::Student, true, &["3"]),
        user("4", "Pedro Costa", "pedro@email.com", Role::Student, false, &[]),
    ]
}

pub fn fixture_admins() -> Vec<User> {
    vec![user("1", "Agora Admin", "admin@agora.edu", Role::Admin, true, &[])]
}

/// Catalog with every fixture collection loaded
pub fn fixture_catalog() -> Catalog {
    Catalog::from_parts(
        fixture_courses(),
        fixture_classes(),
        fixture_announcements(),
        fixture_students(),
        fixture_admins(),
    )
}

/// Catalog holding only the admin accounts, so the portal can still be managed
pub fn empty_catalog() -> Catalog {
    Catalog::from_parts(Vec::new(), Vec::new(), Vec::new(), Vec::new(), fixture_admins())
}
