//! Small campus used across integration tests

use crate::remote::InMemoryRemote;
use wayfinder_model::{NavItem, Profile, Role, RoleNavConfig, LOGOUT_ITEM_ID};

/// Establishment with its own student menu
pub const LYCEE: &str = "lycee-1";

pub fn campus_items() -> Vec<NavItem> {
    vec![
        NavItem::route("dashboard", "Dashboard", "/dashboard").with_icon("home"),
        NavItem::category("pedagogy", "Pedagogy").with_icon("book"),
        NavItem::route("courses", "Courses", "/courses").with_parent("pedagogy"),
        NavItem::route("assignments", "Assignments", "/assignments").with_parent("pedagogy"),
        NavItem::route("notes", "Notes", "/notes").with_parent("pedagogy"),
        NavItem::category("comms", "Communication").with_icon("mail"),
        NavItem::route("messages", "Messages", "/messages").with_parent("comms"),
        NavItem::route("notifications", "Notifications", "/notifications").with_parent("comms"),
        NavItem::category("admin", "Administration").with_icon("shield"),
        NavItem::route("approvals", "Approvals", "/approvals").with_parent("admin"),
        NavItem::route("users", "Users", "/admin/users").with_parent("admin"),
        NavItem::external("library", "Library", "https://library.example.org"),
        NavItem::action(LOGOUT_ITEM_ID, "Log out"),
    ]
}

pub fn campus_configs() -> Vec<RoleNavConfig> {
    vec![
        RoleNavConfig::new("student-general", Role::Student).with_items([
            "dashboard",
            "pedagogy",
            "courses",
            "assignments",
            "notes",
            "comms",
            "messages",
            "notifications",
            "library",
            LOGOUT_ITEM_ID,
        ]),
        RoleNavConfig::new("student-lycee", Role::Student)
            .for_establishment(LYCEE)
            .with_items(["dashboard", "comms", "messages", LOGOUT_ITEM_ID]),
        RoleNavConfig::new("director-general", Role::Director).with_items([
            "dashboard",
            "admin",
            "approvals",
            "comms",
            "messages",
            "notifications",
            LOGOUT_ITEM_ID,
        ]),
        RoleNavConfig::new("admin-general", Role::Administrator).with_items([
            "dashboard",
            "pedagogy",
            "courses",
            "admin",
            "approvals",
            "users",
            LOGOUT_ITEM_ID,
        ]),
    ]
}

/// Remote preloaded with the campus items and configs
pub fn campus_remote() -> InMemoryRemote {
    InMemoryRemote::new()
        .with_items(campus_items())
        .with_configs(campus_configs())
}

/// Student of an establishment without its own menu
pub fn student() -> Profile {
    student_at("college-2")
}

pub fn student_at(establishment: &str) -> Profile {
    Profile::new("u-student", Role::Student).in_establishment(establishment)
}

pub fn director() -> Profile {
    Profile::new("u-director", Role::Director).in_establishment(LYCEE)
}

pub fn administrator() -> Profile {
    Profile::new("u-admin", Role::Administrator)
}
