pub mod services;
pub mod value_objects;

pub use services::{CalendarDomainService, UserDomainService};
pub use value_objects::{CalendarDate, Email, HexColor, Id, ValueError};

/// Trims free text; blank becomes absent.
pub fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
