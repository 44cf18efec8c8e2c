//! Tenant and user descriptors carried by a [`Context`](super::Context).
//!
//! The engine only reads `name` and `id`, for failure log lines.

use std::fmt;

/// A tenant of the application, identified by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    id: i64,
    name: String,
}

impl Tenant {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Formats as `name (id)`.
impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: i64,
    name: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Formats as `name (id)`.
impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_name_and_id() {
        assert_eq!(Tenant::new(7, "Acme").to_string(), "Acme (7)");
        assert_eq!(User::new(12, "Jon Snow").to_string(), "Jon Snow (12)");
    }
}
