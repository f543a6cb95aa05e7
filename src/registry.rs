use std::path::Path;

use crate::error::ImportError;

/// Read-only view of the known staff. The engine only looks names up; it
/// never owns or mutates the registry.
pub trait StaffRegistry {
    /// Canonical names, possibly `(R)`-suffixed.
    fn names(&self) -> &[String];
}

impl StaffRegistry for Vec<String> {
    fn names(&self) -> &[String] {
        self
    }
}

/// A registry loaded from a file or built in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffDirectory {
    names: Vec<String>,
}

impl StaffDirectory {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut directory = Self::default();
        for name in names {
            directory.insert(name);
        }
        directory
    }

    /// Adds a name unless it is blank or already present.
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into().trim().to_string();
        if !name.is_empty() && !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Accepts either a JSON array of strings or one name per line, with
    /// `#` starting a comment line.
    pub fn parse(contents: &str) -> Result<Self, ImportError> {
        let trimmed = contents.trim_start();
        if trimmed.starts_with('[') {
            let names: Vec<String> = serde_json::from_str(trimmed)?;
            return Ok(Self::new(names));
        }

        Ok(Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        ))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

impl StaffRegistry for StaffDirectory {
    fn names(&self) -> &[String] {
        &self.names
    }
}
