//! Template loaders.
//!
//! Loaders find template source text by name. The [`TemplateLoader`] trait
//! defines the interface; [`FileSystemLoader`] reads from configured
//! directories and [`StringLoader`] serves sources kept in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use handlebazz_core::error::HandlebazzError;

/// Loads template source text by name.
pub trait TemplateLoader: Send + Sync {
    /// Loads the template source with the given name.
    ///
    /// # Errors
    ///
    /// Returns `TemplateDoesNotExist` if the template cannot be found.
    fn load(&self, name: &str) -> Result<String, HandlebazzError>;
}

/// Loads templates from one or more directories on the filesystem.
///
/// Searches each configured directory in order and returns the first match.
/// Absolute names are read directly.
pub struct FileSystemLoader {
    dirs: Vec<PathBuf>,
}

impl FileSystemLoader {
    /// Creates a new `FileSystemLoader` with the given search directories.
    pub const fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The directories searched, in order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

fn read_template(path: &Path) -> Result<String, HandlebazzError> {
    std::fs::read_to_string(path).map_err(|e| {
        HandlebazzError::TemplateDoesNotExist(format!(
            "Error reading template '{}': {}",
            path.display(),
            e
        ))
    })
}

impl TemplateLoader for FileSystemLoader {
    fn load(&self, name: &str) -> Result<String, HandlebazzError> {
        let requested = Path::new(name);
        if requested.is_absolute() {
            return read_template(requested);
        }

        for dir in &self.dirs {
            let path = dir.join(name);
            if path.is_file() {
                return read_template(&path);
            }
        }

        Err(HandlebazzError::TemplateDoesNotExist(format!(
            "Template '{name}' not found in directories: {:?}",
            self.dirs
        )))
    }
}

/// Loads templates from an in-memory map of name to source strings.
#[derive(Debug, Default)]
pub struct StringLoader {
    templates: HashMap<String, String>,
}

impl StringLoader {
    /// Creates a new empty `StringLoader`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `StringLoader` from a map of template names to source strings.
    pub const fn from_map(templates: HashMap<String, String>) -> Self {
        Self { templates }
    }

    /// Adds or replaces a template.
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(name.into(), source.into());
    }
}

impl TemplateLoader for StringLoader {
    fn load(&self, name: &str) -> Result<String, HandlebazzError> {
        self.templates.get(name).cloned().ok_or_else(|| {
            HandlebazzError::TemplateDoesNotExist(format!(
                "Template '{name}' not found in StringLoader"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_loader_basic() {
        let mut loader = StringLoader::new();
        loader.add("hello.html", "Hello {{name}}!");

        let source = loader.load("hello.html").unwrap();
        assert_eq!(source, "Hello {{name}}!");
    }

    #[test]
    fn test_string_loader_not_found() {
        let loader = StringLoader::new();
        let result = loader.load("missing.html");
        assert!(matches!(result, Err(HandlebazzError::TemplateDoesNotExist(_))));
    }

    #[test]
    fn test_string_loader_from_map() {
        let mut map = HashMap::new();
        map.insert("a.html".to_string(), "content A".to_string());
        map.insert("b.html".to_string(), "content B".to_string());

        let loader = StringLoader::from_map(map);
        assert_eq!(loader.load("a.html").unwrap(), "content A");
        assert_eq!(loader.load("b.html").unwrap(), "content B");
    }

    #[test]
    fn test_string_loader_overwrite() {
        let mut loader = StringLoader::new();
        loader.add("x.html", "version 1");
        loader.add("x.html", "version 2");
        assert_eq!(loader.load("x.html").unwrap(), "version 2");
    }

    #[test]
    fn test_filesystem_loader_not_found() {
        let loader = FileSystemLoader::new(vec![PathBuf::from("/nonexistent/path")]);
        let result = loader.load("missing.html");
        assert!(result.is_err());
    }

    #[test]
    fn test_filesystem_loader_search_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("head.html"), "second head").unwrap();
        std::fs::write(second.path().join("end.html"), "second end").unwrap();
        std::fs::write(first.path().join("end.html"), "first end").unwrap();

        let loader =
            FileSystemLoader::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(loader.load("head.html").unwrap(), "second head");
        assert_eq!(loader.load("end.html").unwrap(), "first end");
        assert_eq!(loader.dirs().len(), 2);
    }

    #[test]
    fn test_filesystem_loader_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "Hello from file!").unwrap();

        let loader = FileSystemLoader::new(Vec::new());
        assert_eq!(loader.load(path.to_str().unwrap()).unwrap(), "Hello from file!");
    }
}
