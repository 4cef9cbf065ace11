//! Catalog of syntax modules
//!
//! The catalog maps module names to modules, so that `@use NAME` and extension-based
//! detection can activate them. It belongs to one manager; there is no process-wide
//! table.

use super::SyntaxModule;
use std::collections::HashMap;
use std::rc::Rc;

/// Registry of syntax modules
///
/// # Examples
///
/// ```ignore
/// let mut catalog = ModuleCatalog::new();
/// catalog.register(MyModule);
///
/// let module = catalog.get("my-module");
/// ```
pub struct ModuleCatalog {
    modules: HashMap<String, Rc<dyn SyntaxModule>>,
}

impl ModuleCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        ModuleCatalog {
            modules: HashMap::new(),
        }
    }

    /// Register a module
    ///
    /// If a module with the same name already exists, it will be replaced.
    pub fn register<M: SyntaxModule + 'static>(&mut self, module: M) {
        self.modules
            .insert(module.name().to_string(), Rc::new(module));
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn SyntaxModule>> {
        self.modules.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// List all module names (sorted)
    pub fn list_modules(&self) -> Vec<String> {
        let mut names: Vec<_> = self.modules.keys().cloned().collect();
        names.sort();
        names
    }

    /// Find the module handling the extension of `filename`.
    pub fn detect_from_filename(&self, filename: &str) -> Option<Rc<dyn SyntaxModule>> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        self.modules
            .values()
            .find(|module| module.file_extensions().contains(&extension))
            .cloned()
    }

    /// Create a catalog with the built-in modules
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register(super::textile::TextileModule);
        catalog
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("modules", &self.list_modules())
            .finish()
    }
}
