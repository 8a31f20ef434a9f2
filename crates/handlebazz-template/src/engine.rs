//! Templates and the registry that owns them.
//!
//! The [`Engine`] owns every [`Template`] and hands out [`TemplateId`]
//! handles. A template refers to its partials by handle only, so registering
//! a partial never copies or takes ownership of it, and removing a template
//! never removes the partials it referred to.
//!
//! Cooking takes `&self`: the engine is never mutated during a cook, so a
//! shared engine can be cooked from several threads at once.

use std::path::PathBuf;

use handlebazz_core::error::HandlebazzError;
use handlebazz_core::logging::cook_span;
use handlebazz_core::settings::{Settings, DEFAULT_MAX_DEPTH};

use crate::check::{self, CheckReport};
use crate::cooker::Cooker;
use crate::loaders::{FileSystemLoader, StringLoader, TemplateLoader};

/// A handle to a template registered in an [`Engine`].
///
/// Slots freed by [`Engine::remove_template`] are reused, but each reuse
/// bumps the slot's generation, so a handle to a removed template never
/// reaches its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId {
    index: usize,
    generation: u32,
}

impl TemplateId {
    /// The handle's slot number.
    pub const fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    template: Option<Template>,
}

/// A template: source text, the JSON data it is cooked with, and the names
/// of its partials.
///
/// The data is kept as text and parsed afresh on every cook.
#[derive(Debug, Clone)]
pub struct Template {
    name: Option<String>,
    source: String,
    data: String,
    partials: Vec<(String, TemplateId)>,
}

impl Template {
    /// Creates an unnamed template.
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: None,
            source: source.into(),
            data: data.into(),
            partials: Vec::new(),
        }
    }

    /// Creates a template that remembers the name it was loaded under.
    pub fn named(
        name: impl Into<String>,
        source: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(source, data)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// The partial registered under `name`, if any.
    pub fn partial(&self, name: &str) -> Option<TemplateId> {
        self.partials
            .iter()
            .find(|(partial_name, _)| partial_name == name)
            .map(|(_, id)| *id)
    }

    /// All registered partials, in registration order.
    pub fn partials(&self) -> impl Iterator<Item = (&str, TemplateId)> {
        self.partials.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Registers `id` under `name`, replacing and returning any previous
    /// registration of that name.
    ///
    /// The handle is not checked here; [`Engine::add_partial`] checks both
    /// handles for a registered template.
    pub fn set_partial(&mut self, name: impl Into<String>, id: TemplateId) -> Option<TemplateId> {
        let name = name.into();
        if let Some(slot) = self.partials.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, id));
        }
        self.partials.push((name, id));
        None
    }

    /// A label for logs: the name if there is one, the handle otherwise.
    fn label(&self, id: TemplateId) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{}", id.index()))
    }
}

/// The template registry and cooking entry point.
///
/// # Examples
///
/// ```
/// use handlebazz_template::Engine;
///
/// let mut engine = Engine::new();
/// let id = engine.add_template("Hello {{name}}, how are you today?", r#"{"name": "world"}"#);
/// assert_eq!(engine.cook(id).unwrap(), "Hello world, how are you today?");
/// ```
pub struct Engine {
    slots: Vec<Slot>,
    /// Indices of empty slots, reused before the arena grows.
    free: Vec<usize>,
    /// Registered template loaders, consulted in order.
    loaders: Vec<Box<dyn TemplateLoader>>,
    /// An in-memory loader, consulted before the others.
    string_loader: StringLoader,
    max_depth: usize,
}

impl Engine {
    /// Creates an engine with no loaders and the default depth limit.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            loaders: Vec::new(),
            string_loader: StringLoader::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Creates an engine that loads from `settings.template_dirs` and uses
    /// `settings.max_depth`.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut engine = Self::new();
        engine.max_depth = settings.max_depth;
        if !settings.template_dirs.is_empty() {
            engine.set_dirs(settings.template_dirs.clone());
        }
        engine
    }

    /// Adds a filesystem loader over `dirs`, ahead of any other loader.
    pub fn set_dirs(&mut self, dirs: Vec<PathBuf>) {
        self.loaders.insert(0, Box::new(FileSystemLoader::new(dirs)));
    }

    /// Adds a template loader.
    pub fn add_loader(&mut self, loader: Box<dyn TemplateLoader>) {
        self.loaders.push(loader);
    }

    /// Adds an in-memory template source, loadable by name.
    pub fn add_string_template(&mut self, name: &str, source: &str) {
        self.string_loader.add(name, source);
    }

    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets how deeply blocks and partials may nest before cooking fails.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// Loads the source of a template by name.
    ///
    /// # Errors
    ///
    /// Returns `TemplateDoesNotExist` if no loader has it.
    pub fn load_source(&self, name: &str) -> Result<String, HandlebazzError> {
        if let Ok(source) = self.string_loader.load(name) {
            return Ok(source);
        }

        for loader in &self.loaders {
            if let Ok(source) = loader.load(name) {
                return Ok(source);
            }
        }

        Err(HandlebazzError::TemplateDoesNotExist(format!(
            "Template '{name}' could not be found"
        )))
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Registers a template built from source text and data text.
    ///
    /// The data is not parsed until the template is cooked.
    pub fn add_template(&mut self, source: impl Into<String>, data: impl Into<String>) -> TemplateId {
        self.insert(Template::new(source, data))
    }

    /// Registers an already built template.
    pub fn insert(&mut self, template: Template) -> TemplateId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.template = Some(template);
            return TemplateId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            template: Some(template),
        });
        TemplateId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn slot_mut(&mut self, id: TemplateId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation && slot.template.is_some())
    }

    /// Loads a template's source by name and registers it with `data`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateDoesNotExist` if no loader has it.
    pub fn load_template(
        &mut self,
        name: &str,
        data: impl Into<String>,
    ) -> Result<TemplateId, HandlebazzError> {
        let source = self.load_source(name)?;
        tracing::debug!(name, bytes = source.len(), "loaded template");
        Ok(self.insert(Template::named(name, source, data)))
    }

    /// Makes `partial` available to `parent` as `{{> name}}`.
    ///
    /// Registering a name twice replaces the earlier registration.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` if either handle is not live.
    pub fn add_partial(
        &mut self,
        parent: TemplateId,
        name: impl Into<String>,
        partial: TemplateId,
    ) -> Result<(), HandlebazzError> {
        self.template(partial)?;
        let name = name.into();
        let template = self
            .slot_mut(parent)
            .and_then(|slot| slot.template.as_mut())
            .ok_or(HandlebazzError::UnknownTemplate(parent.index))?;

        if let Some(previous) = template.set_partial(name.clone(), partial) {
            tracing::debug!(
                partial = %name,
                previous = previous.index(),
                "replaced partial registration"
            );
        }
        Ok(())
    }

    /// Releases a template and its partial names. The partial templates
    /// themselves stay registered; cooking a template that still refers to
    /// the removed one fails with `PartialNotFound`.
    ///
    /// The freed slot is reused by the next registration, under a new
    /// generation, so `id` stays invalid.
    pub fn remove_template(&mut self, id: TemplateId) -> Option<Template> {
        let slot = self.slot_mut(id)?;
        let template = slot.template.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        template
    }

    /// Returns the live template behind `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` if the handle was removed or never issued.
    pub fn template(&self, id: TemplateId) -> Result<&Template, HandlebazzError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.template.as_ref())
            .ok_or(HandlebazzError::UnknownTemplate(id.index))
    }

    /// The number of live templates.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Cooking ──────────────────────────────────────────────────────

    /// Cooks a registered template with its own data.
    ///
    /// On any failure the whole cook fails; no partial output is returned.
    ///
    /// # Errors
    ///
    /// Returns the first data, lookup, partial, or syntax error encountered.
    pub fn cook(&self, id: TemplateId) -> Result<String, HandlebazzError> {
        let template = self.template(id)?;
        let span = cook_span(&template.label(id));
        let _guard = span.enter();

        Cooker::new(self).cook(Some(id), template)
    }

    /// Cooks a template that is not registered. Partials attached with
    /// [`Template::set_partial`] must be handles to templates in this engine.
    ///
    /// # Errors
    ///
    /// As for [`cook`](Self::cook).
    pub fn cook_template(&self, template: &Template) -> Result<String, HandlebazzError> {
        let span = cook_span(template.name().unwrap_or("inline"));
        let _guard = span.enter();

        Cooker::new(self).cook(None, template)
    }

    /// Cooks source text with data text in one step, without partials.
    ///
    /// # Errors
    ///
    /// As for [`cook`](Self::cook).
    pub fn cook_str(&self, source: &str, data: &str) -> Result<String, HandlebazzError> {
        self.cook_template(&Template::new(source, data))
    }

    /// Checks a registered template's syntax without cooking it, and that
    /// every partial it names is registered on it.
    ///
    /// # Errors
    ///
    /// Returns the first syntax error, or `PartialNotFound`.
    pub fn check(&self, id: TemplateId) -> Result<CheckReport, HandlebazzError> {
        let template = self.template(id)?;
        let report = check::check_source(template.source())?;

        for name in &report.partials {
            let registered = template
                .partial(name)
                .is_some_and(|partial| self.template(partial).is_ok());
            if !registered {
                return Err(HandlebazzError::PartialNotFound { name: name.clone() });
            }
        }

        Ok(report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("templates", &self.len())
            .field("loaders", &self.loaders.len())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
