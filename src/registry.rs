use crate::command::{Handler, Session};
use crate::error::RegistrationError;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{error, info, warn};

struct Entry {
    name: String,
    label: Option<String>,
    handler: Handler,
}

/// Mapping from command name to handler.
///
/// Registration is append-only: the first handler registered under a name wins
/// and later attempts are rejected. Names are listed in insertion order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`.
    ///
    /// Returns `Ok(true)` when the command was added and `Ok(false)` when the
    /// name was already taken, in which case the existing handler is kept.
    /// A name containing a space is rejected with [`RegistrationError::InvalidName`].
    pub fn register<F>(&mut self, name: &str, handler: F) -> Result<bool, RegistrationError>
    where
        F: Fn(Option<&[String]>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.insert(name, None, Rc::new(handler))
    }

    /// Same as [`Registry::register`], with a human-readable label naming the
    /// handler in log records.
    pub fn register_labeled<F>(
        &mut self,
        name: &str,
        label: &str,
        handler: F,
    ) -> Result<bool, RegistrationError>
    where
        F: Fn(Option<&[String]>, &mut Session<'_>) -> Result<()> + 'static,
    {
        self.insert(name, Some(label), Rc::new(handler))
    }

    fn insert(
        &mut self,
        name: &str,
        label: Option<&str>,
        handler: Handler,
    ) -> Result<bool, RegistrationError> {
        if name.contains(' ') {
            error!("Tried to register command '{name}', command contains illegal character");
            return Err(RegistrationError::InvalidName(name.to_string()));
        }

        if self.index.contains_key(name) {
            warn!("Tried to register command '{name}', but it was already registered");
            return Ok(false);
        }

        match label {
            Some(label) => info!("Registered command '{name}' (handler: {label})"),
            None => info!("Registered command '{name}'"),
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(Entry {
            name: name.to_string(),
            label: label.map(str::to_string),
            handler,
        });
        Ok(true)
    }

    /// The handler registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&Handler> {
        self.index.get(name).map(|&i| &self.entries[i].handler)
    }

    /// The label a command was registered with, if any.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .and_then(|&i| self.entries[i].label.as_deref())
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn invoke(registry: &mut Registry, name: &str) -> Result<()> {
        let handler = Rc::clone(registry.lookup(name).expect("registered"));
        let mut stop = false;
        let mut out = Vec::new();
        let mut session = Session::new(registry, &mut stop, &mut out);
        handler(None, &mut session)
    }

    #[test]
    fn test_register_then_lookup() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.register("look", |_, _| Ok(())), Ok(true));
        assert!(registry.lookup("look").is_some());
        assert!(registry.lookup("LOOK").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_keeps_first_handler() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let mut registry = Registry::new();

        let counter = Rc::clone(&first);
        let added = registry.register("go", move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        assert_eq!(added, Ok(true));

        let counter = Rc::clone(&second);
        let added = registry.register("go", move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        assert_eq!(added, Ok(false));

        invoke(&mut registry, "go").unwrap();
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_name_with_space_is_rejected() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.register("go north", |_, _| Ok(())),
            Err(RegistrationError::InvalidName("go north".to_string()))
        );
        assert!(registry.is_empty());

        registry.register("go", |_, _| Ok(())).unwrap();
        assert!(registry.register(" go", |_, _| Ok(())).is_err());
        assert!(registry.register_labeled("go ", "x", |_, _| Ok(())).is_err());
    }

    #[test]
    fn test_empty_name_is_valid() {
        let mut registry = Registry::new();
        assert_eq!(registry.register("", |_, _| Ok(())), Ok(true));
        assert!(registry.contains(""));
    }

    #[test]
    fn test_names_in_insertion_order() {
        let mut registry = Registry::new();
        for name in ["quit", "", "debug", "exit"] {
            registry.register(name, |_, _| Ok(())).unwrap();
        }
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["quit", "", "debug", "exit"]
        );
        assert_eq!(format!("{registry:?}"), r#"["quit", "", "debug", "exit"]"#);
    }

    #[test]
    fn test_label_is_kept() {
        let mut registry = Registry::new();
        registry
            .register_labeled("quit", "builtin::quit", |_, _| Ok(()))
            .unwrap();
        registry.register("look", |_, _| Ok(())).unwrap();
        assert_eq!(registry.label("quit"), Some("builtin::quit"));
        assert_eq!(registry.label("look"), None);
        assert_eq!(registry.label("missing"), None);
    }
}
