//! Handler registry.
//!
//! # Responsibilities
//! - Map handler names to constructor functions
//! - Instantiate handlers on demand from a route entry's stored args
//!
//! # Design Decisions
//! - Built once at startup and shared read-only across all sessions
//! - Constructors are plain `fn` pointers; no state lives in the registry

use std::collections::HashMap;

use super::{Handler, HandlerCtor};

/// Named-constructor registry consulted by the session engine.
pub struct HandlerRegistry {
    ctors: HashMap<&'static str, HandlerCtor>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            ctors: HashMap::new(),
        }
    }

    /// A registry with every built-in handler registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("EchoHandler", super::echo::EchoHandler::create);
        registry.register("StaticFileHandler", super::static_files::StaticFileHandler::create);
        registry.register("HealthHandler", super::health::HealthHandler::create);
        registry.register("SleepHandler", super::sleep::SleepHandler::create);
        registry.register("NotFoundHandler", super::not_found::NotFoundHandler::create);
        registry.register("CrudHandler", super::crud::CrudHandler::create);
        registry.register("QuizHandler", super::quiz::QuizHandler::create);
        registry.register("ResultHandler", super::quiz_result::ResultHandler::create);
        registry.register("CreateQuizHandler", super::quiz_create::CreateQuizHandler::create);
        registry
    }

    /// Register a constructor under a handler name.
    pub fn register(&mut self, name: &'static str, ctor: HandlerCtor) {
        self.ctors.insert(name, ctor);
    }

    /// Instantiate the named handler with the given args.
    ///
    /// Returns `None` for an unknown name or when the constructor rejects
    /// the args — the caller must synthesize an error response, never
    /// dereference a missing handler.
    pub fn create(
        &self,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Option<Box<dyn Handler>> {
        self.ctors.get(name).and_then(|ctor| ctor(args))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_handler_name_returns_none() {
        let registry = HandlerRegistry::with_defaults();
        assert!(registry.create("TeleportHandler", &HashMap::new()).is_none());
    }

    #[test]
    fn test_echo_constructs_without_args() {
        let registry = HandlerRegistry::with_defaults();
        assert!(registry.create("EchoHandler", &HashMap::new()).is_some());
    }

    #[test]
    fn test_static_requires_args() {
        let registry = HandlerRegistry::with_defaults();
        assert!(registry
            .create("StaticFileHandler", &HashMap::new())
            .is_none());

        let mut args = HashMap::new();
        args.insert("mount_point".to_string(), "/static".to_string());
        args.insert("doc_root".to_string(), "/tmp".to_string());
        assert!(registry.create("StaticFileHandler", &args).is_some());
    }
}
