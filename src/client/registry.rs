//! Registry of exception types the client knows how to reconstruct.
//!
//! Each type is registered under a stable string identifier (the value a server
//! writes in `exceptionClassName`) together with the constructors it supports.
//! Constructor shapes mirror the two ways a remote error can be rebuilt: from the
//! captured response, or from the message text alone.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::reconstruct::RemoteException;
use super::response::RawResponse;
pub use crate::errors::kinds;

/// Builds an exception from the captured HTTP response
pub type ResponseConstructor =
    Arc<dyn Fn(&RawResponse) -> anyhow::Result<RemoteException> + Send + Sync>;

/// Builds an exception from a message
pub type MessageConstructor = Arc<dyn Fn(&str) -> anyhow::Result<RemoteException> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Constructed from the original response so callers can inspect status and headers
    ResponseCarrying,
    /// Constructed from a message only
    Simple,
}

/// A registered exception type
#[derive(Clone)]
pub struct ExceptionType {
    name: String,
    supertype: Option<String>,
    category: Option<Category>,
    from_response: Option<ResponseConstructor>,
    from_message: Option<MessageConstructor>,
}

impl ExceptionType {
    /// A type with no constructors and no supertype
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            category: None,
            from_response: None,
            from_message: None,
        }
    }

    /// A simple type whose message constructor keeps the message verbatim
    pub fn simple(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = name.clone();
        Self::new(name)
            .category(Category::Simple)
            .message_constructor(move |message| Ok(RemoteException::new(kind.clone(), message)))
    }

    /// A response-carrying type with both constructor shapes.
    ///
    /// The response constructor derives the message from the status line, the
    /// message constructor carries no response.
    pub fn response_carrying(name: impl Into<String>) -> Self {
        let name = name.into();
        let response_kind = name.clone();
        let message_kind = name.clone();
        Self::new(name)
            .category(Category::ResponseCarrying)
            .response_constructor(move |response| {
                Ok(RemoteException::with_response(
                    response_kind.clone(),
                    status_line(response),
                    response.clone(),
                ))
            })
            .message_constructor(move |message| {
                Ok(RemoteException::new(message_kind.clone(), message))
            })
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    /// Set the category explicitly; otherwise it is inherited from the supertype
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn response_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&RawResponse) -> anyhow::Result<RemoteException> + Send + Sync + 'static,
    {
        self.from_response = Some(Arc::new(constructor));
        self
    }

    pub fn message_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<RemoteException> + Send + Sync + 'static,
    {
        self.from_message = Some(Arc::new(constructor));
        self
    }

    /// Drop the message constructor, leaving only the response shape
    pub fn without_message_constructor(mut self) -> Self {
        self.from_message = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supertype(&self) -> Option<&str> {
        self.supertype.as_deref()
    }

    pub fn from_response(&self) -> Option<&ResponseConstructor> {
        self.from_response.as_ref()
    }

    pub fn from_message(&self) -> Option<&MessageConstructor> {
        self.from_message.as_ref()
    }
}

impl fmt::Debug for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionType")
            .field("name", &self.name)
            .field("supertype", &self.supertype)
            .field("category", &self.category)
            .field("from_response", &self.from_response.is_some())
            .field("from_message", &self.from_message.is_some())
            .finish()
    }
}

fn status_line(response: &RawResponse) -> String {
    let status = response.status();
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Lookup table from type identifier to [`ExceptionType`]
#[derive(Debug, Clone, Default)]
pub struct ExceptionRegistry {
    types: HashMap<String, ExceptionType>,
}

impl ExceptionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the generic root, the HTTP status family and the
    /// common argument/state errors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(ExceptionType::simple(kinds::SERVER_ERROR));
        registry.register(
            ExceptionType::response_carrying(kinds::WEB_APPLICATION_ERROR)
                .extends(kinds::SERVER_ERROR),
        );

        for name in [
            kinds::BAD_REQUEST,
            kinds::NOT_AUTHORIZED,
            kinds::FORBIDDEN,
            kinds::NOT_FOUND,
            kinds::NOT_ALLOWED,
            kinds::NOT_ACCEPTABLE,
            kinds::INTERNAL_SERVER_ERROR,
            kinds::SERVICE_UNAVAILABLE,
        ] {
            registry.register(
                ExceptionType::response_carrying(name).extends(kinds::WEB_APPLICATION_ERROR),
            );
        }

        for name in [
            kinds::VALIDATION,
            kinds::INVALID_ARGUMENT,
            kinds::INVALID_STATE,
            kinds::UNSUPPORTED,
        ] {
            registry.register(ExceptionType::simple(name).extends(kinds::SERVER_ERROR));
        }

        registry
    }

    /// Add or replace a type
    pub fn register(&mut self, exception_type: ExceptionType) -> &mut Self {
        self.types
            .insert(exception_type.name.clone(), exception_type);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&ExceptionType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Category of a type, walking up the supertype chain until one is set.
    ///
    /// Types without any categorised ancestor (or with a broken or cyclic
    /// chain) are simple.
    pub fn category_of(&self, exception_type: &ExceptionType) -> Category {
        let mut current = Some(exception_type);
        // a chain longer than the registry must contain a cycle
        for _ in 0..=self.types.len() {
            let Some(ty) = current else { break };
            if let Some(category) = ty.category {
                return category;
            }
            current = ty.supertype().and_then(|parent| self.resolve(parent));
        }
        Category::Simple
    }

    pub fn is_response_carrying(&self, exception_type: &ExceptionType) -> bool {
        self.category_of(exception_type) == Category::ResponseCarrying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;

    #[test]
    fn test_defaults_contain_roots() {
        let registry = ExceptionRegistry::with_defaults();
        assert!(registry.resolve(kinds::SERVER_ERROR).is_some());
        assert!(registry.resolve(kinds::WEB_APPLICATION_ERROR).is_some());
        assert!(registry.resolve(kinds::NOT_FOUND).is_some());
        assert!(registry.resolve("com.example.Unknown").is_none());
        assert_eq!(registry.len(), 14);
    }

    #[test]
    fn test_category_is_inherited() {
        let mut registry = ExceptionRegistry::with_defaults();
        registry.register(ExceptionType::new("Gone").extends(kinds::NOT_FOUND));
        registry.register(ExceptionType::new("Quota").extends(kinds::INVALID_STATE));

        let gone = registry.resolve("Gone").unwrap();
        let quota = registry.resolve("Quota").unwrap();
        assert!(registry.is_response_carrying(gone));
        assert!(!registry.is_response_carrying(quota));
    }

    #[test]
    fn test_category_of_cycle_is_simple() {
        let mut registry = ExceptionRegistry::new();
        registry.register(ExceptionType::new("A").extends("B"));
        registry.register(ExceptionType::new("B").extends("A"));

        let a = registry.resolve("A").unwrap();
        assert_eq!(registry.category_of(a), Category::Simple);
    }

    #[test]
    fn test_response_constructor_uses_status_line() {
        let registry = ExceptionRegistry::with_defaults();
        let not_found = registry.resolve(kinds::NOT_FOUND).unwrap();
        let response = RawResponse::new(StatusCode::NOT_FOUND, HeaderMap::new(), "");

        let exception = (not_found.from_response().unwrap())(&response).unwrap();
        assert_eq!(exception.kind(), kinds::NOT_FOUND);
        assert_eq!(exception.message(), "HTTP 404 Not Found");
        assert_eq!(exception.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = ExceptionRegistry::with_defaults();
        registry.register(ExceptionType::new(kinds::NOT_FOUND));
        assert!(registry
            .resolve(kinds::NOT_FOUND)
            .unwrap()
            .from_response()
            .is_none());
    }
}
