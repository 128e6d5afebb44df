//! Named routes for reverse URL lookup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, RouterError};
use crate::pattern::Pattern;

/// Maps route names to their patterns so URLs can be generated from
/// parameter values.
///
/// The registry is owned by the caller and filled while routes are
/// registered; nothing is kept in global state.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: HashMap<String, Arc<Pattern>>,
}

impl RouteRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pattern under `name`.
    pub fn insert(&mut self, name: impl Into<String>, pattern: Arc<Pattern>) -> Result<()> {
        let name = name.into();
        if self.routes.contains_key(&name) {
            return Err(RouterError::DuplicateRouteName(name));
        }
        self.routes.insert(name, pattern);
        Ok(())
    }

    /// Returns the pattern registered under `name`.
    pub fn pattern(&self, name: &str) -> Option<&Arc<Pattern>> {
        self.routes.get(name)
    }

    /// Generates the path of a named route.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use oxide_route::{Pattern, RouteRegistry};
    ///
    /// let mut registry = RouteRegistry::new();
    /// registry
    ///     .insert("user_detail", Arc::new(Pattern::parse("/users/:id").unwrap()))
    ///     .unwrap();
    ///
    /// let url = registry.url_for("user_detail", &[("id", "42")]).unwrap();
    /// assert_eq!(url, "/users/42");
    /// ```
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| RouterError::RouteNotFound(name.to_string()))?;

        let values = pattern
            .keys()
            .iter()
            .map(|key| {
                params
                    .iter()
                    .find(|(k, _)| *k == key.as_str())
                    .map(|(_, v)| *v)
                    .ok_or_else(|| RouterError::MissingParameter {
                        route: name.to_string(),
                        key: key.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(pattern.expand(values))
    }
}
