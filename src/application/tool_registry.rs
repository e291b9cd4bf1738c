use crate::domain::entities::tool::ToolSpec;
use crate::domain::error::DomainError;
use crate::domain::ports::tool_handler::ToolHandler;
use std::collections::HashMap;
use std::sync::Arc;

/// Declared tools plus the handlers that execute them, keyed by tool name.
#[derive(Default)]
pub struct ToolRegistry {
    declared: Vec<ToolSpec>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new(declared: Vec<ToolSpec>) -> Self {
        Self {
            declared,
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. A second registration under the same name replaces
    /// the first.
    pub fn register(mut self, name: &str, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.insert(name.to_string(), handler);
        self
    }

    pub fn declared(&self) -> &[ToolSpec] {
        &self.declared
    }

    /// Catch drift between declarations and handlers before any model call.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = Vec::new();
        for spec in &self.declared {
            spec.check_declaration().map_err(DomainError::Config)?;
            if seen.contains(&spec.name.as_str()) {
                return Err(DomainError::Config(format!(
                    "tool {} is declared more than once",
                    spec.name
                )));
            }
            seen.push(spec.name.as_str());
            if !self.handlers.contains_key(&spec.name) {
                return Err(DomainError::Config(format!(
                    "tool {} is declared but has no handler",
                    spec.name
                )));
            }
        }

        let mut orphans: Vec<&str> = self
            .handlers
            .keys()
            .map(String::as_str)
            .filter(|name| !seen.contains(name))
            .collect();
        if !orphans.is_empty() {
            orphans.sort_unstable();
            return Err(DomainError::Config(format!(
                "handlers registered for undeclared tools: {}",
                orphans.join(", ")
            )));
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<(&ToolSpec, Arc<dyn ToolHandler>), DomainError> {
        let spec = self.declared.iter().find(|s| s.name == name);
        match (spec, self.handlers.get(name)) {
            (Some(spec), Some(handler)) => Ok((spec, handler.clone())),
            _ => Err(DomainError::UnknownTool(name.to_string())),
        }
    }
}
