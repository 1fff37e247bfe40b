//! Per-document store of definitions and parameters
//!
//! Registration overwrites silently. Lookups strip the known ref prefixes and
//! never fail; an unknown name yields [`Resolution::Pending`] while the
//! registry is still being populated and [`Resolution::Missing`] once it has
//! been sealed.

use crate::field::TypeRef;
use crate::model::{Definition, Parameter};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a by-name lookup
#[derive(Debug, PartialEq)]
pub enum Resolution<'a, T> {
    Resolved(&'a T),
    /// Not registered yet, the registry still accepts registrations
    Pending,
    /// Not registered and the registry is sealed
    Missing,
}

impl<'a, T> Resolution<'a, T> {
    pub fn ok(self) -> Option<&'a T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// Name-keyed definitions and parameters of one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registry {
    definitions: IndexMap<String, Definition>,
    parameters: IndexMap<String, Parameter>,
    #[serde(skip)]
    sealed: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a definition; a previous entry under the same name is replaced
    pub fn register_definition(&mut self, name: impl Into<String>, definition: Definition) {
        let name = name.into();
        if self.definitions.insert(name.clone(), definition).is_some() {
            tracing::debug!(definition = %name, "definition re-registered");
        }
    }

    /// Store a parameter; a previous entry under the same name is replaced
    pub fn register_parameter(&mut self, name: impl Into<String>, parameter: Parameter) {
        let name = name.into();
        if self.parameters.insert(name.clone(), parameter).is_some() {
            tracing::debug!(parameter = %name, "parameter re-registered");
        }
    }

    /// Mark population as complete
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn resolve_definition_ref(&self, reference: &TypeRef) -> Resolution<'_, Definition> {
        self.lookup(self.definitions.get(reference.target_name()))
    }

    pub fn resolve_parameter_ref(&self, reference: &TypeRef) -> Resolution<'_, Parameter> {
        self.lookup(self.parameters.get(reference.target_name()))
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Definitions keyed by canonical type name
    pub fn definitions_by_type_name(&self) -> BTreeMap<&str, &Definition> {
        self.definitions
            .values()
            .map(|definition| (definition.type_name.as_str(), definition))
            .collect()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    fn lookup<'a, T>(&self, found: Option<&'a T>) -> Resolution<'a, T> {
        match found {
            Some(value) => Resolution::Resolved(value),
            None if self.sealed => Resolution::Missing,
            None => Resolution::Pending,
        }
    }
}
