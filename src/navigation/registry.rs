use std::collections::HashMap;

use crate::navigation::error::NavigationError;
use crate::navigation::step::{NavigateStep, Prerequisite, Subject};

/// Registered destination, as listed by [`Registry::destinations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationInfo<K> {
    pub kind: K,
    pub name: &'static str,
    pub prerequisite: Prerequisite,
}

/// Table of `(subject kind, destination name) -> step`.
///
/// Built once before any navigation happens and only read afterwards.
pub struct Registry<S: Subject> {
    steps: HashMap<S::Kind, HashMap<&'static str, Box<dyn NavigateStep<S>>>>,
    order: Vec<(S::Kind, &'static str)>,
}

impl<S: Subject> Registry<S> {
    pub fn new() -> Self {
        Self {
            steps: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a step. A second step for the same pair is rejected.
    pub fn register<T>(&mut self, kind: S::Kind, name: &'static str, step: T) -> Result<(), NavigationError>
    where
        T: NavigateStep<S> + 'static,
    {
        let by_name = self.steps.entry(kind).or_default();
        if by_name.contains_key(name) {
            return Err(NavigationError::Duplicate {
                kind: kind.to_string(),
                destination: name.into(),
            });
        }
        by_name.insert(name, Box::new(step));
        self.order.push((kind, name));
        Ok(())
    }

    pub fn get(&self, kind: S::Kind, name: &str) -> Option<&dyn NavigateStep<S>> {
        self.steps
            .get(&kind)
            .and_then(|by_name| by_name.get(name))
            .map(|step| step.as_ref())
    }

    pub fn contains(&self, kind: S::Kind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All destinations in registration order.
    pub fn destinations(&self) -> Vec<DestinationInfo<S::Kind>> {
        self.order
            .iter()
            .filter_map(|&(kind, name)| {
                self.get(kind, name).map(|step| DestinationInfo {
                    kind,
                    name,
                    prerequisite: step.prerequisite(),
                })
            })
            .collect()
    }
}

impl<S: Subject> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}
