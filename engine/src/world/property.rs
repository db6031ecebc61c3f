//! Properties and activities (spec.md §3, §4.1).
//!
//! A property is a named, arity-n partial function from tuples of ids
//! to a value, backed by a nested map *and* a dispatch list of rules.
//! Lookup first walks the map; only when no explicit value is stored
//! does it fall through to the rule chain (latest-registered rule
//! wins, earlier rules are the fallback via `next`). This keeps the
//! fast path O(arity) and means author data overrides rule defaults.
//!
//! An activity is the same mechanism without the map — a pure
//! dispatchable operation, used for procedures like `move_backdrops`
//! or `describe_room` that have no per-entity stored value to shadow.

use std::collections::HashMap;

use crate::dispatch::Generic;

use super::error::WorldError;
use super::id::EntityId;
use super::value::Value;
use super::World;

/// A named, arity-n property: explicit map storage with a rule-based
/// fallback chain.
pub struct Property {
    name: String,
    arity: usize,
    map: HashMap<Vec<EntityId>, Value>,
    rules: Generic<World, Vec<EntityId>, Value>,
    default: Option<Value>,
}

impl Property {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        let name = name.into();
        Self {
            rules: Generic::new(format!("property:{name}")),
            name,
            arity,
            map: HashMap::new(),
            default: None,
        }
    }

    /// A property with a static fallback value used when neither the
    /// map nor any rule has an answer (e.g. `fixed_in_place` defaults
    /// to `false`).
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    fn check_arity(&self, key: &[EntityId]) -> Result<(), WorldError> {
        if key.len() != self.arity {
            return Err(WorldError::ArityMismatch {
                property: self.name.clone(),
                expected: self.arity,
                got: key.len(),
            });
        }
        Ok(())
    }

    /// `set(a_1, ..., a_n, v)`: writes directly into the map, overriding
    /// any rule-derived value for this key.
    pub fn set(&mut self, key: &[EntityId], value: impl Into<Value>) -> Result<(), WorldError> {
        self.check_arity(key)?;
        self.map.insert(key.to_vec(), value.into());
        Ok(())
    }

    /// Removes an explicit value, reverting lookups for this key back
    /// to the rule chain.
    pub fn unset(&mut self, key: &[EntityId]) {
        self.map.remove(key);
    }

    pub fn has_explicit(&self, key: &[EntityId]) -> bool {
        self.map.contains_key(key)
    }

    /// Looks up a value: map first, then the rule chain, then the
    /// static default.
    pub fn get(&self, world: &World, key: &[EntityId]) -> Result<Option<Value>, WorldError> {
        self.check_arity(key)?;
        if let Some(v) = self.map.get(key) {
            return Ok(Some(v.clone()));
        }
        match self.rules.call(world, &key.to_vec()) {
            Ok(v) => Ok(Some(v)),
            Err(_) if self.default.is_some() => Ok(self.default.clone()),
            Err(_) => Ok(None),
        }
    }

    /// Registers a rule method (see [`Generic`] for ordering semantics).
    pub fn rule(
        &mut self,
        name: impl Into<String>,
        handler: impl for<'a> Fn(
                &'a World,
                &'a Vec<EntityId>,
                crate::dispatch::Next<'a, World, Vec<EntityId>, Value>,
            ) -> Value
            + 'static,
    ) {
        self.rules.append(name, handler);
    }

    /// Registers a guarded rule method.
    pub fn rule_when(
        &mut self,
        name: impl Into<String>,
        guard: impl Fn(&World, &Vec<EntityId>) -> bool + 'static,
        handler: impl for<'a> Fn(
                &'a World,
                &'a Vec<EntityId>,
                crate::dispatch::Next<'a, World, Vec<EntityId>, Value>,
            ) -> Value
            + 'static,
    ) {
        self.rules.append_guarded(name, guard, handler);
    }
}

/// A pure dispatchable operation with no backing map (spec.md §3).
pub struct Activity {
    name: String,
    ops: Generic<World, Vec<EntityId>, Value>,
}

impl Activity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ops: Generic::new(format!("activity:{name}")),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(
        &mut self,
        name: impl Into<String>,
        handler: impl for<'a> Fn(
                &'a World,
                &'a Vec<EntityId>,
                crate::dispatch::Next<'a, World, Vec<EntityId>, Value>,
            ) -> Value
            + 'static,
    ) {
        self.ops.append(name, handler);
    }

    pub fn rule_when(
        &mut self,
        name: impl Into<String>,
        guard: impl Fn(&World, &Vec<EntityId>) -> bool + 'static,
        handler: impl for<'a> Fn(
                &'a World,
                &'a Vec<EntityId>,
                crate::dispatch::Next<'a, World, Vec<EntityId>, Value>,
            ) -> Value
            + 'static,
    ) {
        self.ops.append_guarded(name, guard, handler);
    }

    pub fn call(&self, world: &World, key: &[EntityId]) -> Result<Value, WorldError> {
        Ok(self.ops.call(world, &key.to_vec())?)
    }
}
