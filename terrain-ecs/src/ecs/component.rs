// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Component storage and management
//!
//! Components are plain data records attached to entities. Each component
//! kind in this crate is a structure-of-arrays: one attribute stream per
//! element (ball, particle, ...) plus the shared element count.
//!
//! Storage is a sparse map from [`Entity`] to one value of a single
//! component type. Systems mutate components with an explicit
//! read-modify-write cycle: [`ComponentManager::take`] checks a record out,
//! the system edits its own copy, and [`ComponentManager::add`] writes it back.
//! Nothing hands out aliased references into the store across that cycle.

use crate::ecs::Entity;
use crate::error::EcsError;
use std::collections::HashMap;

/// Trait that all components must implement
///
/// Components are plain data: they own no external resources and carry no
/// behavior beyond reporting how many elements they hold.
pub trait Component: Clone + Send + Sync + 'static {
    /// Human-readable component name used in errors and logs
    const NAME: &'static str;

    /// Number of elements described by this record
    fn size(&self) -> usize;
}

/// Sparse store mapping an entity to its component of type `T`
///
/// At most one component of type `T` exists per entity. Components are only
/// removed explicitly; there is no implicit cleanup tied to entities.
///
/// # Example
///
/// ```
/// use terrain_ecs::ecs::{ComponentManager, Entity};
/// use terrain_ecs::ecs::components::Position;
///
/// let mut positions = ComponentManager::<Position>::new();
/// let entity = Entity::new(0);
/// positions.add(entity, Position::zeroed(4));
///
/// assert!(positions.has(entity));
/// assert_eq!(positions.get(entity).unwrap().x().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ComponentManager<T: Component> {
    components: HashMap<Entity, T>,
}

impl<T: Component> ComponentManager<T> {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty manager with room for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        ComponentManager {
            components: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or replace the component for `entity`
    pub fn add(&mut self, entity: Entity, component: T) {
        self.components.insert(entity, component);
    }

    /// Get the component for `entity`
    ///
    /// Fails with [`EcsError::ComponentNotFound`] when the entity has none.
    pub fn get(&self, entity: Entity) -> Result<&T, EcsError> {
        self.components
            .get(&entity)
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: T::NAME,
            })
    }

    /// Get the component for `entity`, if present
    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    /// Check whether `entity` has a component of this type
    pub fn has(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    /// Remove the component for `entity`; no-op when absent
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    /// Check a component out of storage for mutation
    ///
    /// The caller owns the record until it is written back with [`add`](Self::add).
    /// While checked out, [`has`](Self::has) reports `false` for the entity.
    pub fn take(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    /// Full entity to component mapping, for bulk iteration
    pub fn all_components(&self) -> &HashMap<Entity, T> {
        &self.components
    }

    /// Entities that currently have this component, in no particular order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.components.keys().copied()
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if no components are stored
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Remove every component
    pub fn clear(&mut self) {
        self.components.clear();
    }
}

impl<T: Component> Default for ComponentManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestComponent {
        values: Vec<f32>,
    }

    impl Component for TestComponent {
        const NAME: &'static str = "TestComponent";

        fn size(&self) -> usize {
            self.values.len()
        }
    }

    fn component(values: &[f32]) -> TestComponent {
        TestComponent {
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_add_has_get_round_trip() {
        let mut manager = ComponentManager::<TestComponent>::new();
        let entity = Entity::new(1);
        let value = component(&[1.0, 2.0, 3.0]);

        manager.add(entity, value.clone());

        assert!(manager.has(entity));
        assert_eq!(manager.get(entity), Ok(&value));
    }

    #[test]
    fn test_remove_then_has_is_false() {
        let mut manager = ComponentManager::<TestComponent>::new();
        let entity = Entity::new(1);
        manager.add(entity, component(&[1.0]));

        assert_eq!(manager.remove(entity), Some(component(&[1.0])));
        assert!(!manager.has(entity));

        // Removing again is a no-op
        assert_eq!(manager.remove(entity), None);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let manager = ComponentManager::<TestComponent>::new();
        let entity = Entity::new(9);

        assert_eq!(
            manager.get(entity),
            Err(EcsError::ComponentNotFound {
                entity,
                component: "TestComponent"
            })
        );
        assert!(manager.try_get(entity).is_none());
    }

    #[test]
    fn test_add_replaces_existing() {
        let mut manager = ComponentManager::<TestComponent>::new();
        let entity = Entity::new(1);

        manager.add(entity, component(&[1.0]));
        manager.add(entity, component(&[5.0, 6.0]));

        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get(entity).unwrap().size(), 2);
    }

    #[test]
    fn test_local_copy_does_not_touch_storage_until_written_back() {
        let mut manager = ComponentManager::<TestComponent>::new();
        let entity = Entity::new(1);
        manager.add(entity, component(&[1.0]));

        let mut copy = manager.get(entity).unwrap().clone();
        copy.values[0] = 99.0;
        assert_eq!(manager.get(entity).unwrap().values[0], 1.0);

        manager.add(entity, copy);
        assert_eq!(manager.get(entity).unwrap().values[0], 99.0);
    }

    #[test]
    fn test_take_and_write_back() {
        let mut manager = ComponentManager::<TestComponent>::new();
        let entity = Entity::new(4);
        manager.add(entity, component(&[2.0]));

        let mut checked_out = manager.take(entity).unwrap();
        assert!(!manager.has(entity));

        checked_out.values[0] += 1.0;
        manager.add(entity, checked_out);
        assert_eq!(manager.get(entity).unwrap().values, vec![3.0]);
    }

    #[test]
    fn test_all_components_and_clear() {
        let mut manager = ComponentManager::<TestComponent>::with_capacity(8);
        for i in 0..5 {
            manager.add(Entity::new(i), component(&[i as f32]));
        }

        assert_eq!(manager.all_components().len(), 5);
        let mut ids: Vec<u64> = manager.entities().map(|e| e.id()).collect();
        ids.sort();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        manager.clear();
        assert!(manager.is_empty());
    }
}
