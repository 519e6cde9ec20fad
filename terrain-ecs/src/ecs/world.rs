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
//! World management
//!
//! The World owns the entity sequence and one [`ComponentManager`] per
//! component kind. Systems borrow both for the duration of a single call.

use crate::ecs::components::{Movement, PhysicsBall, Position, RenderIntent, Timer};
use crate::ecs::{ComponentManager, Entity};

/// One component manager per kernel component kind
#[derive(Debug, Clone, Default)]
pub struct Stores {
    /// Element positions
    pub positions: ComponentManager<Position>,
    /// Element velocities
    pub movements: ComponentManager<Movement>,
    /// Ball parameters for the physics system
    pub balls: ComponentManager<PhysicsBall>,
    /// Element lifecycles
    pub timers: ComponentManager<Timer>,
    /// Host-facing render descriptions
    pub renders: ComponentManager<RenderIntent>,
}

impl Stores {
    /// Create empty stores
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every component of every kind
    pub fn clear(&mut self) {
        self.positions.clear();
        self.movements.clear();
        self.balls.clear();
        self.timers.clear();
        self.renders.clear();
    }
}

/// The main ECS world container
///
/// Entities are append-only: ids are handed out in increasing order and the
/// sequence keeps creation order, which is also the order systems visit them.
///
/// # Example
///
/// ```
/// use terrain_ecs::ecs::World;
/// use terrain_ecs::ecs::components::Position;
///
/// let mut world = World::new();
/// let entity = world.create_entity();
/// world.stores_mut().positions.add(entity, Position::zeroed(10));
///
/// assert_eq!(world.entity_count(), 1);
/// assert!(world.stores().positions.has(entity));
/// ```
#[derive(Debug, Clone, Default)]
pub struct World {
    next_entity_id: u64,
    entities: Vec<Entity>,
    stores: Stores,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity and append it to the sequence
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.push(entity);
        entity
    }

    /// Entities in creation order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether `entity` was created by this world
    pub fn contains(&self, entity: Entity) -> bool {
        entity.id() < self.next_entity_id
    }

    /// Component stores
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Mutable component stores
    pub fn stores_mut(&mut self) -> &mut Stores {
        &mut self.stores
    }

    /// Borrow the entity sequence and the stores at the same time, as systems need
    pub fn split_mut(&mut self) -> (&[Entity], &mut Stores) {
        (&self.entities, &mut self.stores)
    }

    /// Drop all entities and components
    pub fn clear(&mut self) {
        self.entities.clear();
        self.stores.clear();
        self.next_entity_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_keep_creation_order() {
        let mut world = World::new();
        let e0 = world.create_entity();
        let e1 = world.create_entity();
        let e2 = world.create_entity();

        assert_eq!(world.entities(), &[e0, e1, e2]);
        assert_eq!(e2.id(), 2);
        assert!(world.contains(e1));
        assert!(!world.contains(Entity::new(3)));
    }

    #[test]
    fn test_split_mut_gives_entities_and_stores() {
        let mut world = World::new();
        let entity = world.create_entity();

        let (entities, stores) = world.split_mut();
        for e in entities {
            stores.positions.add(*e, Position::zeroed(2));
        }

        assert!(world.stores().positions.has(entity));
    }

    #[test]
    fn test_world_clear() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.stores_mut().timers.add(entity, Timer::from_lifetimes(&[1.0], true));

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.stores().timers.is_empty());
        assert_eq!(world.create_entity().id(), 0);
    }
}
