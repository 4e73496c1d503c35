#[cfg(test)]
#[path = "../../../tests/unit/models/solution/registry_test.rs"]
mod registry_test;

use crate::models::problem::{Actor, ActorKey, Fleet};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Specifies an entity responsible for providing actors and keeping track of their usage.
/// Actors are grouped by their key keeping fleet order, so iteration order is stable.
#[derive(Clone)]
pub struct Registry {
    groups: Vec<(ActorKey, Vec<Arc<Actor>>)>,
    used: FxHashSet<Arc<Actor>>,
}

impl Registry {
    /// Creates a new instance of [`Registry`].
    pub fn new(fleet: &Fleet) -> Self {
        let groups = fleet.actors.iter().fold(Vec::<(ActorKey, Vec<Arc<Actor>>)>::new(), |mut acc, actor| {
            let key = ActorKey::new(actor);
            match acc.iter_mut().find(|(other, _)| *other == key) {
                Some((_, actors)) => actors.push(actor.clone()),
                None => acc.push((key, vec![actor.clone()])),
            }
            acc
        });

        Self { groups, used: Default::default() }
    }

    /// Removes actor from the list of available actors (locks it).
    /// Returns false if actor was already in use.
    pub fn use_actor(&mut self, actor: &Arc<Actor>) -> bool {
        self.used.insert(actor.clone())
    }

    /// Adds actor to the list of available actors (unlocks it).
    /// Returns false if actor was not in use.
    pub fn free_actor(&mut self, actor: &Arc<Actor>) -> bool {
        self.used.remove(actor)
    }

    /// Checks whether actor is available.
    pub fn is_available(&self, actor: &Arc<Actor>) -> bool {
        !self.used.contains(actor)
    }

    /// Returns all actors.
    pub fn all(&self) -> impl Iterator<Item = Arc<Actor>> + '_ {
        self.groups.iter().flat_map(|(_, actors)| actors.iter().cloned())
    }

    /// Returns list of all available actors.
    pub fn available(&self) -> impl Iterator<Item = Arc<Actor>> + '_ {
        self.all().filter(move |actor| self.is_available(actor))
    }

    /// Returns next available actor from each different key (vehicle type and start location).
    pub fn next(&self) -> impl Iterator<Item = Arc<Actor>> + '_ {
        self.groups.iter().filter_map(move |(_, actors)| actors.iter().find(|a| self.is_available(a)).cloned())
    }
}
