#[cfg(test)]
#[path = "../../../tests/unit/construction/states/route_state_test.rs"]
mod route_state_test;

use rustc_hash::FxHashMap;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed state key: a unique id bound to the type of value stored under it.
pub struct StateKey<T> {
    id: i32,
    phantom: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Creates a new state key.
    pub const fn new(id: i32) -> Self {
        Self { id, phantom: PhantomData }
    }

    /// Returns key id.
    pub fn id(&self) -> i32 {
        self.id
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

/// Keeps route and activity states as a typed heterogeneous map.
/// Activity states are stored per activity index, so they are valid only until the route is changed:
/// route state updaters should be run after any mutation.
#[derive(Clone, Default)]
pub struct RouteState {
    route_states: FxHashMap<i32, Arc<dyn Any + Send + Sync>>,
    activity_states: FxHashMap<i32, Arc<dyn Any + Send + Sync>>,
}

impl RouteState {
    /// Gets value associated with key converted to given type.
    pub fn get_route_state<T: Send + Sync + 'static>(&self, key: StateKey<T>) -> Option<&T> {
        self.route_states.get(&key.id).map(|state| downcast_state(key.id, state.as_ref()))
    }

    /// Gets value associated with key or returns default value.
    pub fn get_route_state_or<T: Copy + Send + Sync + 'static>(&self, key: StateKey<T>, default: T) -> T {
        self.get_route_state(key).copied().unwrap_or(default)
    }

    /// Puts value associated with key.
    pub fn put_route_state<T: Send + Sync + 'static>(&mut self, key: StateKey<T>, value: T) {
        self.route_states.insert(key.id, Arc::new(value));
    }

    /// Gets value associated with key for activity at given index.
    pub fn get_activity_state<T: Send + Sync + 'static>(&self, key: StateKey<T>, index: usize) -> Option<&T> {
        self.activity_states
            .get(&key.id)
            .and_then(|states| downcast_state::<Vec<Option<T>>>(key.id, states.as_ref()).get(index))
            .and_then(|value| value.as_ref())
    }

    /// Gets value associated with key for activity at given index or returns default value.
    pub fn get_activity_state_or<T: Copy + Send + Sync + 'static>(
        &self,
        key: StateKey<T>,
        index: usize,
        default: T,
    ) -> T {
        self.get_activity_state(key, index).copied().unwrap_or(default)
    }

    /// Puts value associated with key for activity at given index.
    pub fn put_activity_state<T: Clone + Send + Sync + 'static>(&mut self, key: StateKey<T>, index: usize, value: T) {
        let states = self.activity_states.entry(key.id).or_insert_with(|| Arc::new(Vec::<Option<T>>::new()));

        if Arc::get_mut(states).is_none() {
            let copy = downcast_state::<Vec<Option<T>>>(key.id, states.as_ref()).clone();
            *states = Arc::new(copy);
        }

        let states = Arc::get_mut(states)
            .and_then(|states| states.downcast_mut::<Vec<Option<T>>>())
            .unwrap_or_else(|| panic!("state with key {} has unexpected type", key.id));

        if states.len() <= index {
            states.resize(index + 1, None);
        }
        states[index] = Some(value);
    }

    /// Puts values associated with key for all activities, index in vector is activity index.
    pub fn put_activity_states<T: Clone + Send + Sync + 'static>(&mut self, key: StateKey<T>, values: Vec<T>) {
        self.activity_states.insert(key.id, Arc::new(values.into_iter().map(Some).collect::<Vec<_>>()));
    }

    /// Removes all route and activity states.
    pub fn clear(&mut self) {
        self.route_states.clear();
        self.activity_states.clear();
    }
}

fn downcast_state<T: 'static>(id: i32, state: &(dyn Any + Send + Sync)) -> &T {
    state.downcast_ref::<T>().unwrap_or_else(|| panic!("state with key {id} has unexpected type"))
}
