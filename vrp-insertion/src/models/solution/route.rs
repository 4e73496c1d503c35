use crate::models::problem::Actor;
use crate::models::solution::Tour;
use std::sync::Arc;

/// Represents a tour performing jobs by an actor.
#[derive(Clone)]
pub struct Route {
    /// An actor associated within route.
    pub actor: Arc<Actor>,
    /// Specifies job tour assigned to this route.
    pub tour: Tour,
}

impl Route {
    /// Creates an empty route: only start and end activities are present.
    pub fn new(actor: Arc<Actor>) -> Self {
        let tour = Tour::new(actor.as_ref());
        Self { actor, tour }
    }
}
