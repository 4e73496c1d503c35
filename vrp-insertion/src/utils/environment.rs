use crate::utils::{DefaultRandom, Random};
use std::sync::Arc;

/// A logger type which is called with various information regarding the work done by the insertion engine.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Keeps track of environment specific information which influences algorithm behavior.
#[derive(Clone)]
pub struct Environment {
    /// A wrapper on random generator.
    pub random: Arc<dyn Random + Send + Sync>,

    /// An information logger.
    pub logger: InfoLogger,

    /// True if evaluation phase can use the thread pool.
    pub is_parallel: bool,
}

impl Environment {
    /// Creates an instance of `Environment`.
    pub fn new(random: Arc<dyn Random + Send + Sync>, logger: InfoLogger, is_parallel: bool) -> Self {
        Self { random, logger, is_parallel }
    }

    /// Creates an instance of `Environment` which writes nothing.
    pub fn silent() -> Self {
        Self { logger: Arc::new(|_| {}), ..Self::default() }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(Arc::new(DefaultRandom::default()), Arc::new(|msg| println!("{msg}")), true)
    }
}
