use anyhow::Result;
use tourney_core::{EngineConfig, MemoryStorage, StatsEngine};

pub mod catalog;

use catalog::catalog_scenarios;

/// Per-run inputs handed to a scenario's expectation.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub iteration: usize,
    pub config: EngineConfig,
    pub verbose: bool,
}

impl ScenarioCtx {
    /// Seed mixed with the iteration number so repeated runs explore different inputs.
    #[must_use]
    pub fn iteration_seed(&self) -> u64 {
        self.seed
            .wrapping_add(u64::try_from(self.iteration).unwrap_or(u64::MAX))
    }

    /// Engine over throwaway in-memory storage using this run's configuration.
    #[must_use]
    pub fn fresh_engine(&self) -> StatsEngine<MemoryStorage> {
        StatsEngine::open(MemoryStorage::new(), self.config.clone())
    }
}

pub type Expectation = fn(&ScenarioCtx) -> Result<()>;

/// Logic scenario: a named expectation run against the engine.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Seeded scenarios run once per seed and iteration; the rest run once.
    pub seeded: bool,
    pub expectation: Expectation,
}

impl TestScenario {
    #[must_use]
    pub const fn fixed(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        expectation: Expectation,
    ) -> Self {
        Self {
            key,
            name,
            description,
            seeded: false,
            expectation,
        }
    }

    #[must_use]
    pub const fn seeded(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        expectation: Expectation,
    ) -> Self {
        Self {
            key,
            name,
            description,
            seeded: true,
            expectation,
        }
    }

    /// Run the expectation once.
    ///
    /// # Errors
    ///
    /// Returns the first expectation that did not hold.
    pub fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        (self.expectation)(ctx)
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let wanted = name.to_lowercase();
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == wanted)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

/// Every scenario key, in catalog order.
pub fn scenario_keys() -> Vec<&'static str> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| scenario.key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let scenario = get_scenario("Merge-Weighted").expect("known scenario");
        assert_eq!(scenario.key, "merge-weighted");
        assert!(get_scenario("nope").is_none());
    }

    #[test]
    fn keys_are_unique() {
        let mut keys = scenario_keys();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn iteration_seed_offsets_base_seed() {
        let ctx = ScenarioCtx {
            seed: u64::MAX,
            iteration: 2,
            config: EngineConfig::default_config(),
            verbose: false,
        };
        assert_eq!(ctx.iteration_seed(), 1);
    }
}
