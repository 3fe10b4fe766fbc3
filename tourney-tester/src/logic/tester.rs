use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tourney_core::EngineConfig;

use crate::scenario::{ScenarioCtx, TestScenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: Option<u64>,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    config: EngineConfig,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(config: EngineConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    /// Run `scenario` once per seed when it is seeded, otherwise a single time.
    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        if !scenario.seeded {
            if self.verbose {
                println!("🧪 Testing scenario: {}", scenario.name.bright_white());
            }
            return vec![self.run_single_scenario(scenario, None, 1)];
        }

        let mut results = Vec::new();
        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (seed: {seed}, iterations: {iterations})",
                    scenario.name.bright_white()
                );
            }
            results.push(self.run_single_scenario(scenario, Some(seed), iterations));
        }
        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: Option<u64>,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for iteration in 0..iterations {
            let ctx = ScenarioCtx {
                seed: seed.unwrap_or_default(),
                iteration,
                config: self.config.clone(),
                verbose: self.verbose,
            };
            let start_time = Instant::now();

            match scenario.run(&ctx) {
                Ok(()) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({duration:?})",
                            iteration + 1
                        );
                    }
                }
                Err(err) => {
                    let message = match seed {
                        Some(_) => format!(
                            "Iteration {} (seed {}): {err:#}",
                            iteration + 1,
                            ctx.iteration_seed()
                        ),
                        None => format!("{err:#}"),
                    };
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            iteration + 1,
                            message.clone().red()
                        );
                    }
                    log::debug!("{} failed: {message}", scenario.key);
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
