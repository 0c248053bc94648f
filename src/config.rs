use anyhow::bail;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::common::MAX_TIMESTEP;

#[derive(Parser, Debug)]
#[command(
    name = "mapf-lns",
    about = "Large neighborhood search MAPF solver implemented in Rust.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, short, help = "Path to the YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the map file")]
    pub map: Option<String>,

    #[arg(long, help = "Path to the scenario (.scen) file")]
    pub scen: Option<String>,

    #[arg(long, help = "Path to a YAML agent list")]
    pub agents: Option<String>,

    #[arg(long, help = "Number of agents drawn from the scenario")]
    pub num_agents: Option<usize>,

    #[arg(long, help = "Time limit in seconds")]
    pub time_limit: Option<f64>,

    #[arg(long, help = "RNG seed")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestroyStrategy {
    CollisionBased,
    TargetBased,
    RandomWalk,
}

impl DestroyStrategy {
    pub const COUNT: usize = 3;

    pub fn name(self) -> &'static str {
        match self {
            DestroyStrategy::CollisionBased => "COLLISION_BASED",
            DestroyStrategy::TargetBased => "TARGET_BASED",
            DestroyStrategy::RandomWalk => "RANDOM_WALK",
        }
    }

    pub(crate) fn from_index(index: usize) -> Self {
        match index {
            0 => DestroyStrategy::CollisionBased,
            1 => DestroyStrategy::TargetBased,
            _ => DestroyStrategy::RandomWalk,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            DestroyStrategy::CollisionBased => 0,
            DestroyStrategy::TargetBased => 1,
            DestroyStrategy::RandomWalk => 2,
        }
    }
}

#[derive(Serialize, Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub map_path: String,
    pub scen_path: Option<String>,
    pub agent_yaml_path: Option<String>,
    pub num_agents: usize,

    pub time_limit: f64,
    pub neighbor_size: usize,
    pub init_destroy_strategy: DestroyStrategy,
    pub adaptive: bool,
    pub init_algo_name: String,
    pub replan_algo_name: String,
    pub seed: u64,
    pub screen: usize,
    pub max_path_length: usize,

    pub iter_stats_output: Option<String>,
    pub result_output: Option<String>,
    pub paths_output: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_path: "map_file/test/test.map".to_string(),
            scen_path: None,
            agent_yaml_path: None,
            num_agents: 10,
            time_limit: 60.0,
            neighbor_size: 8,
            init_destroy_strategy: DestroyStrategy::CollisionBased,
            adaptive: false,
            init_algo_name: "PP".to_string(),
            replan_algo_name: "PP".to_string(),
            seed: 0,
            screen: 1,
            max_path_length: MAX_TIMESTEP,
            iter_stats_output: None,
            result_output: None,
            paths_output: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(config_str: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(config_str)?;
        config.validate()
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map) = &cli.map {
            self.map_path = map.clone();
        }
        if let Some(scen) = &cli.scen {
            self.scen_path = Some(scen.clone());
        }
        if let Some(agents) = &cli.agents {
            self.agent_yaml_path = Some(agents.clone());
        }
        if let Some(num_agents) = cli.num_agents {
            self.num_agents = num_agents;
        }
        if let Some(time_limit) = cli.time_limit {
            self.time_limit = time_limit;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        self.validate()
    }

    pub fn validate(self) -> anyhow::Result<Self> {
        for algo in [&self.init_algo_name, &self.replan_algo_name] {
            match algo.as_str() {
                "PP" => {}
                // Group CBS and priority based search live outside this crate.
                "GCBS" | "PBS" => bail!("{algo} replanning is not bundled; only PP is available"),
                other => bail!("unknown algorithm name {other:?}"),
            }
        }
        if self.neighbor_size < 2 {
            bail!("neighbor_size must be at least 2");
        }
        if self.time_limit <= 0.0 {
            bail!("time_limit must be positive");
        }
        if self.scen_path.is_none() && self.agent_yaml_path.is_none() {
            bail!("either scen_path or agent_yaml_path is required");
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_yaml() {
        let config = Config::from_yaml_str(
            "map_path: maps/empty-8-8.map\n\
             scen_path: scens/empty-8-8-random-1.scen\n\
             num_agents: 4\n\
             neighbor_size: 4\n\
             init_destroy_strategy: TARGET_BASED\n\
             seed: 7\n",
        )
        .unwrap();

        assert_eq!(config.num_agents, 4);
        assert_eq!(config.neighbor_size, 4);
        assert_eq!(config.init_destroy_strategy, DestroyStrategy::TargetBased);
        assert_eq!(config.seed, 7);
        // Unset keys keep their defaults.
        assert_eq!(config.time_limit, 60.0);
        assert_eq!(config.replan_algo_name, "PP");
    }

    #[test]
    fn test_config_rejects_external_replanner() {
        let result = Config::from_yaml_str(
            "scen_path: scens/empty-8-8-random-1.scen\n\
             replan_algo_name: PBS\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_tiny_neighborhood() {
        let result = Config::from_yaml_str(
            "scen_path: scens/empty-8-8-random-1.scen\n\
             neighbor_size: 1\n",
        );
        assert!(result.is_err());
    }
}
