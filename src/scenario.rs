use anyhow::{anyhow, Result};
use rand::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::info;

use crate::common::Agent;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Route {
    pub start_x: usize,
    pub start_y: usize,
    pub goal_x: usize,
    pub goal_y: usize,
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub map: String,
    pub map_width: usize,
    pub map_height: usize,
    pub routes: Vec<Route>,
}

impl Scenario {
    pub fn load_from_scen(path: &str) -> io::Result<Scenario> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines().map(|line| line.unwrap());

        // First line is "version x.x" which we can skip
        let _version = lines.next().unwrap();

        let mut scenario = Scenario {
            map: String::new(),
            map_width: 0,
            map_height: 0,
            routes: Vec::new(),
        };

        for line in lines {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 8 {
                continue;
            }

            // Benchmark columns are (bucket, map, width, height, x, y, gx, gy)
            // with x as the column, so the row index comes second.
            let route = Route {
                start_x: parts[5].parse().unwrap(),
                start_y: parts[4].parse().unwrap(),
                goal_x: parts[7].parse().unwrap(),
                goal_y: parts[6].parse().unwrap(),
            };

            if scenario.map.is_empty() {
                scenario.map = parts[1].to_string();
                scenario.map_width = parts[2].parse().unwrap();
                scenario.map_height = parts[3].parse().unwrap();
            }

            scenario.routes.push(route);
        }

        Ok(scenario)
    }

    pub fn generate_agents<R: Rng + ?Sized>(
        &self,
        num_agents: usize,
        rng: &mut R,
    ) -> Result<Vec<Agent>> {
        if self.routes.len() < num_agents {
            return Err(anyhow!(
                "scenario holds {} routes but {} agents were requested",
                self.routes.len(),
                num_agents
            ));
        }

        let mut available_routes = self.routes.clone();
        available_routes.shuffle(rng);

        let agents: Vec<Agent> = available_routes
            .into_iter()
            .take(num_agents)
            .enumerate()
            .map(|(agent_id, route)| Agent {
                id: agent_id,
                start: (route.start_x, route.start_y),
                goal: (route.goal_x, route.goal_y),
            })
            .collect();

        info!("Generate scen: {agents:?}");
        Ok(agents)
    }

    pub fn load_agents_from_yaml(path: &str) -> Result<Vec<Agent>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let agents: Vec<Agent> = serde_yaml::from_reader(reader)?;
        Ok(agents)
    }

    pub fn write_agents_to_yaml(path: &str, agents: &[Agent]) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(&agents)?;
        writer.write_all(yaml_data.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_agents_is_seed_deterministic() {
        let scenario = Scenario {
            map: "empty-8-8.map".to_string(),
            map_width: 8,
            map_height: 8,
            routes: (0..6)
                .map(|i| Route {
                    start_x: i,
                    start_y: 0,
                    goal_x: i,
                    goal_y: 7,
                })
                .collect(),
        };

        let mut rng_1 = StdRng::seed_from_u64(42);
        let mut rng_2 = StdRng::seed_from_u64(42);
        let agents_1 = scenario.generate_agents(3, &mut rng_1).unwrap();
        let agents_2 = scenario.generate_agents(3, &mut rng_2).unwrap();

        assert_eq!(agents_1, agents_2);
        assert_eq!(agents_1.len(), 3);
        assert_eq!(agents_1[0].id, 0);
    }

    #[test]
    fn test_generate_agents_rejects_oversubscription() {
        let scenario = Scenario {
            map: "empty-8-8.map".to_string(),
            map_width: 8,
            map_height: 8,
            routes: vec![Route {
                start_x: 0,
                start_y: 0,
                goal_x: 1,
                goal_y: 1,
            }],
        };

        let mut rng = StdRng::seed_from_u64(0);
        assert!(scenario.generate_agents(2, &mut rng).is_err());
    }
}
