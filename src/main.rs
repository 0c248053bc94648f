use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use mapf_lns::config::{Cli, Config};
use mapf_lns::map::Map;
use mapf_lns::scenario::Scenario;
use mapf_lns::solver::InitLns;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {path}"))?;
            Config::from_yaml_str(&config_str)?
        }
        None => Config::default(),
    }
    .override_from_command_line(&cli)?;

    let filter = match config.screen {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let agents = if let Some(scen_path) = &config.scen_path {
        let scen = Scenario::load_from_scen(scen_path)
            .with_context(|| format!("failed to load scenario {scen_path}"))?;
        scen.generate_agents(config.num_agents, &mut rng)?
    } else {
        let yaml_path = config.agent_yaml_path.as_ref().unwrap();
        Scenario::load_agents_from_yaml(yaml_path)?
    };

    let map = Map::from_file(&config.map_path, &agents)
        .with_context(|| format!("failed to load map {}", config.map_path))?;
    for agent in &agents {
        if !agent.verify(&map) {
            return Err(anyhow!("agent {} has a blocked start or goal", agent.id));
        }
    }

    info!(
        "solving {} agents on a {}x{} map",
        agents.len(),
        map.height,
        map.width
    );
    let mut solver = InitLns::new(&map, agents, &config);
    let solved = solver.run();
    if solved {
        info!("collision free plan found");
        solver.solution().log_solution("InitLNS(PP;PP)");
    } else {
        info!(
            "no collision free plan; {} colliding pairs remain",
            solver.num_of_colliding_pairs
        );
    }
    solver.stats.print(solver.num_of_colliding_pairs);

    if let Some(path) = &config.iter_stats_output {
        solver.write_iter_stats_to_file(path)?;
    }
    if let Some(path) = &config.result_output {
        solver.write_result_to_file(path)?;
    }
    if let Some(path) = &config.paths_output {
        solver.write_paths_to_file(path)?;
    }

    Ok(())
}
