use std::{error::Error, fs, path::Path};

use log::info;
use zombie_rl::{
    algo::tabular::q_table::{QTableAgent, QTableAgentConfig},
    decay,
    env::Environment,
    exploration::EpsilonGreedy,
    gym::{zombie_field::ZombieFieldConfig, ZombieField},
};

const NUM_EPISODES: u32 = 1000;
const LOG_EVERY: u32 = 100;

/// An episode scoring above this with the shaped rewards has reached the exit
const SOLVED_REWARD: f64 = 5000.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = Path::new("demos/train");
    let shaped = std::env::args().any(|arg| arg == "--shaped");

    let (config, agent_config) = if shaped {
        let agent_config = QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Multiplicative::new(0.995, 0.3, 0.01)?),
            alpha: 0.2,
            gamma: 0.99,
            seed: None,
        };
        (ZombieFieldConfig::shaped(), agent_config)
    } else {
        (ZombieFieldConfig::default(), QTableAgentConfig::default())
    };

    let mut env = ZombieField::new(config)?;
    let mut agent = QTableAgent::new(agent_config);

    fs::create_dir_all(path.join("out"))?;
    let mut wtr = csv::Writer::from_path(path.join("out/data.csv"))?;
    wtr.write_record(["episode", "reward", "steps", "kills"])?;

    let mut rewards = Vec::with_capacity(NUM_EPISODES as usize);
    let mut lengths = Vec::with_capacity(NUM_EPISODES as usize);
    let mut best = f64::NEG_INFINITY;

    for i in 1..=NUM_EPISODES {
        agent.go(&mut env);

        let report = env.report.take();
        let (reward, steps, kills) = (report["reward"], report["steps"], report["kills"]);
        wtr.write_record(&[
            i.to_string(),
            reward.to_string(),
            steps.to_string(),
            kills.to_string(),
        ])?;
        rewards.push(reward);
        lengths.push(steps);
        best = best.max(reward);

        if i % LOG_EVERY == 0 {
            let window = LOG_EVERY as usize;
            let mean = |v: &[f64]| v[v.len() - window..].iter().sum::<f64>() / window as f64;
            info!(
                "episode {i}/{NUM_EPISODES}: avg reward {:.2}, avg length {:.2}, best {best:.2}, epsilon {:.3}, states {}",
                mean(&rewards),
                mean(&lengths),
                agent.epsilon(),
                agent.q_table().len(),
            );
        }

        if shaped && reward > SOLVED_REWARD {
            info!("solved the zombie field in episode {i}");
            break;
        }
    }

    wtr.flush()?;
    env.close();

    Ok(())
}
