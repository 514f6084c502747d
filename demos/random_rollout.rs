use std::{env, fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use mdpgym::prelude::*;
use strum::IntoEnumIterator;
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const EPISODES: usize = 10;

fn main() -> Result<()> {
    let _guard = init_tracing()?;

    println!("Running {EPISODES} random episodes per environment...");

    for preset in GridPreset::iter() {
        let cfg = GridEnvConfig::from(preset)
            .with_max_episode_steps(500)
            .with_seed(7);
        let summary = match preset {
            GridPreset::WindyGridworld => rollout(&mut WindyGridworldEnv::from_config(cfg)?)?,
            GridPreset::BerryPatch | GridPreset::BerryPatchNoSnakes => {
                rollout(&mut BerryPatchEnv::from_config(cfg)?)?
            }
        };
        summary.print(&preset.to_string());
    }

    // The customer simulator needs the KDD-98 tuples and the exported predictors:
    //   cargo run --example random_rollout -- <tuples.csv> <model_dir>
    let mut args = env::args().skip(1);
    if let (Some(data), Some(models)) = (args.next(), args.next()) {
        let cfg = CustomerSimConfig::new(PathBuf::from(data), PathBuf::from(models));
        let mut sim =
            CustomerSimEnv::from_config(&cfg).context("Failed to build customer simulator")?;
        rollout(&mut sim)?.print("CustomerSim");
    } else {
        println!("CustomerSim skipped (pass <tuples.csv> <model_dir> to run it)");
    }

    Ok(())
}

// ================================================================================================
// Rollouts
// ================================================================================================

struct Summary {
    mean_return: f64,
    mean_length: f64,
    truncated: usize,
    elapsed: std::time::Duration,
}

impl Summary {
    fn print(&self, name: &str) {
        println!(
            "{name:<20} mean return {:>9.2}   mean length {:>7.1}   truncated {:>2}/{EPISODES}   {:?}",
            self.mean_return, self.mean_length, self.truncated, self.elapsed
        );
    }
}

fn rollout<E: Env>(env: &mut E) -> Result<Summary> {
    let start = Instant::now();
    let mut returns = Vec::with_capacity(EPISODES);
    let mut lengths = Vec::with_capacity(EPISODES);
    let mut truncated = 0;

    for episode in 0..EPISODES {
        env.reset()?;
        let mut total = Reward::default();
        let mut steps = 0u32;
        loop {
            let action = env.sample_action();
            let (_, reward, outcome, _) = env.step(action)?;
            total += reward;
            steps += 1;
            if outcome.is_terminal() {
                truncated += usize::from(outcome.is_truncated());
                break;
            }
        }
        info!(episode, steps, total = total.0, "Episode finished");
        returns.push(total.0);
        lengths.push(f64::from(steps));
    }
    env.close();

    Ok(Summary {
        mean_return: returns.iter().sum::<f64>() / EPISODES as f64,
        mean_length: lengths.iter().sum::<f64>() / EPISODES as f64,
        truncated,
        elapsed: start.elapsed(),
    })
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() -> Result<Option<WorkerGuard>> {
    let app_name = "mdpgym";

    // Detect if running in container
    let in_container =
        env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if in_container {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!("Logging to stdout (container mode)");
        return Ok(None);
    }

    let log_dir = dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
        .context("Failed to find a state directory")?
        .join(app_name)
        .join("logs");
    fs::create_dir_all(&log_dir)?;

    let timestamp = time::OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .context("Failed to format timestamp")?;
    let file_name = format!("{app_name}-{timestamp}.log");

    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_writer(non_blocking)
        .with_current_span(true)
        .with_thread_ids(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!(log_file = %log_dir.join(&file_name).display(), "Logging to file (local mode)");
    Ok(Some(guard))
}
