use chrono::Local;
use clap::Parser;
use deepracer_gym::agents::{Agent, CheckpointPaths, RandomAgent, ReplayBuffer};
use deepracer_gym::bridge::{spawn_reader, LinePublisher, LineServiceClient, SharedWriter};
use deepracer_gym::cli::Options;
use deepracer_gym::config::{AgentConfig, EnvConfig, TrainConfig};
use deepracer_gym::envs::{ActionSpace, RacecarEnv};
use deepracer_gym::logging::{run_name, DisplayLogger, TensorBoardLogger};
use deepracer_gym::sensors::{ApproximateTimeSynchronizer, SensorFusion};
use deepracer_gym::simulation::{run, TrainingDriver};
use std::error::Error;
use std::io::{self, BufReader};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    // stdout carries the command stream so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let opts = Options::parse();
    let env_config = EnvConfig::from(&opts);
    let agent_config = AgentConfig::from(&opts);
    let train_config = TrainConfig::from(&opts);
    env_config.validate()?;
    info!("Environment:\n{:#?}", env_config);
    info!("Agent:\n{:#?}", agent_config);
    info!("Training:\n{:#?}", train_config);

    let channels = spawn_reader(
        BufReader::new(io::stdin()),
        // Room for a full synchronizer queue of each stream
        opts.sync_queue_size.saturating_mul(2),
    )?;
    let writer = SharedWriter::new(io::stdout());
    let env = RacecarEnv::new(
        &env_config,
        train_config.max_episode_length,
        LinePublisher::new(writer.clone()),
        LineServiceClient::new(
            writer,
            channels.responses,
            Duration::from_millis(opts.service_timeout_ms),
        ),
    );

    let mut agent = RandomAgent::new(ActionSpace::default(), train_config.seed);
    if let Some(ref name) = train_config.load_checkpoint {
        let paths = CheckpointPaths::new(&train_config.model_dir, name);
        agent.load_model(&paths)?;
        info!(actor = %paths.actor.display(), critic = %paths.critic.display(), "model loaded");
    }
    info!(%agent, "agent ready");

    let log_dir = opts.log_dir.join(run_name(&Local::now(), &agent_config));
    info!(log_dir = %log_dir.display(), "logging to tensorboard");
    let logger = (TensorBoardLogger::new(&log_dir), DisplayLogger::default());

    let memory = ReplayBuffer::new(train_config.replay_size, train_config.seed);
    let mut fusion = SensorFusion::new(
        ApproximateTimeSynchronizer::new(opts.sync_queue_size, opts.sync_slop),
        env_config.model_name,
    );
    let mut driver = TrainingDriver::new(env, agent, memory, logger, train_config);

    let summary = run(
        &mut driver,
        &mut fusion,
        &channels.sensors,
        &channels.shutdown,
    )?;
    info!("Run summary:\n{}", summary);
    Ok(())
}
