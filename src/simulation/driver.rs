use super::{EpisodeCounters, RunSummary};
use crate::agents::{Agent, AgentError, CheckpointPaths, ReplayMemory, Transition};
use crate::config::TrainConfig;
use crate::envs::{Action, ActionSpace, Observation, VehicleEnvironment};
use crate::logging::StatsLogger;
use crate::sensors::SensorFrame;
use crate::Prng;
use rand::distributions::Distribution;
use rand::SeedableRng;
use std::thread;
use thiserror::Error;
use tracing::{debug, info};

/// Error from the training driver.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("agent error")]
    Agent(#[from] AgentError),
}

/// What the sensor subscription should do after a frame is handled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    /// Keep delivering frames.
    Continue,
    /// Training has ended; stop delivering frames.
    Unregister,
}

/// Drives training from the stream of fused sensor frames.
///
/// The driver owns the environment, agent, replay memory and metrics logger.
/// Each frame either takes one environment step or, once the episode is done,
/// closes the episode and resets the environment.
#[derive(Debug)]
pub struct TrainingDriver<E, A, M, L> {
    env: E,
    agent: A,
    memory: M,
    logger: L,
    config: TrainConfig,
    action_space: ActionSpace,
    /// Source of the initial random actions.
    rng: Prng,
    counters: EpisodeCounters,
    state: Observation,
    done: bool,
    finished: bool,
    summary: RunSummary,
}

impl<E, A, M, L> TrainingDriver<E, A, M, L>
where
    E: VehicleEnvironment<Observation = Observation, Action = Action, ActionSpace = ActionSpace>,
    A: Agent,
    M: ReplayMemory,
    L: StatsLogger,
{
    /// Create a new driver. Resets the environment to obtain the initial state.
    pub fn new(mut env: E, agent: A, memory: M, logger: L, config: TrainConfig) -> Self {
        let state = env.reset();
        let action_space = env.action_space();
        let rng = Prng::seed_from_u64(config.seed);
        Self {
            env,
            agent,
            memory,
            logger,
            config,
            action_space,
            rng,
            counters: EpisodeCounters::new(),
            state,
            done: false,
            finished: false,
            summary: RunSummary::default(),
        }
    }

    pub const fn counters(&self) -> &EpisodeCounters {
        &self.counters
    }

    pub const fn env(&self) -> &E {
        &self.env
    }

    pub const fn agent(&self) -> &A {
        &self.agent
    }

    pub const fn memory(&self) -> &M {
        &self.memory
    }

    pub const fn logger(&self) -> &L {
        &self.logger
    }

    /// Whether the step budget has been exhausted and training has ended.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Summary of the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_steps: self.counters.total_steps,
            goals_reached: self.counters.goals_reached,
            updates: self.counters.updates,
            budget_exhausted: self.finished,
            ..self.summary
        }
    }

    /// Handle a synchronized sensor frame.
    pub fn on_frame(&mut self, frame: SensorFrame) -> Result<Control, DriverError> {
        if self.finished {
            return Ok(Control::Unregister);
        }
        self.env.update_sensors(frame);

        if self.counters.total_steps > self.config.num_steps {
            self.shutdown()?;
            return Ok(Control::Unregister);
        }

        if self.done {
            self.end_episode()?;
        } else {
            self.act();
        }
        Ok(Control::Continue)
    }

    /// Take one environment step and record the transition.
    fn act(&mut self) {
        let action = if self.config.start_steps > self.counters.total_steps {
            self.action_space.sample(&mut self.rng)
        } else {
            self.agent.select_action(&self.state)
        };

        let step = self.env.step(&action, self.counters.episode_steps);
        if !self.config.control_period.is_zero() {
            thread::sleep(self.config.control_period);
        }

        if step.reward > self.config.goal_reward_threshold && self.counters.episode_steps > 1 {
            self.counters.goals_reached += 1;
        }
        self.counters.record_step(step.reward);

        let max_episode_length = self.config.max_episode_length;
        let done = step.done || self.counters.episode_steps > max_episode_length;
        // Reaching the step limit is not terminal for bootstrapping
        let mask = if self.counters.episode_steps == max_episode_length || !done {
            1.0
        } else {
            0.0
        };
        debug!(
            episode_steps = self.counters.episode_steps,
            reward = step.reward,
            done,
            "step"
        );

        self.memory.push(Transition {
            state: self.state,
            action,
            reward: step.reward,
            next_state: step.observation,
            mask,
        });
        self.state = step.observation;
        self.done = done;
    }

    /// Close the finished episode and start the next one.
    fn end_episode(&mut self) -> Result<(), DriverError> {
        let counters = self.counters;
        info!(
            episode = counters.episode,
            total_steps = counters.total_steps,
            episode_steps = counters.episode_steps,
            reward = counters.episode_reward,
            goals_reached = counters.goals_reached,
            "episode finished"
        );
        if counters.episode_steps > 1 {
            self.log_episode();
        }
        self.summary
            .push_episode(counters.episode_reward, counters.episode_steps);

        if self.config.update_at_episode_end {
            self.network_update()?;
        }

        self.state = self.env.reset();
        self.counters.start_episode();
        self.done = false;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn log_episode(&mut self) {
        let c = &self.counters;
        self.logger
            .log_scalar("reward/train", c.episode_reward, c.episode);
        self.logger
            .log_scalar("reward/episode_length", c.episode_steps as f64, c.episode);
        self.logger
            .log_scalar("reward/num_goal_reached", c.goals_reached as f64, c.episode);
    }

    /// Run a round of parameter updates if the replay memory holds more than a batch.
    ///
    /// Returns the number of updates performed.
    pub fn network_update(&mut self) -> Result<u64, DriverError> {
        if self.memory.len() <= self.config.batch_size {
            return Ok(0);
        }
        let num_updates = self.config.updates_per_hook();
        for _ in 0..num_updates {
            let batch = self.memory.sample(self.config.batch_size);
            let updates = self.counters.updates;
            let losses = self.agent.update_parameters(&batch, updates)?;
            self.logger.log_scalar("loss/critic_1", losses.critic_1, updates);
            self.logger.log_scalar("loss/critic_2", losses.critic_2, updates);
            self.logger.log_scalar("loss/policy", losses.policy, updates);
            self.logger
                .log_scalar("loss/entropy_loss", losses.entropy, updates);
            self.logger
                .log_scalar("entropy_temprature/alpha", losses.alpha, updates);
            self.counters.updates += 1;
        }
        debug!(num_updates, total = self.counters.updates, "network update");
        Ok(num_updates)
    }

    /// Stop the vehicle and save the model.
    fn shutdown(&mut self) -> Result<(), DriverError> {
        info!(
            total_steps = self.counters.total_steps,
            "training ending"
        );
        self.finished = true;
        self.env.stop();
        let paths = CheckpointPaths::new(&self.config.model_dir, &self.config.save_checkpoint);
        self.agent.save_model(&paths)?;
        info!(actor = %paths.actor.display(), critic = %paths.critic.display(), "model saved");
        self.logger.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Batch, ReplayBuffer, UpdateLosses};
    use crate::config::{CheckpointName, EnvConfig};
    use crate::envs::testing::frame;
    use crate::envs::RacecarEnv;
    use crate::gateway::{DriveCommand, RecordingPublisher};
    use crate::logging::MemoryLogger;
    use crate::simulator::ScriptedService;
    use std::cell::RefCell;
    use std::path::Path;
    use std::time::Duration;

    /// Agent with a fixed action that records its calls.
    #[derive(Debug, Default)]
    struct ScriptedAgent {
        selected: u64,
        updates: Vec<u64>,
        batch_sizes: Vec<usize>,
        saved: RefCell<Vec<CheckpointPaths>>,
    }

    impl Agent for ScriptedAgent {
        fn select_action(&mut self, _: &Observation) -> Action {
            self.selected += 1;
            Action {
                speed: 0.5,
                steering: 0.0,
            }
        }

        #[allow(clippy::cast_precision_loss)]
        fn update_parameters(
            &mut self,
            batch: &Batch,
            updates: u64,
        ) -> Result<UpdateLosses, AgentError> {
            self.updates.push(updates);
            self.batch_sizes.push(batch.len());
            Ok(UpdateLosses {
                critic_1: 1.0,
                critic_2: 2.0,
                policy: updates as f64,
                entropy: -0.5,
                alpha: 0.2,
            })
        }

        fn save_model(&self, paths: &CheckpointPaths) -> Result<(), AgentError> {
            self.saved.borrow_mut().push(paths.clone());
            Ok(())
        }

        fn load_model(&mut self, _: &CheckpointPaths) -> Result<(), AgentError> {
            Ok(())
        }
    }

    type TestDriver = TrainingDriver<
        RacecarEnv<RecordingPublisher, ScriptedService>,
        ScriptedAgent,
        ReplayBuffer,
        MemoryLogger,
    >;

    fn train_config(max_episode_length: u64) -> TrainConfig {
        TrainConfig {
            batch_size: 2,
            num_steps: 1000,
            max_episode_length,
            control_period: Duration::ZERO,
            ..TrainConfig::default()
        }
    }

    fn driver(config: TrainConfig) -> (TestDriver, RecordingPublisher, ScriptedService) {
        let publisher = RecordingPublisher::new();
        let service = ScriptedService::new();
        let env = RacecarEnv::new(
            &EnvConfig::default(),
            config.max_episode_length,
            publisher.clone(),
            service.clone(),
        );
        let memory = ReplayBuffer::new(config.replay_size, config.seed);
        let driver = TrainingDriver::new(
            env,
            ScriptedAgent::default(),
            memory,
            MemoryLogger::new(),
            config,
        );
        (driver, publisher, service)
    }

    /// Vehicle at (1, 0.75) m with nothing nearby.
    fn clear_frame() -> SensorFrame {
        frame(1.0, 0.75, 0.0, 14.0)
    }

    /// Vehicle at the default target.
    fn goal_frame() -> SensorFrame {
        frame(-8.0, 7.5, 0.0, 14.0)
    }

    fn masks(driver: &TestDriver) -> Vec<f64> {
        driver.memory().iter().map(|t| t.mask).collect()
    }

    #[test]
    fn new_resets_environment() {
        let (driver, publisher, service) = driver(train_config(300));
        assert_eq!(service.calls().len(), 3);
        assert_eq!(publisher.commands(), vec![DriveCommand::STOP]);
        assert_eq!(driver.counters().episode, 1);
    }

    #[test]
    fn step_limit_truncates_episode() {
        let (mut driver, _, _) = driver(TrainConfig {
            update_at_episode_end: false,
            ..train_config(3)
        });
        for _ in 0..4 {
            assert_eq!(driver.on_frame(clear_frame()).unwrap(), Control::Continue);
        }
        assert_eq!(driver.counters().episode_steps, 4);
        // Reaching the limit keeps the bootstrap; passing it is terminal
        assert_eq!(masks(&driver), vec![1.0, 1.0, 1.0, 0.0]);

        driver.on_frame(clear_frame()).unwrap();
        assert_eq!(driver.counters().episode, 2);
        assert_eq!(driver.counters().episode_steps, 0);
        assert_eq!(driver.counters().total_steps, 4);
        assert_eq!(driver.memory().len(), 4);
        assert_eq!(driver.summary().num_episodes(), 1);
    }

    #[test]
    fn terminal_step_has_zero_mask() {
        let (mut driver, _, _) = driver(train_config(300));
        driver.on_frame(clear_frame()).unwrap();
        driver.on_frame(frame(1.0, 0.75, 0.0, 0.1)).unwrap();
        assert_eq!(masks(&driver), vec![1.0, 0.0]);
        let crash = driver.memory().iter().last().unwrap();
        assert_eq!(crash.reward, -299.0);
    }

    #[test]
    fn transitions_chain_states() {
        let (mut driver, _, _) = driver(train_config(300));
        driver.on_frame(clear_frame()).unwrap();
        driver.on_frame(frame(2.0, 0.75, 0.0, 14.0)).unwrap();
        let transitions: Vec<_> = driver.memory().iter().copied().collect();
        assert_eq!(transitions[0].next_state, transitions[1].state);
        assert_eq!(transitions[0].action, Action { speed: 0.5, steering: 0.0 });
    }

    #[test]
    fn goal_counted_after_first_steps() {
        let (mut driver, _, _) = driver(train_config(300));
        driver.on_frame(clear_frame()).unwrap();
        driver.on_frame(clear_frame()).unwrap();
        driver.on_frame(goal_frame()).unwrap();
        assert_eq!(driver.counters().goals_reached, 1);
        assert_eq!(masks(&driver), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn early_goal_not_counted() {
        let (mut driver, _, _) = driver(train_config(300));
        driver.on_frame(goal_frame()).unwrap();
        assert_eq!(driver.counters().goals_reached, 0);
        assert_eq!(driver.counters().episode_reward, 300.0);
    }

    #[test]
    fn start_steps_use_random_actions() {
        let (mut driver, _, _) = driver(TrainConfig {
            start_steps: 2,
            ..train_config(300)
        });
        for _ in 0..5 {
            driver.on_frame(clear_frame()).unwrap();
        }
        assert_eq!(driver.agent().selected, 3);
        let space = ActionSpace::default();
        for transition in driver.memory().iter() {
            assert!(crate::spaces::Space::contains(&space, &transition.action));
        }
    }

    #[test]
    fn episode_end_runs_updates_and_logs() {
        let (mut driver, _, _) = driver(train_config(3));
        for _ in 0..5 {
            driver.on_frame(clear_frame()).unwrap();
        }
        let agent = driver.agent();
        assert_eq!(agent.updates, vec![0, 1, 2]);
        assert_eq!(agent.batch_sizes, vec![2, 2, 2]);
        assert_eq!(driver.counters().updates, 3);

        let logger = driver.logger();
        assert_eq!(logger.series("loss/policy"), &[(0, 0.0), (1, 1.0), (2, 2.0)]);
        assert_eq!(logger.series("entropy_temprature/alpha").len(), 3);
        assert_eq!(logger.series("reward/episode_length"), &[(1, 4.0)]);
        assert_eq!(logger.series("reward/num_goal_reached"), &[(1, 0.0)]);
        assert_eq!(logger.series("reward/train").len(), 1);
    }

    #[test]
    fn no_updates_until_memory_exceeds_batch() {
        let (mut driver, _, _) = driver(TrainConfig {
            batch_size: 10,
            ..train_config(3)
        });
        assert_eq!(driver.network_update().unwrap(), 0);
        for _ in 0..5 {
            driver.on_frame(clear_frame()).unwrap();
        }
        assert!(driver.agent().updates.is_empty());
        assert!(driver.logger().series("loss/critic_1").is_empty());
    }

    #[test]
    fn single_step_episode_not_logged() {
        let (mut driver, _, _) = driver(train_config(300));
        driver.on_frame(frame(25.0, 0.0, 0.0, 14.0)).unwrap();
        driver.on_frame(clear_frame()).unwrap();
        assert_eq!(driver.counters().episode, 2);
        assert!(driver.logger().series("reward/train").is_empty());
    }

    #[test]
    fn budget_exhaustion_saves_and_unregisters() {
        let (mut driver, publisher, _) = driver(TrainConfig {
            num_steps: 2,
            model_dir: "checkpoints".into(),
            ..train_config(300)
        });
        for _ in 0..3 {
            assert_eq!(driver.on_frame(clear_frame()).unwrap(), Control::Continue);
        }
        assert_eq!(driver.on_frame(clear_frame()).unwrap(), Control::Unregister);
        assert!(driver.is_finished());
        assert_eq!(publisher.commands().last(), Some(&DriveCommand::STOP));
        assert_eq!(
            *driver.agent().saved.borrow(),
            vec![CheckpointPaths::new(
                Path::new("checkpoints"),
                &CheckpointName::new("corridor_straight", "2")
            )]
        );

        // No further control actions
        let num_commands = publisher.commands().len();
        assert_eq!(driver.on_frame(clear_frame()).unwrap(), Control::Unregister);
        assert_eq!(publisher.commands().len(), num_commands);
        assert_eq!(driver.counters().total_steps, 3);
        assert!(driver.summary().budget_exhausted);
    }
}
