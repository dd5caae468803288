use super::{
    EnvStep, EnvStructure, Environment, Info, Observation, ObservationEncoder, Outcome,
    VehicleEnvironment,
};
use crate::config::EnvConfig;
use crate::gateway::{ActuationGateway, CommandPublisher};
use crate::sensors::{SensorFrame, NUM_SECTORS};
use crate::simulator::{SimulationController, SimulationService};
use crate::spaces::{IntervalSpace, Space};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, info, warn};

/// Added to the x offset when computing the bearing to the target.
const BEARING_EPSILON: f64 = 0.01;

/// Normalized speed and steering command.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Normalized speed in `[0, 1]`.
    pub speed: f64,
    /// Normalized steering in `[-1, 1]`.
    pub steering: f64,
}

impl From<[f64; 2]> for Action {
    fn from([speed, steering]: [f64; 2]) -> Self {
        Self { speed, steering }
    }
}

impl From<Action> for [f64; 2] {
    fn from(action: Action) -> Self {
        [action.speed, action.steering]
    }
}

/// [`RacecarEnv`] action space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpace {
    pub speed: IntervalSpace,
    pub steering: IntervalSpace,
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self {
            speed: IntervalSpace::new(0.0, 1.0),
            steering: IntervalSpace::new(-1.0, 1.0),
        }
    }
}

impl Space for ActionSpace {
    type Element = Action;

    fn contains(&self, value: &Action) -> bool {
        self.speed.contains(&value.speed) && self.steering.contains(&value.steering)
    }
}

impl Distribution<Action> for ActionSpace {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        Action {
            speed: self.speed.sample(rng),
            steering: self.steering.sample(rng),
        }
    }
}

/// [`RacecarEnv`] observation space.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    pub dx: IntervalSpace<f32>,
    pub dy: IntervalSpace<f32>,
    pub yaw: IntervalSpace<f32>,
    pub sector: IntervalSpace<f32>,
}

impl Default for ObservationSpace {
    #[allow(clippy::cast_possible_truncation)]
    fn default() -> Self {
        let pi = PI as f32;
        Self {
            // Both the vehicle and (in practice) the target are within [-1, 1]
            dx: IntervalSpace::new(0.0, 2.0),
            dy: IntervalSpace::new(0.0, 2.0),
            yaw: IntervalSpace::new(-pi, pi),
            sector: IntervalSpace::new(0.0, 1.0),
        }
    }
}

impl Space for ObservationSpace {
    type Element = Observation;

    fn contains(&self, value: &Observation) -> bool {
        self.dx.contains(&value.dx)
            && self.dy.contains(&value.dy)
            && self.yaw.contains(&value.yaw)
            && value.sectors.iter().all(|s| self.sector.contains(s))
    }
}

/// Latest sensor state of the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    /// Normalized vehicle position.
    pub position: (f64, f64),
    /// Vehicle heading (radians).
    pub yaw: f64,
    /// Raw range scan (m).
    pub ranges: Vec<f32>,
}

impl Default for SensorState {
    /// The state before any sensor data has arrived.
    fn default() -> Self {
        Self {
            position: (0.0, 0.0),
            yaw: 0.0,
            ranges: vec![0.0; 360],
        }
    }
}

/// Racecar driving to a fixed target.
///
/// The vehicle is commanded with normalized speed and steering.
/// An episode ends when the vehicle leaves the bounded world, comes too close to an obstacle,
/// or reaches the target. These conditions are checked in that order of priority.
/// Terminal rewards are `±(max_episode_length - episode_steps)`; otherwise the reward is
/// a dense shaping signal in `[-1, 0]` penalizing distance and heading error to the target.
#[derive(Debug)]
pub struct RacecarEnv<P, S> {
    gateway: ActuationGateway<P>,
    controller: SimulationController<S>,
    encoder: ObservationEncoder,
    /// Normalized target position.
    target: (f64, f64),
    /// Normalized per-axis distance within which the goal is reached.
    goal_threshold: f64,
    /// Normalized sector range below which the vehicle has crashed.
    collision_threshold: f32,
    max_x: f64,
    max_y: f64,
    max_episode_length: u64,
    discount_factor: f64,
    sensors: SensorState,
}

impl<P, S> RacecarEnv<P, S>
where
    P: CommandPublisher,
    S: SimulationService,
{
    /// # Panics
    /// If `config` fails [`EnvConfig::validate`].
    pub fn new(config: &EnvConfig, max_episode_length: u64, publisher: P, service: S) -> Self {
        Self {
            gateway: ActuationGateway::new(publisher, config.max_velocity, config.max_steering),
            controller: SimulationController::new(service),
            encoder: ObservationEncoder::new(config.max_range),
            target: config.normalized_target(),
            goal_threshold: config.goal_threshold(),
            collision_threshold: config.collision_threshold,
            max_x: config.max_x,
            max_y: config.max_y,
            max_episode_length,
            discount_factor: config.discount_factor,
            sensors: SensorState::default(),
        }
    }

    /// The latest sensor state.
    pub const fn sensors(&self) -> &SensorState {
        &self.sensors
    }

    /// Normalized target position.
    pub const fn target(&self) -> (f64, f64) {
        self.target
    }

    /// Encode the current sensor state.
    pub fn observe(&self) -> Observation {
        self.encoder.encode(
            self.sensors.position,
            self.sensors.yaw,
            self.target,
            &self.sensors.ranges,
        )
    }

    /// Bearing (radians) from the vehicle to the target.
    pub fn bearing_to_target(&self) -> f64 {
        let (x, y) = self.sensors.position;
        ((self.target.1 - y) / (self.target.0 - x + BEARING_EPSILON)).atan()
    }

    /// Dense reward for a non-terminal state, in `[-1, 0]`.
    ///
    /// The mean of the per-axis distance and heading error terms, clamped at `-1` since
    /// each distance term can reach `2` at opposite corners of the world.
    pub fn shaping_reward(&self) -> f64 {
        let (x, y) = self.sensors.position;
        let heading_error = self.sensors.yaw - self.bearing_to_target();
        let penalty =
            ((x - self.target.0).abs() + (y - self.target.1).abs() + heading_error.abs() / PI) / 3.0;
        (-penalty).max(-1.0)
    }

    /// Classify the current state and compute its reward.
    fn classify(&self, episode_steps: u64) -> (Outcome, f64) {
        let (x, y) = self.sensors.position;
        let min_range = self
            .encoder
            .sectors(&self.sensors.ranges)
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        debug!(min_range, "least distance to obstacle");

        #[allow(clippy::cast_precision_loss)]
        let remaining = self.max_episode_length as f64 - episode_steps as f64;

        // NaN positions count as outside
        let in_bounds = x.abs() < 1.0 && y.abs() < 1.0;
        if !in_bounds {
            (Outcome::OutOfBounds, -remaining)
        } else if min_range < self.collision_threshold {
            (Outcome::Crashed, -remaining)
        } else if (x - self.target.0).abs() < self.goal_threshold
            && (y - self.target.1).abs() < self.goal_threshold
        {
            (Outcome::GoalReached, remaining)
        } else {
            (Outcome::Running, self.shaping_reward())
        }
    }
}

impl<P, S> EnvStructure for RacecarEnv<P, S> {
    type ObservationSpace = ObservationSpace;
    type ActionSpace = ActionSpace;

    fn observation_space(&self) -> Self::ObservationSpace {
        ObservationSpace::default()
    }

    fn action_space(&self) -> Self::ActionSpace {
        ActionSpace::default()
    }

    #[allow(clippy::cast_precision_loss)]
    fn reward_range(&self) -> (f64, f64) {
        let max = self.max_episode_length as f64;
        (-max, max)
    }

    fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}

impl<P, S> Environment for RacecarEnv<P, S>
where
    P: CommandPublisher,
    S: SimulationService,
{
    type Observation = Observation;
    type Action = Action;

    fn reset(&mut self) -> Observation {
        self.gateway.stop();
        match self.controller.reset_world() {
            Ok(()) => info!("simulation reset"),
            Err(err) => warn!(%err, "reset service did not process request"),
        }
        self.observe()
    }

    fn step(&mut self, action: &Action, episode_steps: u64) -> EnvStep<Observation> {
        self.gateway.drive(action.speed, action.steering);

        let (outcome, reward) = self.classify(episode_steps);
        match outcome {
            Outcome::OutOfBounds => info!("outside range"),
            Outcome::Crashed => info!("crashed"),
            Outcome::GoalReached => info!("goal reached"),
            Outcome::Running => {}
        }

        EnvStep {
            observation: self.observe(),
            reward,
            done: outcome.is_terminal(),
            outcome,
            info: Info::new(),
        }
    }
}

impl<P, S> VehicleEnvironment for RacecarEnv<P, S>
where
    P: CommandPublisher,
    S: SimulationService,
{
    fn update_sensors(&mut self, frame: SensorFrame) {
        debug_assert!(frame.ranges.len() % NUM_SECTORS == 0);
        self.sensors = SensorState {
            position: (frame.pose.x / self.max_x, frame.pose.y / self.max_y),
            yaw: frame.pose.yaw,
            ranges: frame.ranges,
        };
    }

    fn stop(&mut self) {
        self.gateway.stop();
    }
}
