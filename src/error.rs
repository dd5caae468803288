//! Error type
use crate::agents::AgentError;
use crate::bridge::BridgeError;
use crate::config::ConfigError;
use crate::sensors::SensorError;
use crate::simulation::DriverError;
use crate::simulator::ServiceError;
use thiserror::Error;

/// Error from the deepracer gym crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("agent error")]
    Agent(#[from] AgentError),
    #[error("transport error")]
    Bridge(#[from] BridgeError),
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
    #[error("training driver error")]
    Driver(#[from] DriverError),
    #[error("invalid sensor data")]
    Sensor(#[from] SensorError),
    #[error("simulator service error")]
    Service(#[from] ServiceError),
}
