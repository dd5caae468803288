//! Physics simulation control.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// A zero-argument simulator control endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    PausePhysics,
    ResetSimulation,
    UnpausePhysics,
}

impl Endpoint {
    /// Service name of the endpoint.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PausePhysics => "/gazebo/pause_physics",
            Self::ResetSimulation => "/gazebo/reset_simulation",
            Self::UnpausePhysics => "/gazebo/unpause_physics",
        }
    }

    /// Look up an endpoint by its service name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::PausePhysics,
            Self::ResetSimulation,
            Self::UnpausePhysics,
        ]
        .into_iter()
        .find(|e| e.name() == name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error calling a simulator endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("service {endpoint} unavailable: {reason}")]
    Unavailable { endpoint: Endpoint, reason: String },
}

/// Blocking remote calls to the simulator control endpoints.
pub trait SimulationService {
    fn call(&mut self, endpoint: Endpoint) -> Result<(), ServiceError>;
}

impl<T: SimulationService + ?Sized> SimulationService for &mut T {
    fn call(&mut self, endpoint: Endpoint) -> Result<(), ServiceError> {
        T::call(self, endpoint)
    }
}

impl<T: SimulationService + ?Sized> SimulationService for Box<T> {
    fn call(&mut self, endpoint: Endpoint) -> Result<(), ServiceError> {
        T::call(self, endpoint)
    }
}

/// Scripted service that records calls.
///
/// Calls to endpoints listed as failing return [`ServiceError::Unavailable`].
/// Clones share the same call record.
#[derive(Debug, Default, Clone)]
pub struct ScriptedService {
    calls: Rc<RefCell<VecDeque<Endpoint>>>,
    failing: Vec<Endpoint>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service where calls to `endpoint` fail.
    pub fn failing(endpoint: Endpoint) -> Self {
        Self {
            calls: Rc::default(),
            failing: vec![endpoint],
        }
    }

    /// All endpoints called so far, in order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.borrow().iter().copied().collect()
    }
}

impl SimulationService for ScriptedService {
    fn call(&mut self, endpoint: Endpoint) -> Result<(), ServiceError> {
        self.calls.borrow_mut().push_back(endpoint);
        if self.failing.contains(&endpoint) {
            Err(ServiceError::Unavailable {
                endpoint,
                reason: "scripted failure".into(),
            })
        } else {
            Ok(())
        }
    }
}

/// Pauses, resets and unpauses the simulated world.
#[derive(Debug, Clone)]
pub struct SimulationController<S> {
    service: S,
}

impl<S: SimulationService> SimulationController<S> {
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// Pause physics, reset the simulation, then unpause physics.
    ///
    /// Stops at the first failing call; the remaining calls are not made.
    pub fn reset_world(&mut self) -> Result<(), ServiceError> {
        self.service.call(Endpoint::PausePhysics)?;
        self.service.call(Endpoint::ResetSimulation)?;
        self.service.call(Endpoint::UnpausePhysics)
    }
}
