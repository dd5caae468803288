//! Actuation gateway: abstract actions to vehicle drive commands.
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// An Ackermann drive command in physical units.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    /// Forward speed (m/s).
    pub speed: f64,
    /// Steering angle (radians).
    pub steering_angle: f64,
}

impl DriveCommand {
    pub const STOP: Self = Self {
        speed: 0.0,
        steering_angle: 0.0,
    };
}

/// Outbound transport for drive commands.
///
/// Publishing is fire-and-forget: implementations handle (and log) their own transport
/// failures.
pub trait CommandPublisher {
    fn publish(&mut self, command: &DriveCommand);
}

impl<T: CommandPublisher + ?Sized> CommandPublisher for &mut T {
    fn publish(&mut self, command: &DriveCommand) {
        T::publish(self, command)
    }
}

impl<T: CommandPublisher + ?Sized> CommandPublisher for Box<T> {
    fn publish(&mut self, command: &DriveCommand) {
        T::publish(self, command)
    }
}

/// Records every published command.
///
/// Clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct RecordingPublisher {
    commands: Rc<RefCell<Vec<DriveCommand>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands published so far.
    pub fn commands(&self) -> Vec<DriveCommand> {
        self.commands.borrow().clone()
    }
}

impl CommandPublisher for RecordingPublisher {
    fn publish(&mut self, command: &DriveCommand) {
        self.commands.borrow_mut().push(*command);
    }
}

/// Converts normalized `(speed, steering)` actions into drive commands.
#[derive(Debug, Clone)]
pub struct ActuationGateway<P> {
    publisher: P,
    max_velocity: f64,
    max_steering: f64,
}

impl<P: CommandPublisher> ActuationGateway<P> {
    /// # Args
    /// * `max_velocity` - Speed (m/s) commanded by a normalized speed of `1`.
    /// * `max_steering` - Steering angle (radians) commanded by a normalized steering of `1`.
    pub const fn new(publisher: P, max_velocity: f64, max_steering: f64) -> Self {
        Self {
            publisher,
            max_velocity,
            max_steering,
        }
    }

    /// Publish a drive command scaled from normalized speed and steering.
    pub fn drive(&mut self, speed: f64, steering: f64) {
        self.publisher.publish(&DriveCommand {
            speed: speed * self.max_velocity,
            steering_angle: steering * self.max_steering,
        });
    }

    /// Publish a zero-speed, zero-steering command.
    pub fn stop(&mut self) {
        self.publisher.publish(&DriveCommand::STOP);
    }

    pub const fn publisher(&self) -> &P {
        &self.publisher
    }
}
