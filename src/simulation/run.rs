use super::{Control, DriverError, RunSummary, TrainingDriver};
use crate::agents::{Agent, ReplayMemory};
use crate::envs::{Action, ActionSpace, Observation, VehicleEnvironment};
use crate::logging::StatsLogger;
use crate::sensors::{SensorFusion, SensorMessage};
use crossbeam::channel::{select, Receiver};
use tracing::{info, warn};

/// Run the training loop until training ends, a shutdown is requested or the sensor stream
/// closes.
///
/// Inbound messages are synchronized by `fusion`; each valid frame is handed to the driver.
/// Malformed frames are logged and dropped.
///
/// # Args
/// * `driver` - Training driver.
/// * `fusion` - Synchronizes the sensor streams.
/// * `messages` - Inbound sensor messages.
/// * `shutdown` - Any message or disconnection requests a shutdown.
pub fn run<E, A, M, L>(
    driver: &mut TrainingDriver<E, A, M, L>,
    fusion: &mut SensorFusion,
    messages: &Receiver<SensorMessage>,
    shutdown: &Receiver<()>,
) -> Result<RunSummary, DriverError>
where
    E: VehicleEnvironment<Observation = Observation, Action = Action, ActionSpace = ActionSpace>,
    A: Agent,
    M: ReplayMemory,
    L: StatsLogger,
{
    loop {
        select! {
            recv(messages) -> message => match message {
                Ok(message) => match fusion.push(message) {
                    Some(Ok(frame)) => {
                        if driver.on_frame(frame)? == Control::Unregister {
                            info!("unregistered from sensor streams");
                            break;
                        }
                    }
                    Some(Err(err)) => warn!(%err, "dropping sensor frame"),
                    None => {}
                },
                Err(_) => {
                    info!("sensor stream closed");
                    break;
                }
            },
            recv(shutdown) -> _ => {
                info!("shutdown requested");
                break;
            }
        }
    }
    Ok(driver.summary())
}
