use super::{BridgeError, Outbound, ServiceResponse};
use crate::gateway::{CommandPublisher, DriveCommand};
use crate::simulator::{Endpoint, ServiceError, SimulationService};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Line-oriented writer shared by the publisher and the service client.
///
/// Clones write to the same underlying writer.
pub struct SharedWriter<W> {
    inner: Rc<RefCell<W>>,
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<W> fmt::Debug for SharedWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

impl<W: Write> SharedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Rc::new(RefCell::new(writer)),
        }
    }

    /// Write one message as a line and flush.
    pub fn send(&self, message: &Outbound) -> Result<(), BridgeError> {
        let mut writer = self.inner.borrow_mut();
        serde_json::to_writer(&mut *writer, message).map_err(io::Error::from)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> Ref<W> {
        self.inner.borrow()
    }
}

/// Publishes drive commands as `drive` lines.
#[derive(Debug, Clone)]
pub struct LinePublisher<W> {
    writer: SharedWriter<W>,
}

impl<W: Write> LinePublisher<W> {
    pub const fn new(writer: SharedWriter<W>) -> Self {
        Self { writer }
    }
}

impl<W: Write> CommandPublisher for LinePublisher<W> {
    fn publish(&mut self, command: &DriveCommand) {
        let message = Outbound::Drive {
            speed: command.speed,
            steering_angle: command.steering_angle,
        };
        if let Err(err) = self.writer.send(&message) {
            warn!(%err, "failed to publish drive command");
        }
    }
}

/// Calls simulator services with `call` lines and waits for the matching `response`.
///
/// A response matches only if it echoes the id of the pending call,
/// so late replies to timed out calls are discarded.
#[derive(Debug)]
pub struct LineServiceClient<W> {
    writer: SharedWriter<W>,
    responses: Receiver<ServiceResponse>,
    timeout: Duration,
    next_id: u64,
}

impl<W: Write> LineServiceClient<W> {
    /// # Args
    /// * `writer` - Outbound line writer.
    /// * `responses` - Inbound service responses.
    /// * `timeout` - Maximum time to wait for each response.
    pub const fn new(
        writer: SharedWriter<W>,
        responses: Receiver<ServiceResponse>,
        timeout: Duration,
    ) -> Self {
        Self {
            writer,
            responses,
            timeout,
            next_id: 0,
        }
    }
}

impl<W: Write> SimulationService for LineServiceClient<W> {
    fn call(&mut self, endpoint: Endpoint) -> Result<(), ServiceError> {
        let unavailable = |reason: String| ServiceError::Unavailable { endpoint, reason };
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.writer
            .send(&Outbound::Call {
                id,
                service: endpoint.name().into(),
            })
            .map_err(|err| unavailable(err.to_string()))?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.responses.recv_timeout(remaining) {
                Ok(response) if response.id == id && response.service == endpoint.name() => {
                    return if response.success {
                        Ok(())
                    } else {
                        Err(unavailable(response.message))
                    };
                }
                Ok(response) => {
                    debug!(
                        id = response.id,
                        service = %response.service,
                        "ignoring stale service response"
                    );
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(unavailable(format!(
                        "no response within {:?}",
                        self.timeout
                    )))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(unavailable("transport closed".into()))
                }
            }
        }
    }
}
