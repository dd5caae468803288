use super::{BridgeError, Inbound, ServiceResponse};
use crate::sensors::{SensorMessage, Stamped};
use crossbeam::channel::{bounded, unbounded, Receiver, SendError, Sender, TrySendError};
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sending half of a bounded channel that never blocks.
///
/// When the channel is full the oldest queued message is discarded to make room.
#[derive(Debug, Clone)]
pub struct DropOldestSender<T> {
    sender: Sender<T>,
    // Used only to discard from the front of the queue
    receiver: Receiver<T>,
}

/// Create a bounded drop-oldest channel holding at most `capacity` messages (at least one).
pub fn drop_oldest<T>(capacity: usize) -> (DropOldestSender<T>, Receiver<T>) {
    let (sender, receiver) = bounded(capacity.max(1));
    let queue = DropOldestSender {
        sender,
        receiver: receiver.clone(),
    };
    (queue, receiver)
}

impl<T> DropOldestSender<T> {
    /// Queue a message. Returns the number of older messages discarded to make room.
    pub fn send(&self, mut message: T) -> Result<usize, SendError<T>> {
        let mut discarded = 0;
        loop {
            match self.sender.try_send(message) {
                Ok(()) => return Ok(discarded),
                Err(TrySendError::Full(returned)) => {
                    message = returned;
                    if self.receiver.try_recv().is_ok() {
                        discarded += 1;
                    }
                }
                Err(TrySendError::Disconnected(returned)) => return Err(SendError(returned)),
            }
        }
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

/// Sending halves of the inbound channels.
#[derive(Debug, Clone)]
pub struct BridgeSenders {
    /// Bounded so that a stalled consumer only ever sees the most recent sensor messages.
    pub sensors: DropOldestSender<SensorMessage>,
    pub responses: Sender<ServiceResponse>,
    pub shutdown: Sender<()>,
}

/// Receiving halves of the inbound channels and the reader thread.
#[derive(Debug)]
pub struct BridgeChannels {
    pub sensors: Receiver<SensorMessage>,
    pub responses: Receiver<ServiceResponse>,
    pub shutdown: Receiver<()>,
    /// Reader thread. Yields the number of forwarded messages.
    pub reader: JoinHandle<Result<u64, BridgeError>>,
}

/// Decode inbound lines and forward them to their channels.
///
/// Blank lines are ignored and malformed lines are logged and skipped.
/// Messages without a stamp are stamped with the seconds elapsed since `start`.
/// Sensor messages never block: once the sensor queue is full the oldest are discarded.
/// Returns at end of input, after a shutdown message, or once a receiver has hung up.
///
/// Returns the number of forwarded messages, including those later discarded.
pub fn forward_lines<R: BufRead>(
    reader: R,
    senders: &BridgeSenders,
    start: Instant,
) -> Result<u64, BridgeError> {
    let mut forwarded = 0;
    let mut discarded = 0;
    for (line, text) in (1..).zip(reader.lines()) {
        let text = text?;
        if text.trim().is_empty() {
            continue;
        }
        let inbound: Inbound = match serde_json::from_str(&text) {
            Ok(inbound) => inbound,
            Err(source) => {
                let err = BridgeError::Decode { line, source };
                warn!(%err, "skipping line");
                continue;
            }
        };

        let arrival = start.elapsed().as_secs_f64();
        let sent = match inbound {
            Inbound::ModelStates { stamp, message } => queue_sensor(
                &senders.sensors,
                SensorMessage::ModelStates(Stamped::new(stamp.unwrap_or(arrival), message)),
                &mut discarded,
            ),
            Inbound::Scan { stamp, message } => queue_sensor(
                &senders.sensors,
                SensorMessage::Scan(Stamped::new(stamp.unwrap_or(arrival), message)),
                &mut discarded,
            ),
            Inbound::Response(response) => senders.responses.send(response).is_ok(),
            Inbound::Shutdown => {
                info!("shutdown message received");
                if senders.shutdown.send(()).is_ok() {
                    forwarded += 1;
                }
                info!(forwarded, discarded, "stopped reading");
                return Ok(forwarded);
            }
        };
        if !sent {
            debug!(line, "receiver hung up");
            return Ok(forwarded);
        }
        forwarded += 1;
    }
    info!(forwarded, discarded, "end of input");
    Ok(forwarded)
}

/// Queue a sensor message. Returns false if the receiver hung up.
fn queue_sensor(
    sensors: &DropOldestSender<SensorMessage>,
    message: SensorMessage,
    discarded: &mut usize,
) -> bool {
    match sensors.send(message) {
        Ok(0) => true,
        Ok(n) => {
            debug!(pending = sensors.len(), "sensor queue full; discarded oldest");
            *discarded += n;
            true
        }
        Err(_) => false,
    }
}

/// Spawn a thread that forwards lines from `reader` to new channels.
///
/// At most `sensor_capacity` sensor messages are kept queued.
/// The channels disconnect once the thread exits.
pub fn spawn_reader<R>(reader: R, sensor_capacity: usize) -> Result<BridgeChannels, BridgeError>
where
    R: BufRead + Send + 'static,
{
    let (sensors_tx, sensors) = drop_oldest(sensor_capacity);
    let (responses_tx, responses) = unbounded();
    let (shutdown_tx, shutdown) = unbounded();
    let senders = BridgeSenders {
        sensors: sensors_tx,
        responses: responses_tx,
        shutdown: shutdown_tx,
    };
    let start = Instant::now();
    let reader = thread::Builder::new()
        .name("bridge-reader".into())
        .spawn(move || forward_lines(reader, &senders, start))?;
    Ok(BridgeChannels {
        sensors,
        responses,
        shutdown,
        reader,
    })
}
