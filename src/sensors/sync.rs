//! Approximate time synchronization of two message streams.
use super::Stamped;
use std::collections::VecDeque;

/// Pairs messages from two streams whose stamps are within a time slop of each other.
///
/// Each stream has a bounded queue of unmatched messages.
/// When a message arrives it is queued (evicting the earliest stamped message if the queue is
/// over capacity) and then matched against the opposite queue.
/// The match is the opposite message with the closest stamp, provided the difference is
/// strictly less than `slop`.
/// Matched messages are removed from both queues; unmatched ones wait for a later partner.
#[derive(Debug, Clone)]
pub struct ApproximateTimeSynchronizer<A, B> {
    first: VecDeque<Stamped<A>>,
    second: VecDeque<Stamped<B>>,
    queue_size: usize,
    slop: f64,
}

impl<A, B> ApproximateTimeSynchronizer<A, B> {
    /// Create a new synchronizer.
    ///
    /// # Args
    /// * `queue_size` - Maximum number of unmatched messages kept per stream.
    /// * `slop` - Maximum stamp difference (s) between paired messages.
    pub fn new(queue_size: usize, slop: f64) -> Self {
        let queue_size = queue_size.max(1);
        Self {
            first: VecDeque::with_capacity(queue_size + 1),
            second: VecDeque::with_capacity(queue_size + 1),
            queue_size,
            slop,
        }
    }

    /// Number of unmatched messages queued on each stream.
    pub fn pending(&self) -> (usize, usize) {
        (self.first.len(), self.second.len())
    }

    /// Add a message to the first stream.
    pub fn push_first(&mut self, message: Stamped<A>) -> Option<(A, B)> {
        let (a, b) = add(
            &mut self.first,
            &mut self.second,
            message,
            self.queue_size,
            self.slop,
        )?;
        Some((a.message, b.message))
    }

    /// Add a message to the second stream.
    pub fn push_second(&mut self, message: Stamped<B>) -> Option<(A, B)> {
        let (b, a) = add(
            &mut self.second,
            &mut self.first,
            message,
            self.queue_size,
            self.slop,
        )?;
        Some((a.message, b.message))
    }
}

/// Queue `message` on `mine` then try to match it against `other`.
fn add<T, U>(
    mine: &mut VecDeque<Stamped<T>>,
    other: &mut VecDeque<Stamped<U>>,
    message: Stamped<T>,
    queue_size: usize,
    slop: f64,
) -> Option<(Stamped<T>, Stamped<U>)> {
    let stamp = message.stamp;
    mine.push_back(message);
    let mut index = mine.len() - 1;
    while mine.len() > queue_size {
        let earliest = earliest(mine)?;
        mine.remove(earliest);
        if earliest == index {
            // The new message itself was the earliest and has been evicted.
            return None;
        }
        if earliest < index {
            index -= 1;
        }
    }

    let partner = other
        .iter()
        .enumerate()
        .map(|(i, m)| (i, (m.stamp - stamp).abs()))
        .filter(|&(_, delta)| delta < slop)
        .min_by(|(_, x), (_, y)| x.total_cmp(y))
        .map(|(i, _)| i)?;

    let matched = other.remove(partner)?;
    let message = mine.remove(index)?;
    Some((message, matched))
}

/// Index of the message with the smallest stamp.
fn earliest<T>(queue: &VecDeque<Stamped<T>>) -> Option<usize> {
    queue
        .iter()
        .enumerate()
        .min_by(|(_, x), (_, y)| x.stamp.total_cmp(&y.stamp))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync() -> ApproximateTimeSynchronizer<u32, char> {
        ApproximateTimeSynchronizer::new(3, 0.1)
    }

    #[test]
    fn pairs_within_slop() {
        let mut sync = sync();
        assert_eq!(sync.push_first(Stamped::new(1.0, 1)), None);
        assert_eq!(sync.push_second(Stamped::new(1.05, 'a')), Some((1, 'a')));
        assert_eq!(sync.pending(), (0, 0));
    }

    #[test]
    fn no_pair_outside_slop() {
        let mut sync = sync();
        assert_eq!(sync.push_first(Stamped::new(1.0, 1)), None);
        assert_eq!(sync.push_second(Stamped::new(1.2, 'a')), None);
        assert_eq!(sync.pending(), (1, 1));
    }

    #[test]
    fn slop_is_strict() {
        let mut sync = ApproximateTimeSynchronizer::new(3, 0.5);
        assert_eq!(sync.push_first(Stamped::new(1.0, 1)), None);
        assert_eq!(sync.push_second(Stamped::new(1.5, 'a')), None);
    }

    #[test]
    fn picks_closest_partner() {
        let mut sync = sync();
        assert_eq!(sync.push_second(Stamped::new(0.95, 'a')), None);
        assert_eq!(sync.push_second(Stamped::new(1.02, 'b')), None);
        assert_eq!(sync.push_first(Stamped::new(1.0, 1)), Some((1, 'b')));
        // The unmatched earlier message is still available
        assert_eq!(sync.pending(), (0, 1));
        assert_eq!(sync.push_first(Stamped::new(0.96, 2)), Some((2, 'a')));
    }

    #[test]
    fn queue_evicts_earliest() {
        let mut sync = sync();
        for (i, stamp) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            assert_eq!(sync.push_first(Stamped::new(stamp, i as u32)), None);
        }
        assert_eq!(sync.pending(), (3, 0));
        // The message stamped 1.0 was evicted
        assert_eq!(sync.push_second(Stamped::new(1.0, 'a')), None);
        assert_eq!(sync.push_second(Stamped::new(2.0, 'b')), Some((1, 'b')));
    }

    #[test]
    fn stale_arrival_evicted_immediately() {
        let mut sync = sync();
        for stamp in [5.0, 6.0, 7.0] {
            sync.push_first(Stamped::new(stamp, 0));
        }
        // Arrives with the earliest stamp on a full queue
        assert_eq!(sync.push_first(Stamped::new(1.0, 9)), None);
        assert_eq!(sync.pending(), (3, 0));
        assert_eq!(sync.push_second(Stamped::new(1.0, 'a')), None);
    }
}
