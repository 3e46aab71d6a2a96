//! Message passing between solver instances.
//!
//! Each instance owns one [`Communicator`] with an upstream end it receives
//! from and a downstream end it sends to. Linking communicators in a ring
//! gives the time-parallel pipeline; a communicator linked to itself gives
//! sequential time stepping. Dropping a communicator (or calling
//! [`Communicator::close`]) disconnects both of its links.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use thiserror::Error;

/// Protocol state carried by a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flag {
    /// No interval is in progress.
    #[default]
    None,

    /// The sender is still iterating on its interval.
    Iterating,

    /// The sender closed its interval after meeting a tolerance.
    Converged,

    /// The sender closed its interval at the iteration cap.
    Finished,

    /// The sender moved its interval boundaries.
    TimeAdjusted,

    /// The sender failed; every receiver must stop.
    Failed,
}

impl Flag {
    /// Returns `true` if the sender has no interval in progress.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            Self::None | Self::Converged | Self::Finished | Self::TimeAdjusted
        )
    }
}

/// A boundary value handed from one instance to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<V> {
    pub value: V,
    pub time_point: f64,
    pub flag: Flag,
}

/// Errors raised by a [`Communicator`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommunicatorError {
    #[error("communicator has no {0} link")]
    Unlinked(&'static str),

    #[error("{0} peer disconnected")]
    Disconnected(&'static str),
}

/// One instance's endpoints in the pipeline.
#[derive(Debug)]
pub struct Communicator<V> {
    upstream: Option<Receiver<Message<V>>>,
    downstream: Option<Sender<Message<V>>>,
    buffer: VecDeque<Message<V>>,
}

impl<V> Default for Communicator<V> {
    fn default() -> Self {
        Self {
            upstream: None,
            downstream: None,
            buffer: VecDeque::new(),
        }
    }
}

impl<V> Communicator<V> {
    /// Creates a communicator with no links.
    #[must_use]
    pub fn unlinked() -> Self {
        Self::default()
    }

    /// Creates a communicator whose messages come back to itself.
    #[must_use]
    pub fn self_looped() -> Self {
        let mut communicator = Self::unlinked();
        communicator.link_to_self();
        communicator
    }

    /// Creates `size` communicators linked in a ring, `i` sending to `i + 1`.
    #[must_use]
    pub fn ring(size: usize) -> Vec<Self> {
        let mut communicators: Vec<Self> = (0..size).map(|_| Self::unlinked()).collect();
        for i in 0..size {
            let (sender, receiver) = crossbeam_channel::unbounded();
            communicators[i].downstream = Some(sender);
            communicators[(i + 1) % size].upstream = Some(receiver);
        }
        communicators
    }

    /// Links `previous` to send to `next`.
    ///
    /// Any existing downstream link of `previous` and upstream link of
    /// `next` is replaced.
    pub fn link(previous: &mut Self, next: &mut Self) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        previous.downstream = Some(sender);
        next.upstream = Some(receiver);
    }

    /// Links this communicator to send to itself.
    pub fn link_to_self(&mut self) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.downstream = Some(sender);
        self.upstream = Some(receiver);
    }

    /// Queues a message to be received before anything from upstream.
    ///
    /// Used to seed the first instance of a pipeline.
    pub fn write_buffer(&mut self, value: V, time_point: f64, flag: Flag) {
        self.buffer.push_back(Message {
            value,
            time_point,
            flag,
        });
    }

    /// Sends a message downstream.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no downstream link or the downstream
    /// peer has gone away.
    pub fn send(&self, value: V, time_point: f64, flag: Flag) -> Result<(), CommunicatorError> {
        let sender = self
            .downstream
            .as_ref()
            .ok_or(CommunicatorError::Unlinked("downstream"))?;
        sender
            .send(Message {
                value,
                time_point,
                flag,
            })
            .map_err(|_| CommunicatorError::Disconnected("downstream"))
    }

    /// Blocks until a message is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty and there is no upstream link
    /// or the upstream peer has gone away.
    pub fn receive(&mut self) -> Result<Message<V>, CommunicatorError> {
        if let Some(message) = self.buffer.pop_front() {
            return Ok(message);
        }
        let receiver = self
            .upstream
            .as_ref()
            .ok_or(CommunicatorError::Unlinked("upstream"))?;
        receiver
            .recv()
            .map_err(|_| CommunicatorError::Disconnected("upstream"))
    }

    /// Returns the next message if one is ready.
    ///
    /// # Errors
    ///
    /// Same as [`Communicator::receive`].
    pub fn try_receive(&mut self) -> Result<Option<Message<V>>, CommunicatorError> {
        if let Some(message) = self.buffer.pop_front() {
            return Ok(Some(message));
        }
        let receiver = self
            .upstream
            .as_ref()
            .ok_or(CommunicatorError::Unlinked("upstream"))?;
        match receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(CommunicatorError::Disconnected("upstream")),
        }
    }

    /// Drops both links and any buffered messages.
    pub fn close(&mut self) {
        self.upstream = None;
        self.downstream = None;
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_loop_returns_sent_messages_in_order() {
        let mut communicator = Communicator::self_looped();
        communicator.send(1.0, 0.5, Flag::Iterating).unwrap();
        communicator.send(2.0, 1.0, Flag::Converged).unwrap();

        let first = communicator.receive().unwrap();
        assert_eq!(first.value, 1.0);
        assert_eq!(first.flag, Flag::Iterating);

        let second = communicator.try_receive().unwrap().unwrap();
        assert_eq!(second.time_point, 1.0);
        assert_eq!(communicator.try_receive().unwrap(), None);
    }

    #[test]
    fn buffer_comes_first() {
        let mut communicator = Communicator::self_looped();
        communicator.send(2.0, 1.0, Flag::Iterating).unwrap();
        communicator.write_buffer(1.0, 0.0, Flag::None);

        assert_eq!(communicator.receive().unwrap().value, 1.0);
        assert_eq!(communicator.receive().unwrap().value, 2.0);
    }

    #[test]
    fn ring_passes_messages_around() {
        let mut ring = Communicator::ring(3);
        ring[0].send(0.0, 0.0, Flag::Iterating).unwrap();
        let message = ring[1].receive().unwrap();
        ring[1].send(message.value + 1.0, 1.0, message.flag).unwrap();
        let message = ring[2].receive().unwrap();
        ring[2].send(message.value + 1.0, 2.0, Flag::Converged).unwrap();

        let message = ring[0].receive().unwrap();
        assert_eq!(message.value, 2.0);
        assert_eq!(message.flag, Flag::Converged);
    }

    #[test]
    fn closing_disconnects_neighbours() {
        let mut previous = Communicator::unlinked();
        let mut next = Communicator::unlinked();
        Communicator::link(&mut previous, &mut next);

        previous.send(vec![1.0], 0.0, Flag::Iterating).unwrap();
        previous.close();

        assert!(next.try_receive().unwrap().is_some());
        assert_eq!(
            next.try_receive(),
            Err(CommunicatorError::Disconnected("upstream"))
        );
        assert_eq!(
            previous.send(vec![2.0], 0.0, Flag::None),
            Err(CommunicatorError::Unlinked("downstream"))
        );
    }

    #[test]
    fn unlinked_receive_fails_once_buffer_is_empty() {
        let mut communicator = Communicator::unlinked();
        communicator.write_buffer(0.0, 0.0, Flag::None);
        assert!(communicator.receive().is_ok());
        assert_eq!(
            communicator.receive(),
            Err(CommunicatorError::Unlinked("upstream"))
        );
    }

    #[test]
    fn closed_flags() {
        assert!(Flag::None.is_closed());
        assert!(Flag::Converged.is_closed());
        assert!(Flag::Finished.is_closed());
        assert!(Flag::TimeAdjusted.is_closed());
        assert!(!Flag::Iterating.is_closed());
        assert!(!Flag::Failed.is_closed());
    }
}
