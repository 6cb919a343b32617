//! Strategies for pulling the next group out of the pending queue

use std::collections::VecDeque;

/// Picks the next group of messages from the pending queue
///
/// Implementations remove the messages they return from `pending`. The pipe
/// truncates over-long groups and falls back to FIFO order when nothing is
/// returned while messages are pending.
pub trait BatchSupplier<M>: Send + Sync {
    fn next_block(&self, pending: &mut VecDeque<M>, limit: usize) -> Vec<M>;
}

impl<M, F> BatchSupplier<M> for F
where
    F: Fn(&mut VecDeque<M>, usize) -> Vec<M> + Send + Sync,
{
    fn next_block(&self, pending: &mut VecDeque<M>, limit: usize) -> Vec<M> {
        self(pending, limit)
    }
}

/// Takes messages in arrival order
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoSupplier;

impl<M> BatchSupplier<M> for FifoSupplier {
    fn next_block(&self, pending: &mut VecDeque<M>, limit: usize) -> Vec<M> {
        let take = limit.min(pending.len());
        pending.drain(..take).collect()
    }
}

/// Takes the leading run of messages sharing the same key
///
/// Keeps messages of one kind (e.g. products) out of groups of another kind
/// (e.g. batches) without reordering the queue.
pub struct KeyedSupplier<F> {
    key: F,
}

impl<F> KeyedSupplier<F> {
    pub fn new(key: F) -> Self {
        Self { key }
    }
}

impl<M, K, F> BatchSupplier<M> for KeyedSupplier<F>
where
    K: PartialEq,
    F: Fn(&M) -> K + Send + Sync,
{
    fn next_block(&self, pending: &mut VecDeque<M>, limit: usize) -> Vec<M> {
        let Some(first) = pending.front() else {
            return Vec::new();
        };
        let key = (self.key)(first);
        let run = pending
            .iter()
            .take(limit)
            .take_while(|m| (self.key)(m) == key)
            .count();
        pending.drain(..run).collect()
    }
}
