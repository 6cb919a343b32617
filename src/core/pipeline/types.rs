//! Pipeline types and handler trait

use async_trait::async_trait;
use std::future::Future;

/// Outcome of one digestion round
#[derive(Debug, Clone)]
pub struct GroupReport<M> {
    /// Round number, starting at 1 for the first group of a pipe
    pub sequence: u64,
    /// Number of messages delivered in the group
    pub size: usize,
    /// Messages the handler could not digest
    pub undigested: Vec<M>,
}

impl<M> GroupReport<M> {
    /// Whether every message of the group was digested
    pub fn is_clean(&self) -> bool {
        self.undigested.is_empty()
    }
}

/// Consumer of message groups
///
/// Returns the subset of the group that failed digestion.
#[async_trait]
pub trait GroupHandler<M>: Send + Sync {
    async fn handle_group(&self, group: Vec<M>) -> Vec<M>;
}

/// Adapter turning an async closure into a [`GroupHandler`]
pub struct FnGroupHandler<F>(pub F);

#[async_trait]
impl<M, F, Fut> GroupHandler<M> for FnGroupHandler<F>
where
    M: Send + 'static,
    F: Fn(Vec<M>) -> Fut + Send + Sync,
    Fut: Future<Output = Vec<M>> + Send,
{
    async fn handle_group(&self, group: Vec<M>) -> Vec<M> {
        (self.0)(group).await
    }
}
