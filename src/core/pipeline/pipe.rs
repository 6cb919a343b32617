//! Messages pipe implementation

use super::supplier::{BatchSupplier, FifoSupplier};
use super::types::{FnGroupHandler, GroupHandler, GroupReport};
use crate::config::PipelineConfig;
use crate::utils::error::{Result, WalletError};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, warn};

/// Mutable pipe state, only touched under the state lock
struct PipeState<M> {
    pending: VecDeque<M>,
    /// When the oldest pending message started waiting
    waiting_since: Option<Instant>,
    handler: Option<Arc<dyn GroupHandler<M>>>,
    enqueued: u64,
    settled: u64,
    undigested: Vec<M>,
    closed: bool,
}

struct Shared<M> {
    state: Mutex<PipeState<M>>,
    /// Wakes the worker on new messages, a new handler or close
    wakeup: Notify,
    /// Wakes `drain` callers after every settled group
    settled: Notify,
    reports: mpsc::UnboundedSender<GroupReport<M>>,
}

enum Step<M> {
    Exit,
    Wait(Option<Instant>),
    Deliver(Arc<dyn GroupHandler<M>>, Vec<M>),
}

/// Buffered pipe delivering message groups to a single handler, one at a time
pub struct MessagesPipe<M> {
    max_batch_size: usize,
    flush_interval: Duration,
    supplier: Arc<dyn BatchSupplier<M>>,
    shared: Arc<Shared<M>>,
    reports_rx: Mutex<Option<mpsc::UnboundedReceiver<GroupReport<M>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<M> MessagesPipe<M>
where
    M: Clone + Send + 'static,
{
    /// Create a new pipe
    ///
    /// A `max_batch_size` of zero is treated as one.
    pub fn new<S>(max_batch_size: usize, flush_interval: Duration, supplier: S) -> Self
    where
        S: BatchSupplier<M> + 'static,
    {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();

        Self {
            max_batch_size: max_batch_size.max(1),
            flush_interval,
            supplier: Arc::new(supplier),
            shared: Arc::new(Shared {
                state: Mutex::new(PipeState {
                    pending: VecDeque::new(),
                    waiting_since: None,
                    handler: None,
                    enqueued: 0,
                    settled: 0,
                    undigested: Vec::new(),
                    closed: false,
                }),
                wakeup: Notify::new(),
                settled: Notify::new(),
                reports: reports_tx,
            }),
            reports_rx: Mutex::new(Some(reports_rx)),
            worker: Mutex::new(None),
        }
    }

    /// Create a FIFO pipe from configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.max_batch_size, config.flush_interval(), FifoSupplier)
    }

    /// Register the handler that digests each group
    ///
    /// Replaces any previous handler; a group already in flight finishes with
    /// the handler it started with.
    pub fn on_new_group<H>(&self, handler: H) -> Result<()>
    where
        H: GroupHandler<M> + 'static,
    {
        {
            let mut state = self.shared.state.lock();
            if state.closed {
                return Err(WalletError::internal("Messages pipe is closed"));
            }
            state.handler = Some(Arc::new(handler));
        }
        self.ensure_worker()?;
        self.shared.wakeup.notify_one();
        Ok(())
    }

    /// Register an async closure as the group handler
    pub fn on_new_group_fn<F, Fut>(&self, handler: F) -> Result<()>
    where
        F: Fn(Vec<M>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<M>> + Send + 'static,
    {
        self.on_new_group(FnGroupHandler(handler))
    }

    /// Queue messages for digestion
    ///
    /// Never blocks and never digests synchronously; the background worker
    /// forms the groups.
    pub fn add_in_queue<I>(&self, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
    {
        let added = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return Err(WalletError::internal("Messages pipe is closed"));
            }
            let before = state.pending.len();
            state.pending.extend(messages);
            let added = state.pending.len() - before;
            state.enqueued += added as u64;
            if added > 0 && state.waiting_since.is_none() {
                state.waiting_since = Some(Instant::now());
            }
            added
        };

        if added == 0 {
            return Ok(());
        }

        debug!("Queued {} messages", added);
        self.ensure_worker()?;
        self.shared.wakeup.notify_one();
        Ok(())
    }

    /// Take the stream of per-group reports
    ///
    /// Only the first call returns a receiver.
    pub fn reports(&self) -> Option<mpsc::UnboundedReceiver<GroupReport<M>>> {
        self.reports_rx.lock().take()
    }

    /// Wait until every message queued so far has been delivered
    ///
    /// Returns the messages rejected since the previous `drain`. Waits
    /// indefinitely while no handler is registered.
    pub async fn drain(&self) -> Vec<M> {
        loop {
            let settled = self.shared.settled.notified();
            tokio::pin!(settled);
            settled.as_mut().enable();

            {
                let mut state = self.shared.state.lock();
                if state.closed || state.settled >= state.enqueued {
                    return std::mem::take(&mut state.undigested);
                }
            }

            settled.await;
        }
    }

    /// Number of messages waiting for a group
    pub fn pending_len(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Whether the pipe was closed
    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Maximum group size
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Stop the worker and drop queued messages
    ///
    /// A group already in flight completes; nothing is delivered afterwards.
    pub fn close(&self) {
        let dropped = {
            let mut state = self.shared.state.lock();
            state.closed = true;
            let dropped = state.pending.len();
            state.pending.clear();
            state.waiting_since = None;
            dropped
        };
        if dropped > 0 {
            warn!("Messages pipe closed with {} undelivered messages", dropped);
        }
        self.shared.wakeup.notify_one();
        self.shared.settled.notify_waiters();
    }

    fn ensure_worker(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            WalletError::internal(format!("Messages pipe needs a tokio runtime: {}", e))
        })?;

        let shared = self.shared.clone();
        let supplier = self.supplier.clone();
        let max = self.max_batch_size;
        let flush = self.flush_interval;
        *worker = Some(runtime.spawn(run_worker(shared, supplier, max, flush)));
        Ok(())
    }
}

impl<M> Drop for MessagesPipe<M> {
    fn drop(&mut self) {
        self.shared.state.lock().closed = true;
        self.shared.wakeup.notify_one();
        self.shared.settled.notify_waiters();
    }
}

async fn run_worker<M>(
    shared: Arc<Shared<M>>,
    supplier: Arc<dyn BatchSupplier<M>>,
    max_batch_size: usize,
    flush_interval: Duration,
) where
    M: Clone + Send + 'static,
{
    let mut sequence = 0u64;

    loop {
        let wakeup = shared.wakeup.notified();
        tokio::pin!(wakeup);
        wakeup.as_mut().enable();

        match next_step(&shared, supplier.as_ref(), max_batch_size, flush_interval) {
            Step::Exit => break,
            Step::Wait(None) => wakeup.await,
            Step::Wait(Some(deadline)) => {
                tokio::select! {
                    _ = &mut wakeup => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            Step::Deliver(handler, group) => {
                sequence += 1;
                let size = group.len();
                debug!("Delivering group {} with {} messages", sequence, size);

                let fallback = group.clone();
                let undigested = match AssertUnwindSafe(handler.handle_group(group))
                    .catch_unwind()
                    .await
                {
                    Ok(undigested) => undigested,
                    Err(_) => {
                        error!("Group handler panicked, marking group {} undigested", sequence);
                        fallback
                    }
                };

                if !undigested.is_empty() {
                    debug!(
                        "Group {} left {} undigested messages",
                        sequence,
                        undigested.len()
                    );
                }

                {
                    let mut state = shared.state.lock();
                    state.settled += size as u64;
                    state.undigested.extend(undigested.iter().cloned());
                }

                // Nobody listening for reports is fine
                let _ = shared.reports.send(GroupReport {
                    sequence,
                    size,
                    undigested,
                });
                shared.settled.notify_waiters();
            }
        }
    }

    debug!("Messages pipe worker stopped");
}

fn next_step<M>(
    shared: &Shared<M>,
    supplier: &dyn BatchSupplier<M>,
    max_batch_size: usize,
    flush_interval: Duration,
) -> Step<M> {
    let mut state = shared.state.lock();
    if state.closed {
        return Step::Exit;
    }

    let Some(handler) = state.handler.clone() else {
        return Step::Wait(None);
    };

    if state.pending.is_empty() {
        return Step::Wait(None);
    }

    if state.pending.len() < max_batch_size {
        let since = *state.waiting_since.get_or_insert_with(Instant::now);
        // An unrepresentable deadline never expires
        let Some(deadline) = since.checked_add(flush_interval) else {
            return Step::Wait(None);
        };
        if Instant::now() < deadline {
            return Step::Wait(Some(deadline));
        }
    }

    let group = take_group(&mut state.pending, supplier, max_batch_size);
    if state.pending.is_empty() {
        state.waiting_since = None;
    }
    Step::Deliver(handler, group)
}

/// Pull one group, keeping `1 <= len <= max_batch_size`
fn take_group<M>(
    pending: &mut VecDeque<M>,
    supplier: &dyn BatchSupplier<M>,
    max_batch_size: usize,
) -> Vec<M> {
    let mut group = supplier.next_block(pending, max_batch_size);

    if group.is_empty() {
        warn!("Batch supplier returned nothing, falling back to arrival order");
        group = FifoSupplier.next_block(pending, max_batch_size);
    }

    if group.len() > max_batch_size {
        warn!(
            "Batch supplier returned {} messages, limit is {}",
            group.len(),
            max_batch_size
        );
        for message in group.drain(max_batch_size..).rev() {
            pending.push_front(message);
        }
    }

    group
}
