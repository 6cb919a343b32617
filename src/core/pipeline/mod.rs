//! Buffered message batching with serialized group digestion
//!
//! Messages are queued with [`MessagesPipe::add_in_queue`] and handed to the
//! registered [`GroupHandler`] in groups of at most `max_batch_size`. Partial
//! groups are flushed once the flush interval elapses. Only one group is in
//! flight at a time; rejected messages are reported back, never retried.

mod pipe;
mod supplier;
mod types;


pub use pipe::MessagesPipe;
pub use supplier::{BatchSupplier, FifoSupplier, KeyedSupplier};
pub use types::{FnGroupHandler, GroupHandler, GroupReport};
