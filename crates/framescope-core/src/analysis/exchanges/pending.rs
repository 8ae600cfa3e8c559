use std::collections::{BTreeMap, VecDeque};

use crate::analysis::rows::FrameRow;

/// Unmatched requests, oldest first per key.
#[derive(Debug)]
pub(crate) struct PendingQueue<K, V> {
    queues: BTreeMap<K, VecDeque<V>>,
}

impl<K: Ord + Clone, V> PendingQueue<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            queues: BTreeMap::new(),
        }
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        self.queues.entry(key).or_default().push_back(value);
    }

    pub(crate) fn pop_oldest(&mut self, key: &K) -> Option<V> {
        self.queues.get_mut(key)?.pop_front()
    }

    /// Everything still queued, by key then arrival.
    pub(crate) fn into_remaining(self) -> impl Iterator<Item = (K, V)> {
        self.queues
            .into_iter()
            .flat_map(|(key, queue)| queue.into_iter().map(move |value| (key.clone(), value)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Request,
    Response,
}

/// One request/response pairing outcome. At least one side is set.
#[derive(Debug)]
pub(crate) struct FifoMatch<'r, K> {
    pub key: K,
    pub request: Option<&'r FrameRow>,
    pub response: Option<&'r FrameRow>,
}

/// Pair each response with the oldest pending request of the same key.
///
/// Matches and orphan responses come out in scan order, followed by
/// the requests that were never answered.
pub(crate) fn match_fifo<'r, K, I>(events: I) -> Vec<FifoMatch<'r, K>>
where
    K: Ord + Clone,
    I: IntoIterator<Item = (K, Side, &'r FrameRow)>,
{
    let mut pending = PendingQueue::new();
    let mut out = Vec::new();

    for (key, side, row) in events {
        match side {
            Side::Request => pending.push(key, row),
            Side::Response => {
                let request = pending.pop_oldest(&key);
                out.push(FifoMatch {
                    key,
                    request,
                    response: Some(row),
                });
            }
        }
    }

    out.extend(pending.into_remaining().map(|(key, row)| FifoMatch {
        key,
        request: Some(row),
        response: None,
    }));
    out
}
