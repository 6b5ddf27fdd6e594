//! A bounded top-k min-distance collector.

use std::{cmp::Ordering, collections::BinaryHeap};

use distances::Number;

/// An entry in the heap: an item id, its raw distance, and the order in which
/// it was admitted (used only to break distance ties deterministically).
struct Entry<R> {
    id: usize,
    raw: R,
    seq: u64,
}

impl<R: PartialEq> PartialEq for Entry<R> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.seq == other.seq
    }
}
impl<R: PartialEq> Eq for Entry<R> {}

impl<R: PartialOrd> PartialOrd for Entry<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: PartialOrd> Ord for Entry<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw
            .partial_cmp(&other.raw)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A bounded top-k min-distance collector.
///
/// Backed by a max-heap capped at `k` entries: once full, a candidate is
/// admitted only if it is strictly closer than the current farthest admitted
/// item, which is then evicted. `report` drains the queue in ascending
/// `(raw_distance, admission_order)` order, matching the ordering guarantee
/// in the parent crate's search routines.
pub struct NeighborQueue<R> {
    heap: BinaryHeap<Entry<R>>,
    capacity: usize,
    next_seq: u64,
}

impl<R: Number> NeighborQueue<R> {
    /// Creates an empty queue. Call [`NeighborQueue::reset`] before first use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            capacity: 0,
            next_seq: 0,
        }
    }

    /// Clears the queue and sets its capacity to `capacity`.
    pub fn reset(&mut self, capacity: usize) {
        self.heap.clear();
        self.capacity = capacity;
        self.next_seq = 0;
    }

    /// Admits `(id, raw)` if the queue is not yet full, or if `raw` is
    /// strictly less than the current worst admitted distance.
    pub fn add(&mut self, id: usize, raw: R) {
        if self.capacity == 0 {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.heap.len() < self.capacity {
            self.heap.push(Entry { id, raw, seq });
        } else if let Some(worst) = self.heap.peek() {
            if raw < worst.raw {
                self.heap.pop();
                self.heap.push(Entry { id, raw, seq });
            }
        }
    }

    /// Returns `true` if the queue holds `capacity` entries.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Returns the largest raw distance currently admitted, if any.
    #[must_use]
    pub fn limit(&self) -> Option<R> {
        self.heap.peek().map(|e| e.raw)
    }

    /// Drains the queue into `out_ids`/`out_dists`, in ascending raw-distance
    /// order (ties broken by admission order), optionally skipping one id.
    ///
    /// Either output may be `None`, in which case that slot is simply not
    /// written (the search itself is unaffected).
    pub fn report(&mut self, mut out_ids: Option<&mut Vec<usize>>, mut out_raw: Option<&mut Vec<R>>, exclude_id: Option<usize>) {
        let mut items: Vec<Entry<R>> = self.heap.drain().collect();
        items.sort_by(|a, b| a.cmp(b));
        for entry in items {
            if exclude_id == Some(entry.id) {
                continue;
            }
            if let Some(ids) = out_ids.as_deref_mut() {
                ids.push(entry.id);
            }
            if let Some(dists) = out_raw.as_deref_mut() {
                dists.push(entry.raw);
            }
        }
    }
}

impl<R: Number> Default for NeighborQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}
