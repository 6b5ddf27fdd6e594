//! k-NN search (`search_nn`): rank clusters by proximity, prune with the
//! triangle inequality, admit survivors into a bounded queue.

use distances::{Metric, Number};
use knncolle::NeighborQueue;

use crate::prebuilt::Prebuilt;

/// Populates `queue` (already `reset(k)`-ed by the caller) with the nearest
/// rows to `query`, in raw-distance units, keyed by permuted row index.
///
/// `center_order` is caller-supplied scratch, cleared and reused here to
/// avoid a per-query allocation.
pub(crate) fn search_nn<T, M>(prebuilt: &Prebuilt<T, M>, query: &[T], queue: &mut NeighborQueue<T>, center_order: &mut Vec<(T, usize)>)
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T>,
{
    let metric = prebuilt.metric();

    // 1. Rank clusters by proximity to the query.
    center_order.clear();
    center_order.reserve(prebuilt.ncenters());
    for c in 0..prebuilt.ncenters() {
        let raw = metric.raw(query, prebuilt.center(c));
        center_order.push((raw, c));
    }
    center_order.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // 2. Initialize the admission threshold to +inf (no cap yet).
    let mut threshold_raw: Option<T> = None;

    // 3. Walk clusters in proximity order.
    for &(raw_center, c) in center_order.iter() {
        let dist2center = metric.normalize(raw_center);
        let start = prebuilt.offsets[c];
        let end = start + prebuilt.sizes[c];
        let maxdist = prebuilt.dist_to_centroid[end - 1];

        let mut lo = start;
        if let Some(thr_raw) = threshold_raw {
            let threshold = metric.normalize(thr_raw);
            if maxdist < dist2center - threshold {
                // Lower-bound prune: no point in this cluster can beat the threshold.
                continue;
            }
            let target = dist2center - threshold;
            lo += prebuilt.dist_to_centroid[start..end].partition_point(|&d| d < target);
        }

        for r in lo..end {
            if cfg!(feature = "upper-bound-break") {
                if let Some(thr_raw) = threshold_raw {
                    let upper_bd = metric.normalize(thr_raw) + dist2center;
                    if prebuilt.dist_to_centroid[r] > upper_bd {
                        break;
                    }
                }
            }

            let raw = metric.raw(query, prebuilt.row(r));
            let admit = match threshold_raw {
                Some(t) => raw <= t,
                None => true,
            };
            if admit {
                queue.add(r, raw);
                if queue.is_full() {
                    threshold_raw = queue.limit();
                }
            }
        }
    }
}
