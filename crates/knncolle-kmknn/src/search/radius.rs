//! Radius search (`search_all`): report or count every row within a fixed
//! true-distance threshold. Clusters are visited in storage order since the
//! threshold is constant, so sorting by proximity would waste work here.

use distances::{Metric, Number};

use crate::prebuilt::Prebuilt;

/// Reports (or just counts) every row within true distance `radius` of
/// `query`. Either output vector may be omitted (`None`): the search still
/// runs in full but simply skips writing that buffer, covering both the
/// count-only and collecting modes with one routine.
///
/// Returns the number of rows found, regardless of which outputs were requested.
pub(crate) fn search_all<T, M>(
    prebuilt: &Prebuilt<T, M>,
    query: &[T],
    radius: T,
    mut out_ids: Option<&mut Vec<usize>>,
    mut out_raw: Option<&mut Vec<T>>,
) -> usize
where
    T: Number,
    M: Metric<T, Raw = T, Distance = T>,
{
    let metric = prebuilt.metric();
    let raw_radius = metric.denormalize(radius);
    let mut count = 0usize;

    for c in 0..prebuilt.ncenters() {
        let start = prebuilt.offsets[c];
        let end = start + prebuilt.sizes[c];
        let dist2center = metric.normalize(metric.raw(query, prebuilt.center(c)));
        let maxdist = prebuilt.dist_to_centroid[end - 1];

        if maxdist < dist2center - radius {
            continue;
        }
        let target = dist2center - radius;
        let lo = start + prebuilt.dist_to_centroid[start..end].partition_point(|&d| d < target);
        let upper_bd = radius + dist2center;

        for r in lo..end {
            if cfg!(feature = "upper-bound-break") && prebuilt.dist_to_centroid[r] > upper_bd {
                break;
            }
            let raw = metric.raw(query, prebuilt.row(r));
            if raw <= raw_radius {
                count += 1;
                if let Some(ids) = out_ids.as_deref_mut() {
                    ids.push(r);
                }
                if let Some(raws) = out_raw.as_deref_mut() {
                    raws.push(raw);
                }
            }
        }
    }

    count
}
