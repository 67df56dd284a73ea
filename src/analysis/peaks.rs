use crate::data::model::Segment;

// ---------------------------------------------------------------------------
// PeakCandidate – a current extremum accepted by the prominence rule
// ---------------------------------------------------------------------------

/// Which half of a redox couple a peak belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Oxidation: a local maximum of the current trace.
    Anodic,
    /// Reduction: a local minimum of the current trace.
    Cathodic,
}

/// A current extremum found in one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    /// 1-based original index of the segment the peak sits in.
    pub segment: usize,
    /// Potential at the extremum (V).
    pub potential: f64,
    /// Current at the extremum (A).
    pub current: f64,
    pub polarity: Polarity,
}

/// Default minimum margin a peak must clear over both neighbours: 1 nA,
/// orders of magnitude under a faradaic wave at typical CV sensitivities.
pub const DEFAULT_NOISE_FLOOR: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Find candidate anodic and cathodic peaks in every segment.
///
/// Segments are scanned independently; candidates come back in segment order
/// and, within a segment, in sample order. Empty segments simply contribute
/// nothing.
pub fn find_peaks(segments: &[Segment], noise_floor: f64) -> Vec<PeakCandidate> {
    let mut candidates = Vec::new();
    for segment in segments {
        scan_segment(segment, noise_floor, &mut candidates);
    }
    candidates
}

/// Scan one segment's current trace for local extrema.
///
/// A maximal run of equal samples is treated as a single candidate anchored
/// at its first index. The run qualifies only when its value clears both
/// flanking (differing) samples by at least `noise_floor`, which drops
/// single-sample noise spikes. Endpoints have one neighbour and never
/// qualify.
fn scan_segment(segment: &Segment, noise_floor: f64, out: &mut Vec<PeakCandidate>) {
    let current = &segment.current;
    let n = current.len();

    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && current[end + 1] == current[start] {
            end += 1;
        }

        if start > 0 && end + 1 < n {
            let value = current[start];
            let left = current[start - 1];
            let right = current[end + 1];

            let polarity = if value >= left + noise_floor && value >= right + noise_floor {
                Some(Polarity::Anodic)
            } else if value <= left - noise_floor && value <= right - noise_floor {
                Some(Polarity::Cathodic)
            } else {
                None
            };

            if let Some(polarity) = polarity {
                out.push(PeakCandidate {
                    segment: segment.index,
                    potential: segment.potential[start],
                    current: value,
                    polarity,
                });
            }
        }

        start = end + 1;
    }
}
