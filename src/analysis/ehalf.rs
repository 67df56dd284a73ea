use crate::analysis::peaks::{PeakCandidate, Polarity};

// ---------------------------------------------------------------------------
// PeakPair – a matched reversible couple
// ---------------------------------------------------------------------------

/// Default maximum anodic/cathodic separation for a reversible couple (V).
pub const DEFAULT_PEAK_SEP_LIMIT: f64 = 0.2;

/// A matched anodic/cathodic couple and its half-wave potential.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakPair {
    pub anodic: PeakCandidate,
    pub cathodic: PeakCandidate,
    /// |E_anodic − E_cathodic| (V).
    pub separation: f64,
    /// (E_anodic + E_cathodic) / 2 (V).
    pub halfwave: f64,
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// Pair anodic and cathodic candidates within `peak_sep_limit` and compute
/// E1/2 for every accepted pair.
///
/// Every anodic×cathodic combination is considered exactly once, regardless
/// of segment. Qualifying combinations (separation ≤ limit, boundary
/// inclusive) are processed in ascending order of separation, so a loose
/// pairing can never steal a candidate from a tighter one; equal separations
/// keep candidate discovery order. Each candidate joins at most one pair.
/// Leftovers come back as the unmatched set, ordered by (segment, potential)
/// — reported, not discarded, so the operator can see why no E1/2 appeared.
pub fn pair_peaks(
    candidates: &[PeakCandidate],
    peak_sep_limit: f64,
) -> (Vec<PeakPair>, Vec<PeakCandidate>) {
    let anodic: Vec<PeakCandidate> = candidates
        .iter()
        .copied()
        .filter(|c| c.polarity == Polarity::Anodic)
        .collect();
    let cathodic: Vec<PeakCandidate> = candidates
        .iter()
        .copied()
        .filter(|c| c.polarity == Polarity::Cathodic)
        .collect();

    let mut combos: Vec<(f64, usize, usize)> = Vec::new();
    for (ai, a) in anodic.iter().enumerate() {
        for (ci, c) in cathodic.iter().enumerate() {
            let separation = (a.potential - c.potential).abs();
            if separation <= peak_sep_limit {
                combos.push((separation, ai, ci));
            }
        }
    }
    // Stable sort: ties keep the discovery order the combos were built in.
    combos.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut anodic_used = vec![false; anodic.len()];
    let mut cathodic_used = vec![false; cathodic.len()];
    let mut pairs = Vec::new();

    for (separation, ai, ci) in combos {
        if anodic_used[ai] || cathodic_used[ci] {
            continue;
        }
        anodic_used[ai] = true;
        cathodic_used[ci] = true;
        pairs.push(PeakPair {
            anodic: anodic[ai],
            cathodic: cathodic[ci],
            separation,
            halfwave: 0.5 * (anodic[ai].potential + cathodic[ci].potential),
        });
    }

    let mut unmatched: Vec<PeakCandidate> = anodic
        .into_iter()
        .zip(anodic_used)
        .chain(cathodic.into_iter().zip(cathodic_used))
        .filter(|(_, used)| !used)
        .map(|(c, _)| c)
        .collect();
    unmatched.sort_by(|a, b| {
        a.segment
            .cmp(&b.segment)
            .then(a.potential.total_cmp(&b.potential))
    });

    (pairs, unmatched)
}
