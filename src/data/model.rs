use std::fmt;

// ---------------------------------------------------------------------------
// RawHeader – experiment-level metadata
// ---------------------------------------------------------------------------

/// Experiment metadata decoded once from the file header. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHeader {
    /// Instrument identifier, e.g. `CHI760e`.
    pub instrument: String,
    /// Technique identifier, e.g. `CV`.
    pub technique: String,
    /// Operator free-text comment.
    pub comment: String,
    /// Initial potential (V).
    pub init_e: f64,
    /// Final potential (V).
    pub final_e: f64,
    /// Upper sweep limit (V).
    pub high_e: f64,
    /// Lower sweep limit (V).
    pub low_e: f64,
    /// Scan rate (V/s).
    pub scan_rate: f64,
    /// Potential step between samples (V).
    pub sample_interval: f64,
    /// Rest period before the first sweep (s).
    pub quiet_time: f64,
    /// Current sensitivity (A/V).
    pub sensitivity: f64,
    /// Declared number of sweep segments.
    pub num_segments: usize,
}

// ---------------------------------------------------------------------------
// SweepDirection
// ---------------------------------------------------------------------------

/// Direction of one potential sweep, fixed at decode time so every stage
/// reads the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Potential increasing sample to sample.
    Forward,
    /// Potential decreasing sample to sample.
    Reverse,
}

impl SweepDirection {
    /// Infer the direction from the first non-zero potential delta.
    ///
    /// Returns `None` for segments with fewer than two samples or a perfectly
    /// flat potential trace; callers fall back to the on-disk marker.
    pub fn infer(potential: &[f64]) -> Option<Self> {
        potential.windows(2).find_map(|w| {
            let delta = w[1] - w[0];
            if delta > 0.0 {
                Some(SweepDirection::Forward)
            } else if delta < 0.0 {
                Some(SweepDirection::Reverse)
            } else {
                None
            }
        })
    }
}

impl fmt::Display for SweepDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepDirection::Forward => write!(f, "forward"),
            SweepDirection::Reverse => write!(f, "reverse"),
        }
    }
}

// ---------------------------------------------------------------------------
// Segment – one sweep's worth of samples
// ---------------------------------------------------------------------------

/// One continuous forward or reverse sweep.
///
/// `potential` and `current` always have equal length; `index` is the 1-based
/// position in the source file and is never renumbered, so output can cite
/// the true location of any segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub direction: SweepDirection,
    /// Potential axis (V).
    pub potential: Vec<f64>,
    /// Current axis (A) – same length as `potential`.
    pub current: Vec<f64>,
}

impl Segment {
    /// Number of samples in the segment.
    pub fn len(&self) -> usize {
        self.potential.len()
    }

    /// Whether the segment holds no samples.
    pub fn is_empty(&self) -> bool {
        self.potential.is_empty()
    }

    /// Iterate over `(potential, current)` pairs in sample order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.potential
            .iter()
            .copied()
            .zip(self.current.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// CvExperiment – the canonical decoded representation
// ---------------------------------------------------------------------------

/// The full decoded experiment: header plus every segment in file order.
/// Built by the decoder, immutable afterwards. This is the canonical, uncut
/// representation every downstream view derives from.
#[derive(Debug, Clone)]
pub struct CvExperiment {
    pub header: RawHeader,
    pub segments: Vec<Segment>,
}

impl CvExperiment {
    /// Number of decoded segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the experiment holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Borrow every segment as one full-range view.
    pub fn full_view(&self) -> SelectedView<'_> {
        SelectedView::new(&self.segments)
    }
}

// ---------------------------------------------------------------------------
// SelectedView – a borrowed window over contiguous segments
// ---------------------------------------------------------------------------

/// A non-owning window over a contiguous run of an experiment's segments.
///
/// No sample data is copied; the borrow ties the view's lifetime to the
/// parent experiment, so a view can never dangle past a replaced experiment.
#[derive(Debug, Clone, Copy)]
pub struct SelectedView<'a> {
    segments: &'a [Segment],
}

impl<'a> SelectedView<'a> {
    pub(crate) fn new(segments: &'a [Segment]) -> Self {
        Self { segments }
    }

    /// The selected segments in original order.
    pub fn segments(&self) -> &'a [Segment] {
        self.segments
    }

    /// Number of selected segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Original 1-based index of the first selected segment.
    pub fn first_index(&self) -> Option<usize> {
        self.segments.first().map(|s| s.index)
    }

    /// Original 1-based index of the last selected segment.
    pub fn last_index(&self) -> Option<usize> {
        self.segments.last().map(|s| s.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_inferred_from_first_nonzero_delta() {
        assert_eq!(
            SweepDirection::infer(&[0.0, 0.1, 0.2]),
            Some(SweepDirection::Forward)
        );
        assert_eq!(
            SweepDirection::infer(&[0.5, 0.4]),
            Some(SweepDirection::Reverse)
        );
        // Turning-point jitter: a leading flat sample does not confuse it.
        assert_eq!(
            SweepDirection::infer(&[0.5, 0.5, 0.4]),
            Some(SweepDirection::Reverse)
        );
    }

    #[test]
    fn direction_undecidable_without_a_delta() {
        assert_eq!(SweepDirection::infer(&[]), None);
        assert_eq!(SweepDirection::infer(&[0.3]), None);
        assert_eq!(SweepDirection::infer(&[0.3, 0.3]), None);
    }
}
