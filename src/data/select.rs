use crate::data::model::{CvExperiment, SelectedView};
use crate::error::CvError;

// ---------------------------------------------------------------------------
// SegmentRange – 1-based inclusive range with a "through last" sentinel
// ---------------------------------------------------------------------------

/// Inclusive end of a segment range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// A concrete 1-based segment index.
    At(usize),
    /// Through the experiment's final segment, resolved at call time.
    Last,
}

/// A 1-based inclusive range of original segment indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: usize,
    pub end: RangeEnd,
}

impl SegmentRange {
    /// Range covering `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: RangeEnd::At(end),
        }
    }

    /// Range covering `start` through the final segment.
    pub fn through_last(start: usize) -> Self {
        Self {
            start,
            end: RangeEnd::Last,
        }
    }

    /// The whole experiment.
    pub fn full() -> Self {
        Self::through_last(1)
    }
}

impl Default for SegmentRange {
    fn default() -> Self {
        Self::full()
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Select the segments whose original index falls within `range`.
///
/// A pure index-range filter: no sample data is copied, ordering and 1-based
/// indices are preserved, so any report can cite the true position in the
/// source file. An `end` past the final segment clamps to it; a `start`
/// outside the experiment is a hard error.
pub fn select(
    experiment: &CvExperiment,
    range: SegmentRange,
) -> Result<SelectedView<'_>, CvError> {
    let count = experiment.len();
    if range.start == 0 || range.start > count {
        return Err(CvError::SelectionOutOfRange {
            reason: format!("start {} outside 1..={count}", range.start),
        });
    }

    let end = match range.end {
        RangeEnd::At(end) if end < range.start => {
            return Err(CvError::SelectionOutOfRange {
                reason: format!("end {end} precedes start {}", range.start),
            });
        }
        RangeEnd::At(end) => end.min(count),
        RangeEnd::Last => count,
    };

    Ok(SelectedView::new(&experiment.segments[range.start - 1..end]))
}
