use crate::data::model::{Segment, SelectedView};

/// Shift every potential sample by `-offset`, producing owned segments.
///
/// Experimentalists report potentials relative to a couple's formal potential
/// (typically Fc+/Fc) rather than the instrument's raw reference electrode,
/// so the whole axis moves by one constant. Currents, sample ordering,
/// segment indices, and direction are untouched; an offset of `0.0` is the
/// identity apart from materializing the owned segments the result carries.
pub fn correct_reference(view: SelectedView<'_>, offset: f64) -> Vec<Segment> {
    view.segments()
        .iter()
        .map(|seg| Segment {
            index: seg.index,
            direction: seg.direction,
            potential: seg.potential.iter().map(|p| p - offset).collect(),
            current: seg.current.clone(),
        })
        .collect()
}
