use log::{debug, info};

use crate::analysis::ehalf::{pair_peaks, PeakPair, DEFAULT_PEAK_SEP_LIMIT};
use crate::analysis::peaks::{find_peaks, PeakCandidate, DEFAULT_NOISE_FLOOR};
use crate::data::correct::correct_reference;
use crate::data::model::{CvExperiment, Segment};
use crate::data::select::{select, SegmentRange};
use crate::error::CvError;

// ---------------------------------------------------------------------------
// AnalyzeOptions – caller-supplied knobs for one run
// ---------------------------------------------------------------------------

/// Options for one processing run.
///
/// Everything is explicit — the pipeline reads no ambient configuration — so
/// runs over different files can proceed in parallel with no coordination.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    /// Which segments to keep, 1-based inclusive.
    pub segment_range: SegmentRange,
    /// Reference shift subtracted from every potential (V). 0.0 = none.
    pub reference_offset: f64,
    /// Maximum anodic/cathodic separation for an E1/2-eligible pair (V).
    pub peak_sep_limit: f64,
    /// Minimum margin a peak must clear over its neighbours (A).
    pub noise_floor: f64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            segment_range: SegmentRange::full(),
            reference_offset: 0.0,
            peak_sep_limit: DEFAULT_PEAK_SEP_LIMIT,
            noise_floor: DEFAULT_NOISE_FLOOR,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisResult – the final aggregate of one run
// ---------------------------------------------------------------------------

/// Everything one run produced. Built once, read-only afterwards; re-running
/// with a different trim or reference builds a fresh result instead of
/// mutating this one.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Selected segments with the reference correction applied.
    pub segments: Vec<Segment>,
    /// Matched couples, ascending anodic potential.
    pub pairs: Vec<PeakPair>,
    /// Candidates left over after pairing — reported, not discarded.
    pub unmatched: Vec<PeakCandidate>,
}

impl AnalysisResult {
    /// E1/2 values in report order.
    pub fn halfwaves(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|p| p.halfwave)
    }
}

/// Run the full pipeline over a decoded experiment:
/// select → correct → find peaks → pair → assemble.
///
/// Absence of peaks or qualifying pairs is a valid, reportable outcome; only
/// an invalid segment range errors here.
pub fn analyze(
    experiment: &CvExperiment,
    options: &AnalyzeOptions,
) -> Result<AnalysisResult, CvError> {
    let view = select(experiment, options.segment_range)?;
    let segments = correct_reference(view, options.reference_offset);

    let candidates = find_peaks(&segments, options.noise_floor);
    debug!(
        "{} peak candidate(s) across {} segment(s)",
        candidates.len(),
        segments.len()
    );

    let (mut pairs, unmatched) = pair_peaks(&candidates, options.peak_sep_limit);
    pairs.sort_by(|a, b| a.anodic.potential.total_cmp(&b.anodic.potential));

    info!(
        "{} E1/2 value(s) found, {} peak(s) unmatched",
        pairs.len(),
        unmatched.len()
    );

    Ok(AnalysisResult {
        segments,
        pairs,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{RawHeader, SweepDirection};

    /// Triangle bump (anodic) or dip (cathodic) centred at `centre` with the
    /// given half-width, riding on a flat baseline.
    fn wave(potential: &[f64], centre: f64, width: f64, amplitude: f64) -> Vec<f64> {
        potential
            .iter()
            .map(|&p| {
                let d = (p - centre).abs();
                if d < width {
                    amplitude * (1.0 - d / width)
                } else {
                    0.0
                }
            })
            .collect()
    }

    fn experiment(segments: Vec<Segment>) -> CvExperiment {
        let num_segments = segments.len();
        CvExperiment {
            header: RawHeader {
                instrument: "CHI760e".to_string(),
                technique: "CV".to_string(),
                comment: String::new(),
                init_e: 0.0,
                final_e: 0.0,
                high_e: 0.6,
                low_e: 0.0,
                scan_rate: 0.1,
                sample_interval: 0.01,
                quiet_time: 2.0,
                sensitivity: 1.0e-5,
                num_segments,
            },
            segments,
        }
    }

    fn forward_reverse_couple(anodic_at: f64, cathodic_at: f64) -> CvExperiment {
        let up: Vec<f64> = (0..=60).map(|i| i as f64 * 0.01).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        let seg1 = Segment {
            index: 1,
            direction: SweepDirection::Forward,
            current: wave(&up, anodic_at, 0.05, 2.0e-6),
            potential: up,
        };
        let seg2 = Segment {
            index: 2,
            direction: SweepDirection::Reverse,
            current: wave(&down, cathodic_at, 0.05, -2.0e-6),
            potential: down,
        };
        experiment(vec![seg1, seg2])
    }

    #[test]
    fn reversible_couple_reports_one_halfwave() {
        let exp = forward_reverse_couple(0.25, 0.15);
        let result = analyze(&exp, &AnalyzeOptions::default()).unwrap();
        assert_eq!(result.pairs.len(), 1);
        assert!((result.pairs[0].halfwave - 0.20).abs() < 1e-9);
        assert!((result.pairs[0].separation - 0.10).abs() < 1e-9);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn reference_offset_shifts_reported_potentials() {
        let exp = forward_reverse_couple(0.33, 0.25);
        let options = AnalyzeOptions {
            reference_offset: 0.08,
            ..Default::default()
        };
        let result = analyze(&exp, &options).unwrap();
        assert_eq!(result.pairs.len(), 1);
        // Anodic raw 0.33 V reads 0.25 V after correction.
        assert!((result.pairs[0].anodic.potential - 0.25).abs() < 1e-9);
        assert!((result.pairs[0].halfwave - 0.21).abs() < 1e-9);
    }

    #[test]
    fn wide_separation_reports_unmatched_not_pairs() {
        let exp = forward_reverse_couple(0.55, 0.05);
        let result = analyze(&exp, &AnalyzeOptions::default()).unwrap();
        assert!(result.pairs.is_empty());
        assert_eq!(result.unmatched.len(), 2);
    }

    #[test]
    fn pairs_come_back_in_ascending_anodic_potential() {
        let up: Vec<f64> = (0..=100).map(|i| i as f64 * 0.01).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        // Two couples riding on a gently sloped capacitive baseline; the
        // slope keeps the stretch between waves free of flat plateaus and
        // stays below the noise floor per sample.
        let mut fwd: Vec<f64> = up.iter().map(|p| p * 1.0e-8).collect();
        for (i, v) in wave(&up, 0.25, 0.05, 2.0e-6).iter().enumerate() {
            fwd[i] += v;
        }
        for (i, v) in wave(&up, 0.75, 0.05, 2.0e-6).iter().enumerate() {
            fwd[i] += v;
        }
        let mut rev: Vec<f64> = down.iter().map(|p| p * 1.0e-8).collect();
        for (i, v) in wave(&down, 0.17, 0.05, -2.0e-6).iter().enumerate() {
            rev[i] += v;
        }
        for (i, v) in wave(&down, 0.67, 0.05, -2.0e-6).iter().enumerate() {
            rev[i] += v;
        }
        let exp = experiment(vec![
            Segment {
                index: 1,
                direction: SweepDirection::Forward,
                current: fwd,
                potential: up,
            },
            Segment {
                index: 2,
                direction: SweepDirection::Reverse,
                current: rev,
                potential: down,
            },
        ]);

        let result = analyze(&exp, &AnalyzeOptions::default()).unwrap();
        assert_eq!(result.pairs.len(), 2);
        assert!(result.pairs[0].anodic.potential < result.pairs[1].anodic.potential);
        let halfwaves: Vec<f64> = result.halfwaves().collect();
        assert!((halfwaves[0] - 0.21).abs() < 1e-9);
        assert!((halfwaves[1] - 0.71).abs() < 1e-9);
    }

    #[test]
    fn trimmed_run_only_sees_selected_segments() {
        let exp = forward_reverse_couple(0.25, 0.15);
        let options = AnalyzeOptions {
            segment_range: SegmentRange::new(2, 2),
            ..Default::default()
        };
        let result = analyze(&exp, &options).unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].index, 2);
        // Only the cathodic peak remains; nothing to pair with.
        assert!(result.pairs.is_empty());
        assert_eq!(result.unmatched.len(), 1);
    }

    #[test]
    fn bad_range_propagates_selection_error() {
        let exp = forward_reverse_couple(0.25, 0.15);
        let options = AnalyzeOptions {
            segment_range: SegmentRange::new(7, 9),
            ..Default::default()
        };
        assert!(matches!(
            analyze(&exp, &options),
            Err(CvError::SelectionOutOfRange { .. })
        ));
    }
}
