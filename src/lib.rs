//! voltgram
//! ========
//!
//! Decoder and analysis engine for `.bin` cyclic-voltammetry exports from the
//! CH Instruments CHI760e electrochemical workstation. The decoder turns the
//! vendor byte stream into a segment-indexed potential/current series; the
//! analysis engine detects current peaks per segment, pairs anodic and
//! cathodic peaks within a separation tolerance, and reports the half-wave
//! potential (E1/2) of each matched couple.
//!
//! The pipeline is strictly staged and synchronous:
//!
//! ```text
//! decode → select → correct → find peaks → pair → report
//! ```
//!
//! Each run owns its own [`CvExperiment`] and [`AnalysisResult`] and touches
//! no shared mutable state, so processing many files in parallel needs no
//! coordination — one call per worker.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod io;

pub use analysis::ehalf::{PeakPair, DEFAULT_PEAK_SEP_LIMIT};
pub use analysis::peaks::{PeakCandidate, Polarity, DEFAULT_NOISE_FLOOR};
pub use analysis::report::{analyze, AnalysisResult, AnalyzeOptions};
pub use data::decoder::decode;
pub use data::model::{CvExperiment, RawHeader, Segment, SelectedView, SweepDirection};
pub use data::select::{RangeEnd, SegmentRange};
pub use error::CvError;
