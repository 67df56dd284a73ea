/// Analysis layer: peak detection, anodic/cathodic pairing, and the
/// run-level report.
///
/// `peaks` scans each segment's current trace for prominence-gated local
/// extrema, `ehalf` pairs them into reversible couples and computes E1/2,
/// and `report` drives the whole select → correct → detect → pair pipeline
/// into one [`AnalysisResult`](report::AnalysisResult).
pub mod ehalf;
pub mod peaks;
pub mod report;
