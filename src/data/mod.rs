/// Data layer: byte reader, binary decoder, and segment transforms.
///
/// Architecture:
/// ```text
///  .bin bytes
///       │
///       ▼
///  ┌─────────┐
///  │ decoder │  fixed record schema → CvExperiment
///  └─────────┘
///       │
///       ▼
///  ┌──────────────┐
///  │ CvExperiment │  RawHeader + Vec<Segment>
///  └──────────────┘
///       │
///       ▼
///  ┌────────┐     ┌─────────┐
///  │ select │  →  │ correct │  range filter → reference shift
///  └────────┘     └─────────┘
/// ```
pub mod correct;
pub mod decoder;
pub mod model;
pub mod reader;
pub mod select;
