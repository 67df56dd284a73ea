use thiserror::Error;

// ---------------------------------------------------------------------------
// CvError – failure taxonomy for decoding and selection
// ---------------------------------------------------------------------------

/// Errors raised while decoding a `.bin` buffer or selecting segments.
///
/// The decode-time variants are fatal: no partial [`CvExperiment`] ever
/// escapes a failed decode. [`CvError::SelectionOutOfRange`] is recoverable —
/// the caller can re-prompt for a new range. "No peaks" and "no qualifying
/// pairs" are ordinary results, never errors.
///
/// [`CvExperiment`]: crate::data::model::CvExperiment
#[derive(Debug, Error)]
pub enum CvError {
    /// The buffer does not begin with the expected magic/version token.
    #[error("unrecognized file format: {reason}")]
    UnrecognizedFormat { reason: String },

    /// A declared region extends past the end of the buffer.
    #[error(
        "truncated file: needed {needed} byte(s) at offset {offset}, {remaining} remaining"
    )]
    TruncatedFile {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A decoded field holds a structurally impossible value.
    #[error("corrupt record at offset {offset}: {reason}")]
    CorruptRecord { offset: usize, reason: String },

    /// The requested segment range does not fit the experiment.
    #[error("segment selection out of range: {reason}")]
    SelectionOutOfRange { reason: String },
}
