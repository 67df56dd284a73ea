//! Export processed CV data to `.csv`.
//!
//! Files land next to the source `.bin` (or wherever the caller points) and
//! never overwrite: a taken name gets ` (1)`, ` (2)`, … appended before the
//! extension.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::analysis::report::AnalysisResult;
use crate::data::model::Segment;

/// Find a filename under `dir` that collides with nothing on disk.
fn unique_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{base}{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{base} ({n}){ext}"));
        n += 1;
    }
    candidate
}

/// Write segments to `<base>[_suffix].csv` under `dir`, one row per sample.
pub fn export_segments(
    segments: &[Segment],
    dir: &Path,
    base: &str,
    suffix: Option<&str>,
) -> Result<PathBuf> {
    let base = match suffix {
        Some(s) => format!("{base}_{s}"),
        None => base.to_string(),
    };
    let path = unique_path(dir, &base, ".csv");

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record(["Segment", "Direction", "Potential (V)", "Current (A)"])
        .context("writing CSV header")?;
    for segment in segments {
        for (potential, current) in segment.samples() {
            writer
                .write_record([
                    segment.index.to_string(),
                    segment.direction.to_string(),
                    potential.to_string(),
                    current.to_string(),
                ])
                .context("writing CSV row")?;
        }
    }
    writer.flush().context("flushing CSV")?;

    info!("exported {}", path.display());
    Ok(path)
}

/// Write the E1/2 summary to `<base>_ehalf.csv` under `dir`: one row per
/// matched couple, then one per unmatched peak so nothing silently vanishes.
pub fn export_ehalf_summary(result: &AnalysisResult, dir: &Path, base: &str) -> Result<PathBuf> {
    let path = unique_path(dir, &format!("{base}_ehalf"), ".csv");

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record([
            "E1/2 (V)",
            "Separation (V)",
            "Anodic segment",
            "E_pa (V)",
            "i_pa (A)",
            "Cathodic segment",
            "E_pc (V)",
            "i_pc (A)",
        ])
        .context("writing CSV header")?;
    for pair in &result.pairs {
        writer
            .write_record([
                pair.halfwave.to_string(),
                pair.separation.to_string(),
                pair.anodic.segment.to_string(),
                pair.anodic.potential.to_string(),
                pair.anodic.current.to_string(),
                pair.cathodic.segment.to_string(),
                pair.cathodic.potential.to_string(),
                pair.cathodic.current.to_string(),
            ])
            .context("writing CSV row")?;
    }
    for peak in &result.unmatched {
        writer
            .write_record([
                "unpaired".to_string(),
                String::new(),
                peak.segment.to_string(),
                peak.potential.to_string(),
                peak.current.to_string(),
                String::new(),
                String::new(),
                String::new(),
            ])
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    info!("exported {}", path.display());
    Ok(path)
}
