use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use voltgram::io::export::{export_ehalf_summary, export_segments};
use voltgram::{analyze, decode, AnalyzeOptions, RangeEnd, SegmentRange};

const USAGE: &str = "usage: voltgram <file.bin> [--fc <V>] [--sep <V>] [--trim <START> <END|last>] [--no-export]";

struct Args {
    path: PathBuf,
    options: AnalyzeOptions,
    no_export: bool,
}

/// Minimal positional/flag reader. Anything subcommand-shaped lives in outer
/// tooling, not here.
fn parse_args() -> Result<Args> {
    let mut path = None;
    let mut options = AnalyzeOptions::default();
    let mut no_export = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fc" | "-fc" => {
                let value = args.next().context("--fc expects a value in volts")?;
                options.reference_offset = value
                    .parse()
                    .with_context(|| format!("--fc: {value:?} is not a number"))?;
            }
            "--sep" | "-sep" => {
                let value = args.next().context("--sep expects a value in volts")?;
                options.peak_sep_limit = value
                    .parse()
                    .with_context(|| format!("--sep: {value:?} is not a number"))?;
            }
            "--trim" | "-tr" => {
                let start = args.next().context("--trim expects START and END")?;
                let end = args.next().context("--trim expects START and END")?;
                let start: usize = start
                    .parse()
                    .with_context(|| format!("--trim: {start:?} is not a segment index"))?;
                let end = if end.eq_ignore_ascii_case("last") {
                    RangeEnd::Last
                } else {
                    RangeEnd::At(end.parse().with_context(|| {
                        format!("--trim: {end:?} is not a segment index or \"last\"")
                    })?)
                };
                options.segment_range = SegmentRange { start, end };
            }
            "--no-export" | "-ne" => no_export = true,
            other if path.is_none() && !other.starts_with('-') => {
                path = Some(PathBuf::from(other));
            }
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }

    let Some(path) = path else {
        bail!("{USAGE}");
    };
    Ok(Args {
        path,
        options,
        no_export,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let experiment =
        decode(&bytes).with_context(|| format!("decoding {}", args.path.display()))?;

    let header = &experiment.header;
    println!("{} — {}", header.instrument, header.technique);
    if !header.comment.is_empty() {
        println!("Comment: {}", header.comment);
    }
    println!("Init E (V): {}", header.init_e);
    println!("Final E (V): {}", header.final_e);
    println!("High E (V): {}", header.high_e);
    println!("Low E (V): {}", header.low_e);
    println!("Scan rate (V/s): {}", header.scan_rate);
    println!("Segments: {}", experiment.len());

    let result = analyze(&experiment, &args.options)?;

    println!();
    if result.pairs.is_empty() {
        println!("No reversible couples within the separation limit.");
    }
    for pair in &result.pairs {
        println!(
            "E1/2 (V): {:.3}  (segment {} / {}, separation {:.3} V)",
            pair.halfwave, pair.anodic.segment, pair.cathodic.segment, pair.separation
        );
    }
    for peak in &result.unmatched {
        println!(
            "Unpaired {:?} peak at {:.3} V (segment {})",
            peak.polarity, peak.potential, peak.segment
        );
    }

    if !args.no_export {
        let dir = args.path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let base = args
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("voltammogram");

        let suffix = (args.options.reference_offset != 0.0).then_some("corrected");
        let segments_csv = export_segments(&result.segments, dir, base, suffix)?;
        let summary_csv = export_ehalf_summary(&result, dir, base)?;
        println!();
        println!("Exported: {}", segments_csv.display());
        println!("Exported: {}", summary_csv.display());
    }

    Ok(())
}
