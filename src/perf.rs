use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use color_eyre::eyre::{Result, eyre};
use serde::Serialize;
use serde_json::Value;

const TRACKED_SPANS: [&str; 2] = ["app.refresh_data", "ui.draw"];

pub fn init_tracing_json(output_path: &Path) -> Result<()> {
    use tracing_subscriber::fmt::format::FmtSpan;

    ensure_parent_dir(output_path)?;
    let file = File::create(output_path)?;
    let make_writer = move || {
        file.try_clone()
            .expect("failed to clone perf tracing output file")
    };

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(make_writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

/// Summarize a span log into `docs/perf_capture.json`.
pub fn write_capture_summary(
    span_log_path: &Path,
    iterations: usize,
    width: u16,
    height: u16,
    process_counts: &[usize],
) -> Result<()> {
    let span_stats = parse_span_stats(span_log_path)?;
    let process_count_stats = summarize_process_counts(process_counts)?;

    let capture = PerfCapture {
        generated_at_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| eyre!("system clock is before UNIX_EPOCH: {e}"))?
            .as_secs(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        iterations,
        width,
        height,
        span_log_path: span_log_path.display().to_string(),
        process_counts: process_count_stats,
        spans: span_stats,
    };

    let docs_dir = Path::new("docs");
    fs::create_dir_all(docs_dir)?;
    let json = serde_json::to_string_pretty(&capture)?;
    fs::write(docs_dir.join("perf_capture.json"), json)?;

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn parse_span_stats(path: &Path) -> Result<BTreeMap<String, SpanStats>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut samples: HashMap<String, Vec<f64>> = HashMap::new();
    for &name in &TRACKED_SPANS {
        samples.insert(name.to_string(), Vec::new());
    }

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Ok(value) = serde_json::from_str::<Value>(&line) else {
            continue;
        };

        let Some(span_name) = extract_span_name(&value) else {
            continue;
        };
        if !samples.contains_key(span_name) {
            continue;
        }

        let Some(duration_raw) = extract_busy_duration(&value) else {
            continue;
        };
        let Some(us) = parse_duration_to_us(duration_raw) else {
            continue;
        };

        if let Some(vec) = samples.get_mut(span_name) {
            vec.push(us);
        }
    }

    let mut out = BTreeMap::new();
    for &name in &TRACKED_SPANS {
        let mut values = samples.remove(name).unwrap_or_default();
        let stats = summarize_samples(&mut values);
        out.insert(name.to_string(), stats);
    }
    Ok(out)
}

fn extract_span_name(value: &Value) -> Option<&str> {
    value
        .get("span")
        .and_then(|span| span.get("name"))
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("spans")
                .and_then(Value::as_array)
                .and_then(|arr| arr.last())
                .and_then(|span| span.get("name"))
                .and_then(Value::as_str)
        })
}

fn extract_busy_duration(value: &Value) -> Option<&str> {
    value
        .get("fields")
        .and_then(|f| f.get("time.busy"))
        .and_then(Value::as_str)
        .or_else(|| {
            value
                .get("fields")
                .and_then(|f| f.get("busy"))
                .and_then(Value::as_str)
        })
}

fn parse_duration_to_us(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if let Some(v) = s.strip_suffix("ns") {
        return v.trim().parse::<f64>().ok().map(|n| n / 1000.0);
    }
    if let Some(v) = s.strip_suffix("µs").or_else(|| s.strip_suffix("μs")) {
        return v.trim().parse::<f64>().ok();
    }
    if let Some(v) = s.strip_suffix("us") {
        return v.trim().parse::<f64>().ok();
    }
    if let Some(v) = s.strip_suffix("ms") {
        return v.trim().parse::<f64>().ok().map(|ms| ms * 1000.0);
    }
    if let Some(v) = s.strip_suffix('s') {
        return v.trim().parse::<f64>().ok().map(|secs| secs * 1_000_000.0);
    }
    None
}

fn summarize_samples(values: &mut [f64]) -> SpanStats {
    if values.is_empty() {
        return SpanStats {
            count: 0,
            p50_us: 0.0,
            p95_us: 0.0,
            max_us: 0.0,
        };
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let last = values.len() - 1;
    let p50_idx = ((last as f64) * 0.50).round() as usize;
    let p95_idx = ((last as f64) * 0.95).round() as usize;

    SpanStats {
        count: values.len(),
        p50_us: round_2(values[p50_idx]),
        p95_us: round_2(values[p95_idx]),
        max_us: round_2(values[last]),
    }
}

fn summarize_process_counts(process_counts: &[usize]) -> Result<ProcessCountStats> {
    if process_counts.is_empty() {
        return Err(eyre!("no process counts captured during perf run"));
    }
    let mut values = process_counts.to_vec();
    values.sort_unstable();
    let min = *values.first().unwrap_or(&0);
    let max = *values.last().unwrap_or(&0);
    let p50 = values[(values.len() - 1) / 2];
    Ok(ProcessCountStats { min, p50, max })
}

fn round_2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
struct PerfCapture {
    generated_at_unix_s: u64,
    os: String,
    arch: String,
    iterations: usize,
    width: u16,
    height: u16,
    span_log_path: String,
    process_counts: ProcessCountStats,
    spans: BTreeMap<String, SpanStats>,
}

#[derive(Debug, Serialize)]
struct ProcessCountStats {
    min: usize,
    p50: usize,
    max: usize,
}

#[derive(Debug, Serialize)]
struct SpanStats {
    count: usize,
    p50_us: f64,
    p95_us: f64,
    max_us: f64,
}

#[cfg(test)]
mod tests {
    use super::parse_duration_to_us;

    #[test]
    fn duration_parsing_supported_units() {
        assert_eq!(parse_duration_to_us("100ns"), Some(0.1));
        assert_eq!(parse_duration_to_us("10us"), Some(10.0));
        assert_eq!(parse_duration_to_us("10µs"), Some(10.0));
        assert_eq!(parse_duration_to_us("2.5ms"), Some(2500.0));
        assert_eq!(parse_duration_to_us("1s"), Some(1_000_000.0));
    }
}
