use super::ChartError;
use log::warn;

/// Parses one side of a `beat=bpm` pair, rounded to three decimals so maps
/// written with different precision compare equal.
fn parse_rounded(value: &str, part: &str) -> Result<f32, ChartError> {
    let value = value
        .trim_matches(|c: char| c.is_control() || c.is_whitespace())
        .parse::<f64>()
        .map_err(|_| ChartError::InvalidBpm(part.to_string()))?;
    Ok(((value * 1000.0).round() / 1000.0) as f32)
}

/// Parses a `beat=bpm,...` map, sorted by beat. Non-positive BPMs are
/// skipped with a warning; anything unparsable is an error.
pub fn parse_bpms(bpm_string: &str) -> Result<Vec<(f32, f32)>, ChartError> {
    let mut bpms = Vec::new();
    for part in bpm_string.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((beat, bpm)) = part.split_once('=') else {
            return Err(ChartError::InvalidBpm(part.to_string()));
        };
        if bpm.contains('=') {
            return Err(ChartError::InvalidBpm(part.to_string()));
        }
        let beat = parse_rounded(beat, part)?;
        let bpm = parse_rounded(bpm, part)?;
        if bpm <= 0.0 || !bpm.is_finite() {
            warn!("Ignoring non-positive BPM value: {} at beat {}", bpm, beat);
            continue;
        }
        bpms.push((beat, bpm));
    }
    bpms.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    Ok(bpms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_three_decimals() {
        assert_eq!(parse_bpms("4.5=180.0001").unwrap(), vec![(4.5, 180.0)]);
        assert_eq!(parse_bpms("0.0004=120").unwrap(), vec![(0.0, 120.0)]);
        assert_eq!(parse_bpms(" 1.2504 = 150.5 ").unwrap(), vec![(1.25, 150.5)]);
    }

    #[test]
    fn parses_and_sorts() {
        let bpms = parse_bpms("8=200,0=120").unwrap();
        assert_eq!(bpms, vec![(0.0, 120.0), (8.0, 200.0)]);
    }

    #[test]
    fn skips_non_positive_and_rejects_garbage() {
        assert_eq!(parse_bpms("0=120,4=0").unwrap(), vec![(0.0, 120.0)]);
        assert!(matches!(parse_bpms("0=fast"), Err(ChartError::InvalidBpm(_))));
        assert!(matches!(parse_bpms("120"), Err(ChartError::InvalidBpm(_))));
        assert!(matches!(parse_bpms("0=120=4"), Err(ChartError::InvalidBpm(_))));
        assert!(parse_bpms("").unwrap().is_empty());
    }
}
