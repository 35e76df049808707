/// Marker that opens every query line printed by the engine, e.g.
/// `ℙ(was_deal) = 0.500000`.
pub const PROBABILITY_PREFIX: &str = "ℙ(";

/// Extracts up to `num_queries` probabilities from combined engine output.
///
/// Lines that do not start with [`PROBABILITY_PREFIX`] are ignored. A query
/// line with a malformed value, or with more than one `=`, still occupies
/// its slot but reads as NaN. Queries the engine never printed are simply
/// absent; callers read them as NaN through
/// [`cvg_core::TrialResult::probability`].
pub fn extract_probabilities(output: &str, num_queries: usize) -> Vec<f64> {
    output
        .trim()
        .lines()
        .filter(|line| line.starts_with(PROBABILITY_PREFIX))
        .map(parse_probability_line)
        .take(num_queries)
        .collect()
}

fn parse_probability_line(line: &str) -> f64 {
    let mut parts = line.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(value), None) => value.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Joins stdout and stderr the way the engine output is inspected.
pub fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    text.push('\n');
    text.push_str(&String::from_utf8_lossy(stderr));
    text
}
