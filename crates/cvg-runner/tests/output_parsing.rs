use cvg_runner::{combined_output, extract_probabilities};

#[test]
fn reads_query_lines_in_order() {
    let output = "Parsing program...\nℙ(was_deal) = 0.500000\nℙ(switched) = 0.666667\nDone.\n";
    assert_eq!(extract_probabilities(output, 2), vec![0.5, 0.666667]);
}

#[test]
fn stops_after_expected_number_of_queries() {
    let output = "ℙ(a) = 0.1\nℙ(b) = 0.2\nℙ(c) = 0.3\n";
    assert_eq!(extract_probabilities(output, 2), vec![0.1, 0.2]);
}

#[test]
fn malformed_values_become_nan_but_keep_their_slot() {
    let output = "ℙ(a) = garbage\nℙ(b) = 0.75\nℙ(c = d) = 0.2\n";
    let probs = extract_probabilities(output, 3);
    assert_eq!(probs.len(), 3);
    assert!(probs[0].is_nan());
    assert_eq!(probs[1], 0.75);
    assert!(probs[2].is_nan());
}

#[test]
fn missing_output_yields_short_vector_without_failing() {
    assert!(extract_probabilities("", 4).is_empty());
    let probs = extract_probabilities("warning: grounding took long\nℙ(a) = 0.9\n", 4);
    assert_eq!(probs, vec![0.9]);
}

#[test]
fn ignores_lines_that_merely_mention_probabilities() {
    let output = "  computing ℙ(a) = 0.1\nresult ℙ(b) = 0.2\nℙ(c) = 0.3\n";
    assert_eq!(extract_probabilities(output, 3), vec![0.3]);
}

#[test]
fn tolerates_carriage_returns() {
    let output = "ℙ(a) = 0.25\r\nℙ(b) = 0.5\r\n";
    assert_eq!(extract_probabilities(output, 2), vec![0.25, 0.5]);
}

#[test]
fn stderr_lines_follow_stdout_lines() {
    let text = combined_output("ℙ(a) = 0.1\n".as_bytes(), "ℙ(b) = 0.2\n".as_bytes());
    assert_eq!(extract_probabilities(&text, 2), vec![0.1, 0.2]);
}
