//! Score, accuracy and achievement computation.

/// Points awarded for each correct match in the instant-feedback variants.
pub const POINTS_PER_MATCH: u32 = 100;

/// Percentage of `correct` over `total`, rounded half up, clamped to 0..=100.
pub fn percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = correct.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Ratio of completed matches to attempts, 0.0 before the first attempt.
pub fn accuracy(completed: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    completed as f64 / attempts as f64
}

/// Badge earned for a final score, if any.
pub fn achievement_for(score: u8) -> Option<&'static str> {
    match score {
        100.. => Some("Brain Master"),
        75..=99 => Some("Neuron Navigator"),
        50..=74 => Some("Synapse Seeker"),
        _ => None,
    }
}
