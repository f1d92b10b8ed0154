/// The standard characters-per-word normalization used for WPM.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Percentage of typed characters that matched the target, rounded and
/// clamped to [0, 100]. An empty session scores 100: no penalty for not
/// having typed anything yet.
pub fn accuracy_pct(correct_chars: usize, total_typed: usize) -> u8 {
    if total_typed == 0 {
        return 100;
    }
    let pct = (correct_chars as f64 / total_typed as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Net words per minute: (correct chars / 5) per elapsed minute, rounded.
/// Zero before any time has elapsed; never negative.
pub fn words_per_minute(correct_chars: usize, elapsed_secs: f64) -> u64 {
    if elapsed_secs <= 0.0 {
        return 0;
    }
    let minutes = elapsed_secs / 60.0;
    let wpm = (correct_chars as f64 / CHARS_PER_WORD) / minutes;
    wpm.round().max(0.0) as u64
}
