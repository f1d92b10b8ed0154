use std::collections::BTreeSet;

/// Character-level comparison of typed input against a target unit.
///
/// Index `i` is an error iff the typed char at `i` differs from the target
/// char at `i`, or the target has no char at `i` (typed past the end).
/// Total and idempotent: same inputs, same output, no state held anywhere.
pub fn error_positions(typed: &str, target: &str) -> BTreeSet<usize> {
    let mut target_chars = target.chars();
    typed
        .chars()
        .enumerate()
        .filter_map(|(idx, typed_char)| match target_chars.next() {
            Some(expected) if expected == typed_char => None,
            _ => Some(idx),
        })
        .collect()
}

/// Word-stream commit rule: a trailing space commits everything before it
/// as the current word attempt. The space itself is never counted as a
/// typed character. Returns `None` if the value does not commit.
pub fn committed_word(typed: &str) -> Option<&str> {
    typed.strip_suffix(' ')
}
