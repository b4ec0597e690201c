//! Free-text answer evaluation.
//!
//! Accepted answers frequently list several valid phrasings ("Republic,
//! Constitution-based federal republic"), and typed input varies in
//! verbosity, so matching is substring-based in both directions over
//! normalized candidate phrases rather than exact equality.

/// Compare a typed answer against the accepted answer.
///
/// The accepted answer is split on commas, bullets, and newlines into
/// candidate phrases; the typed answer matches if its normalized form equals
/// a candidate, is contained in one, or contains one. An empty typed answer
/// never matches.
pub fn is_correct(user_answer: &str, accepted_answer: &str) -> bool {
    let user = normalize(user_answer);
    if user.is_empty() {
        return false;
    }

    candidate_phrases(accepted_answer)
        .iter()
        .any(|candidate| {
            candidate == &user || candidate.contains(&user) || user.contains(candidate.as_str())
        })
}

/// Split an accepted answer into normalized candidate phrases.
///
/// Splitting happens before normalization: normalization collapses newlines
/// and strips bullet glyphs, which would otherwise erase the separators.
/// Candidates that normalize to nothing are discarded so they can never
/// produce a trivially-true substring match.
fn candidate_phrases(accepted: &str) -> Vec<String> {
    accepted
        .split(|ch: char| matches!(ch, ',' | '\n' | '\u{2022}'))
        .map(normalize)
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

/// Normalize free text for comparison.
///
/// Lowercases, drops `[...]` and `(...)` spans, replaces bullet/dash/asterisk
/// glyphs with spaces, and collapses whitespace.
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut paren_depth = 0usize;
    let mut bracket_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            _ if paren_depth > 0 || bracket_depth > 0 => {}
            '-' | '*' | '\u{2022}' | '\u{2013}' => cleaned.push(' '),
            _ => cleaned.extend(ch.to_lowercase()),
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
