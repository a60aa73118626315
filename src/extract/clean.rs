use tracing::debug;

use crate::rules::RuleSet;

/// Drop platform chrome lines, keeping everything else verbatim and in order.
///
/// Output is trimmed and ends with exactly one newline.
pub fn clean(markdown: &str, rules: &RuleSet) -> String {
    let mut dropped = 0usize;

    let kept: Vec<&str> = markdown
        .lines()
        .filter(|line| match rules.matching(line) {
            Some(rule) => {
                debug!(line, pattern = %rule.pattern, kind = ?rule.kind, "Dropping boilerplate line");
                dropped += 1;
                false
            }
            None => true,
        })
        .collect();

    debug!(dropped, kept = kept.len(), "Cleaned markdown");
    let mut out = kept.join("\n").trim().to_string();
    out.push('\n');
    out
}
