//! Colored status lines on stderr, keeping stdout free for sitemap XML.

use console::{Style, Term};
use smap_core::GenerationStats;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter writing to stderr.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a section heading (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print the summary of a generation pass.
    pub(crate) fn stats(&self, stats: &GenerationStats) {
        self.success(&format!(
            "Generated {} URLs from {} definitions",
            stats.emitted, stats.definitions
        ));
        for warning in stats_warnings(stats) {
            self.warning(&warning);
        }
    }
}

/// One warning per kind of skipped or dropped URL.
fn stats_warnings(stats: &GenerationStats) -> Vec<String> {
    [
        (stats.unresolved, "definitions resolved to nothing"),
        (
            stats.dropped_at_type_limit,
            "URLs dropped by the per-definition limit",
        ),
        (stats.dropped_at_cap, "URLs dropped by the sitemap size limit"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, what)| format!("{count} {what}"))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_warnings_clean_pass() {
        let stats = GenerationStats {
            definitions: 3,
            emitted: 3,
            ..GenerationStats::default()
        };
        assert!(stats_warnings(&stats).is_empty());
    }

    #[test]
    fn test_stats_warnings_lists_drops() {
        let stats = GenerationStats {
            definitions: 4,
            unresolved: 1,
            emitted: 2,
            dropped_at_cap: 5,
            dropped_at_type_limit: 0,
        };
        assert_eq!(
            stats_warnings(&stats),
            vec![
                "1 definitions resolved to nothing".to_owned(),
                "5 URLs dropped by the sitemap size limit".to_owned(),
            ]
        );
    }
}
