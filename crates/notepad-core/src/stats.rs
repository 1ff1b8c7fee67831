//! Character, word, and line counts for the editor readout.

use serde::Serialize;

/// Counts shown under the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Unicode scalar values.
    pub chars: usize,
    /// Whitespace-delimited tokens.
    pub words: usize,
    /// Newline-separated lines; empty content is one empty line.
    pub lines: usize,
}

/// Recompute stats for `content`. Cheap enough to run on every keystroke.
pub fn recompute(content: &str) -> Stats {
    Stats {
        chars: content.chars().count(),
        words: content.split_whitespace().count(),
        lines: content.split('\n').count(),
    }
}
