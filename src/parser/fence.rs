//! Fenced code protection.
//!
//! Text between a pair of triple backticks must never be expanded. Before
//! scanning, every `(` and `)` inside such a region is swapped for a
//! sentinel (`[M[` and `]M]`, where `M` is a marker absent from the
//! document); after expansion the parentheses are put back.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;

/// Attempts at finding a marker that does not occur in the document.
const MARKER_ATTEMPTS: u32 = 100;

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)```.*?```").expect("fence pattern is valid"))
}

/// Undoes the parenthesis substitution made by [`FenceGuard::protect`].
#[derive(Debug, Clone)]
pub struct FenceGuard {
    open: String,
    close: String,
    regions: usize,
}

impl FenceGuard {
    /// Hide the parentheses of every fenced region in `content`.
    ///
    /// Returns the protected text and the guard needed to restore it.
    pub fn protect(content: &str) -> (String, FenceGuard) {
        let marker = pick_marker(content);
        let mut guard = FenceGuard {
            open: format!("[{marker}["),
            close: format!("]{marker}]"),
            regions: 0,
        };

        let protected = fence_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                guard.regions += 1;
                caps[0].replace('(', &guard.open).replace(')', &guard.close)
            })
            .into_owned();

        if guard.regions > 0 {
            log::trace!("protected {} fenced region(s)", guard.regions);
        }
        (protected, guard)
    }

    /// Put the original parentheses back.
    pub fn restore(&self, text: &str) -> String {
        if self.regions == 0 {
            return text.to_string();
        }
        text.replace(&self.open, "(").replace(&self.close, ")")
    }

    /// Map a byte offset in the protected text back to the original text.
    pub fn original_offset(&self, protected: &str, offset: usize) -> usize {
        if self.regions == 0 {
            return offset;
        }
        self.restore(&protected[..offset.min(protected.len())]).len()
    }

    /// Number of fenced regions found.
    pub fn regions(&self) -> usize {
        self.regions
    }
}

/// Pick a marker from the current time and a pseudo-random suffix.
fn pick_marker(content: &str) -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    pick_unused(content, |attempt| {
        format!("_snippet_marker_{}{}_", seconds, random_suffix(attempt))
    })
}

/// First candidate absent from `content`, or the last one tried once the
/// attempts run out.
fn pick_unused(content: &str, mut candidate: impl FnMut(u32) -> String) -> String {
    let mut marker = String::new();
    for attempt in 0..MARKER_ATTEMPTS {
        marker = candidate(attempt);
        if !content.contains(&marker) {
            break;
        }
    }
    marker
}

fn random_suffix(attempt: u32) -> u64 {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u32(attempt);
    1000 + hasher.finish() % 9000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protect_hides_parentheses_in_fences() {
        let source = "a (link: x)\n```\n(link: y)\n```\nb";
        let (protected, guard) = FenceGuard::protect(source);

        assert_eq!(guard.regions(), 1);
        assert!(protected.starts_with("a (link: x)\n```\n["));
        assert!(!protected["a (link: x)".len()..].contains('('));
        assert_eq!(guard.restore(&protected), source);
    }

    #[test]
    fn test_inline_fence_pair() {
        let source = "see ```(link: x)``` here";
        let (protected, guard) = FenceGuard::protect(source);

        assert!(!protected.contains("(link"));
        assert_eq!(guard.restore(&protected), source);
    }

    #[test]
    fn test_no_fences_is_untouched() {
        let source = "plain (link: x) text";
        let (protected, guard) = FenceGuard::protect(source);

        assert_eq!(protected, source);
        assert_eq!(guard.regions(), 0);
        assert_eq!(guard.original_offset(&protected, 6), 6);
    }

    #[test]
    fn test_unpaired_fence_is_not_protected() {
        let source = "```\n(link: x)";
        let (protected, _) = FenceGuard::protect(source);
        assert_eq!(protected, source);
    }

    #[test]
    fn test_original_offset_after_fence() {
        let source = "```()``` (x)";
        let (protected, guard) = FenceGuard::protect(source);
        let at = protected.rfind("(x)").unwrap();

        assert_eq!(guard.original_offset(&protected, at), 9);
    }

    #[test]
    fn test_marker_avoids_document_text() {
        let marker = pick_marker("nothing here");
        assert!(marker.starts_with("_snippet_marker_"));
        assert!(marker.ends_with('_'));
    }

    #[test]
    fn test_colliding_marker_is_retried() {
        let content = "text with _m0_ and _m1_ already in it";
        let mut tried = Vec::new();
        let marker = pick_unused(content, |attempt| {
            tried.push(attempt);
            format!("_m{}_", attempt)
        });

        assert_eq!(marker, "_m2_");
        assert_eq!(tried, vec![0, 1, 2]);
    }

    #[test]
    fn test_marker_attempts_are_bounded() {
        let content: String = (0..MARKER_ATTEMPTS).map(|i| format!("_m{}_", i)).collect();
        let mut calls = 0;
        let marker = pick_unused(&content, |attempt| {
            calls += 1;
            format!("_m{}_", attempt)
        });

        assert_eq!(calls, MARKER_ATTEMPTS);
        assert_eq!(marker, format!("_m{}_", MARKER_ATTEMPTS - 1));
    }
}
