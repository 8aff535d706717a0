//! Link fix-ups for snippet output.
//!
//! Authors write links the short way: `(link: docs/guide.pdf)` for a file
//! shipped with the site, `(link: example.com)` for an external site. These
//! are turned into usable URLs here.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

/// Maximum length of a whole domain name.
const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of one domain label.
const MAX_LABEL_LEN: usize = 63;

/// Site context used to resolve internal links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteLinks {
    /// URL prefix for internal files (`https://example.com`).
    pub base_url: Option<String>,
    /// Directory internal files are looked up in.
    pub root: Option<PathBuf>,
}

impl SiteLinks {
    pub fn new(base_url: Option<String>, root: Option<PathBuf>) -> Self {
        Self { base_url, root }
    }

    /// Resolve a link as written by an author.
    ///
    /// - a file that exists under `root` becomes `base_url/link`
    /// - a scheme-less link starting with a domain name gets `http://`
    /// - anything else is returned unchanged
    pub fn resolve(&self, link: &str) -> String {
        if let Some(url) = self.internal_file(link) {
            return url;
        }

        if !has_scheme(link) {
            let domain = link.split('/').next().unwrap_or("");
            if is_valid_domain_name(domain) {
                return format!("http://{}", link);
            }
        }

        link.to_string()
    }

    fn internal_file(&self, link: &str) -> Option<String> {
        let root = self.root.as_ref()?;
        let relative = link.trim_start_matches('/');
        if relative.is_empty() || !root.join(relative).is_file() {
            return None;
        }

        let base = self.base_url.as_deref().unwrap_or("").trim_end_matches('/');
        Some(format!("{}/{}", base, relative))
    }
}

fn has_scheme(link: &str) -> bool {
    url::Url::parse(link).is_ok()
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[a-z\d](-*[a-z\d])*(\.[a-z\d](-*[a-z\d])*)*$")
            .expect("domain pattern is valid")
    })
}

/// Whether `domain` looks like a host name with at least two labels.
pub fn is_valid_domain_name(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if !label_pattern().is_match(domain) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() > 1 && labels.iter().all(|l| !l.is_empty() && l.len() <= MAX_LABEL_LEN)
}
