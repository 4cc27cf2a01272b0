//! Archive-name matching over raw listing text.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;

/// Compiled archive-name pattern.
///
/// With at least one capture group the name is group 1, otherwise the whole match.
#[derive(Debug, Clone)]
pub struct ArchivePattern {
    re: Regex,
}

impl ArchivePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).with_context(|| format!("invalid archive pattern {:?}", pattern))?;
        Ok(Self { re })
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }

    fn uses_group(&self) -> bool {
        self.re.captures_len() > 1
    }

    /// Every non-overlapping match in `text`, in order, first occurrence only.
    pub fn find_names(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        self.collect_into(text, &mut seen, &mut names);
        names
    }

    /// Appends names not already in `seen` to `out`. Used to merge paginated listings.
    pub(crate) fn collect_into(
        &self,
        text: &str,
        seen: &mut HashSet<String>,
        out: &mut Vec<String>,
    ) {
        let group = self.uses_group();
        for caps in self.re.captures_iter(text) {
            let m = if group { caps.get(1) } else { caps.get(0) };
            let Some(m) = m else { continue };
            let name = m.as_str();
            if name.is_empty() || seen.contains(name) {
                continue;
            }
            seen.insert(name.to_string());
            out.push(name.to_string());
        }
    }
}
