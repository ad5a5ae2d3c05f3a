//! Ant-style path patterns used to select repository files.
//!
//! `**` matches any number of directories, `*` any run of characters within
//! one path segment and `?` a single character.

use regex::Regex;

use crate::PurgeResult;

#[derive(Debug, Clone)]
pub struct FilePattern {
    pattern: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(pattern: &str) -> PurgeResult<Self> {
        let regex = Regex::new(&to_regex(pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Match a `/`-separated path relative to the repository root.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compile a list of patterns.
pub fn compile<S: AsRef<str>>(patterns: &[S]) -> PurgeResult<Vec<FilePattern>> {
    patterns.iter().map(|p| FilePattern::new(p.as_ref())).collect()
}

fn to_regex(pattern: &str) -> String {
    let mut regex = String::from("^");
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix("**/") {
            regex.push_str("(?:.*/)?");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("**") {
            regex.push_str(".*");
            rest = tail;
        } else {
            match c {
                '*' => regex.push_str("[^/]*"),
                '?' => regex.push_str("[^/]"),
                other => regex.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
            rest = &rest[c.len_utf8()..];
        }
    }
    regex.push('$');
    regex
}
