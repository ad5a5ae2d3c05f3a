//! Lexing of repository artifact filenames.
//!
//! A filename such as `plexus-utils-1.4.3-20070821.090015-3-sources.jar` is
//! read left to right: the extension is split off first, then the artifactId
//! and version tokens are consumed, and whatever follows the version is
//! reported as a [`FilenameTail`].

use regex::Regex;
use std::sync::LazyLock;

use crate::version;

static EXTENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\.tar\.gz$)|(\.tar\.bz2$)|(\.[\-a-z0-9]*$)").unwrap()
});

static TIMESTAMP_BUILD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{8}\.[0-9]{6}-[0-9]+)").unwrap());

/// What follows the version token in a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameTail {
    /// The version runs straight into the extension: `lib-1.0.jar`.
    Bare,
    /// A `-` follows the version: `lib-1.0-sources.jar`.
    Classifier(String),
    /// A `.` follows the version: `lib-1.0.jar.sha1` yields `jar`.
    CompoundExtension(String),
}

/// The pieces of a parsed artifact filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameParts {
    pub artifact_id: String,
    pub version: String,
    pub tail: FilenameTail,
    /// Final extension as lexed, e.g. `jar`, `sha1` or `tar.gz`.
    pub extension: String,
}

impl FilenameParts {
    pub fn classifier(&self) -> Option<&str> {
        match &self.tail {
            FilenameTail::Classifier(c) => Some(c),
            _ => None,
        }
    }

    /// The full extension, including a compound prefix such as `jar.sha1`.
    pub fn full_extension(&self) -> String {
        match &self.tail {
            FilenameTail::CompoundExtension(prefix) => format!("{}.{}", prefix, self.extension),
            _ => self.extension.clone(),
        }
    }

    /// `artifactId-version`, the key that groups every file of one build.
    pub fn unique_version_key(&self) -> String {
        format!("{}-{}", self.artifact_id, self.version)
    }
}

/// Cursor over the `-`-delimited sections of a filename stem.
#[derive(Debug)]
pub struct FilenameLexer<'a> {
    name: &'a str,
    extension: Option<&'a str>,
    offset: usize,
}

impl<'a> FilenameLexer<'a> {
    pub fn new(filename: &'a str) -> Self {
        let (name, extension) = match EXTENSION_PATTERN.find(filename) {
            Some(m) => (&filename[..m.start()], Some(&filename[m.start() + 1..])),
            None => (filename, None),
        };
        Self {
            name,
            extension,
            offset: 0,
        }
    }

    /// The filename without its extension.
    pub fn stem(&self) -> &'a str {
        self.name
    }

    pub fn extension(&self) -> Option<&'a str> {
        self.extension
    }

    fn next_section(&mut self) -> Option<&'a str> {
        if self.offset > self.name.len() {
            return None;
        }
        let end = self.name[self.offset..]
            .find('-')
            .map_or(self.name.len(), |i| self.offset + i);
        let section = &self.name[self.offset..end];
        self.offset = end + 1;
        Some(section)
    }

    /// Consume `expected` if the stem continues with it and it is followed by
    /// `-`, `.` or the end of the stem.
    ///
    /// A generic snapshot token (`1.0-SNAPSHOT`) also matches its unique form
    /// (`1.0-20070504.153317-1`); the matched text is returned.
    pub fn expect(&mut self, expected: &str) -> Option<String> {
        let rest = self.name.get(self.offset..)?;

        let value = if !expected.is_empty() && rest.starts_with(expected) {
            expected.to_string()
        } else if version::is_generic_snapshot(expected) {
            match_unique_snapshot(rest, expected)?
        } else {
            return None;
        };

        let separator = self.offset + value.len();
        if separator >= self.name.len() {
            self.offset = self.name.len();
            return Some(value);
        }
        match self.name.as_bytes()[separator] {
            b'-' | b'.' => {
                self.offset = separator + 1;
                Some(value)
            }
            _ => None,
        }
    }

    /// Consume consecutive sections that look like version keywords.
    pub fn next_version(&mut self) -> Option<String> {
        self.collect_sections(version::is_simple_version_keyword)
    }

    /// Consume sections up to the first version keyword.
    pub fn next_non_version(&mut self) -> Option<String> {
        self.collect_sections(|s| !s.is_empty() && !version::is_simple_version_keyword(s))
    }

    fn collect_sections(&mut self, accept: impl Fn(&str) -> bool) -> Option<String> {
        let initial = self.offset;
        let mut sections = Vec::new();
        loop {
            let mark = self.offset;
            match self.next_section() {
                Some(section) if accept(section) => sections.push(section),
                Some(_) => {
                    self.offset = mark;
                    break;
                }
                None => break,
            }
        }
        if sections.is_empty() {
            self.offset = initial;
            return None;
        }
        Some(sections.join("-"))
    }

    /// Everything left in the stem, classified by the separator before it.
    pub fn tail(&mut self) -> FilenameTail {
        let start = self.offset;
        self.offset = self.name.len();
        if start == 0 || start >= self.name.len() {
            return FilenameTail::Bare;
        }
        let rest = self.name[start..].to_string();
        match self.name.as_bytes()[start - 1] {
            b'-' => FilenameTail::Classifier(rest),
            b'.' => FilenameTail::CompoundExtension(rest),
            _ => FilenameTail::Bare,
        }
    }
}

fn match_unique_snapshot(rest: &str, expected: &str) -> Option<String> {
    let leading = expected.len().checked_sub(version::SNAPSHOT.len() + 1)?;
    let base = expected.get(..leading)?;
    if leading == 0 || !rest.starts_with(base) {
        return None;
    }
    if rest.as_bytes().get(leading) != Some(&b'-') {
        return None;
    }
    let stamp = TIMESTAMP_BUILD_PATTERN.captures(&rest[leading + 1..])?;
    Some(format!("{}{}", &rest[..leading + 1], &stamp[1]))
}

/// Parse a filename expected to belong to `artifact_id` in the version
/// directory `base_version`.
///
/// Returns `None` for files that are not artifacts of that project and
/// version (metadata, foreign files).
pub fn parse_filename(filename: &str, artifact_id: &str, base_version: &str) -> Option<FilenameParts> {
    let mut lexer = FilenameLexer::new(filename);
    let extension = lexer.extension()?.to_string();
    let artifact_id = lexer.expect(artifact_id)?;

    let version = match lexer.expect(base_version) {
        Some(v) => v,
        None if version::is_snapshot(base_version) => {
            let v = lexer.next_version()?;
            if version::base_version(&v) != base_version {
                return None;
            }
            v
        }
        None => return None,
    };

    Some(FilenameParts {
        artifact_id,
        version,
        tail: lexer.tail(),
        extension,
    })
}

/// Parse a filename without knowing its artifactId, splitting at the first
/// section that looks like a version.
pub fn parse_filename_unanchored(filename: &str) -> Option<FilenameParts> {
    let mut lexer = FilenameLexer::new(filename);
    let extension = lexer.extension()?.to_string();
    let artifact_id = lexer.next_non_version()?;
    let version = lexer.next_version()?;
    Some(FilenameParts {
        artifact_id,
        version,
        tail: lexer.tail(),
        extension,
    })
}
