//! Version classification and ordering.
//!
//! Snapshot versions come in two shapes on disk:
//! - generic: `1.0-SNAPSHOT`
//! - unique (timestamped): `1.0-20070504.153317-1`
//!
//! [`base_version`] folds the second form back into the first. [`MavenVersion`]
//! orders versions by comparing their components: numbers numerically,
//! well-known qualifiers by rank (`alpha < beta < milestone < rc < snapshot <
//! release < sp`) and any other qualifier lexically after those.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

pub const SNAPSHOT: &str = "SNAPSHOT";

static UNIQUE_SNAPSHOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)-([0-9]{8}\.[0-9]{6})-([0-9]+)$").unwrap());

static VERSION_KEYWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let keywords = [
        r"[0-9][_.0-9a-z]*",
        r"snapshot",
        r"g?[_.0-9ab]*(pre|rc|g|m)[_.0-9]*",
        r"dev[_.0-9]*",
        r"alpha[_.0-9]*",
        r"beta[_.0-9]*",
        r"rc[_.0-9]*",
        r"debug[_.0-9]*",
        r"unofficial[_.0-9]*",
        r"current",
        r"latest",
        r"fcs",
        r"release[_.0-9]*",
        r"nightly",
        r"final",
        r"incubating",
        r"incubator",
        r"[ab][_.0-9]+",
    ];
    Regex::new(&format!("(?i)^(?:{})$", keywords.join("|"))).unwrap()
});

static NUMERIC_KEYWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9][_.0-9a-z]*$").unwrap());

/// True for both generic and unique snapshot versions.
pub fn is_snapshot(version: &str) -> bool {
    is_unique_snapshot(version) || is_generic_snapshot(version)
}

/// `<base>-<yyyyMMdd.HHmmss>-<buildNumber>`
pub fn is_unique_snapshot(version: &str) -> bool {
    UNIQUE_SNAPSHOT_PATTERN.is_match(version)
}

/// `<base>-SNAPSHOT`
pub fn is_generic_snapshot(version: &str) -> bool {
    version.ends_with(SNAPSHOT)
}

/// Strip a unique-snapshot suffix back to `<base>-SNAPSHOT`. Idempotent.
pub fn base_version(version: &str) -> String {
    match UNIQUE_SNAPSHOT_PATTERN.captures(version) {
        Some(caps) => format!("{}-{}", &caps[1], SNAPSHOT),
        None => version.to_string(),
    }
}

/// Split a unique snapshot into its base, timestamp and build number.
pub fn unique_snapshot_parts(version: &str) -> Option<(&str, &str, u64)> {
    let caps = UNIQUE_SNAPSHOT_PATTERN.captures(version)?;
    let base = caps.get(1)?.as_str();
    let timestamp = caps.get(2)?.as_str();
    let build = caps.get(3)?.as_str().parse().ok()?;
    Some((base, timestamp, build))
}

/// True if a single `-`-delimited token looks like part of a version.
pub fn is_simple_version_keyword(token: &str) -> bool {
    VERSION_KEYWORD_PATTERN.is_match(token)
}

/// True if the string looks like a whole version.
///
/// Either every `-` section is a version keyword (`alpha-1`, `1.0-beta-2`),
/// or the first section is numeric (`1.0-jdk14`).
pub fn is_version(version: &str) -> bool {
    if version.is_empty() {
        return false;
    }
    let mut sections = version.split('-');
    let first = sections.next().unwrap_or_default();
    if NUMERIC_KEYWORD_PATTERN.is_match(first) {
        return true;
    }
    is_simple_version_keyword(first) && sections.all(is_simple_version_keyword)
}

/// Order two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    MavenVersion::parse(a).cmp(&MavenVersion::parse(b))
}

/// Sort version strings ascending.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// A parsed version with comparable components.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    items: Vec<Item>,
    /// Timestamp and build number of a unique snapshot.
    build: Option<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits with leading zeros stripped.
    Number(String),
    Qualifier(Qualifier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Qualifier {
    Known(QualifierRank),
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum QualifierRank {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let (items, build) = match unique_snapshot_parts(version) {
            Some((base, timestamp, build)) => (
                parse_items(&format!("{}-{}", base, SNAPSHOT)),
                Some((timestamp.to_string(), build)),
            ),
            None => (parse_items(version), None),
        };
        Self {
            original: version.to_string(),
            items,
            build,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_snapshot(&self) -> bool {
        is_snapshot(&self.original)
    }
}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.items.len().max(other.items.len());
        for i in 0..len {
            let ord = compare_items(self.items.get(i), other.items.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }

        // Timestamped builds of a snapshot sort before the generic snapshot.
        let by_build = match (&self.build, &other.build) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        // Versions like `1.0` and `1.0.0` compare equal; fall back to the text
        // so sorting stays total.
        by_build.then_with(|| self.original.cmp(&other.original))
    }
}

fn parse_items(version: &str) -> Vec<Item> {
    let lower = version.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for c in lower.chars() {
        if c == '.' || c == '-' || c == '_' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != current_is_digit {
            tokens.push(std::mem::take(&mut current));
        }
        current_is_digit = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    let mut items: Vec<Item> = tokens.iter().map(|t| to_item(t)).collect();

    // Trailing zeros and release markers carry no ordering weight.
    while let Some(last) = items.last() {
        if is_null_item(last) {
            items.pop();
        } else {
            break;
        }
    }
    items
}

fn to_item(token: &str) -> Item {
    if token.chars().all(|c| c.is_ascii_digit()) {
        let trimmed = token.trim_start_matches('0');
        return Item::Number(trimmed.to_string());
    }
    let rank = match token {
        "alpha" | "a" => Some(QualifierRank::Alpha),
        "beta" | "b" => Some(QualifierRank::Beta),
        "milestone" | "m" => Some(QualifierRank::Milestone),
        "rc" | "cr" => Some(QualifierRank::Rc),
        "snapshot" => Some(QualifierRank::Snapshot),
        "ga" | "final" | "release" => Some(QualifierRank::Release),
        "sp" => Some(QualifierRank::Sp),
        _ => None,
    };
    match rank {
        Some(rank) => Item::Qualifier(Qualifier::Known(rank)),
        None => Item::Qualifier(Qualifier::Other(token.to_string())),
    }
}

fn is_null_item(item: &Item) -> bool {
    match item {
        Item::Number(n) => n.is_empty(),
        Item::Qualifier(Qualifier::Known(QualifierRank::Release)) => true,
        Item::Qualifier(_) => false,
    }
}

fn compare_items(a: Option<&Item>, b: Option<&Item>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(item), None) => compare_to_missing(item),
        (None, Some(item)) => compare_to_missing(item).reverse(),
        (Some(Item::Number(x)), Some(Item::Number(y))) => compare_numbers(x, y),
        (Some(Item::Number(_)), Some(Item::Qualifier(_))) => Ordering::Greater,
        (Some(Item::Qualifier(_)), Some(Item::Number(_))) => Ordering::Less,
        (Some(Item::Qualifier(x)), Some(Item::Qualifier(y))) => compare_qualifiers(x, y),
    }
}

fn compare_to_missing(item: &Item) -> Ordering {
    match item {
        Item::Number(n) if n.is_empty() => Ordering::Equal,
        Item::Number(_) => Ordering::Greater,
        Item::Qualifier(q) => compare_qualifiers(q, &Qualifier::Known(QualifierRank::Release)),
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_qualifiers(a: &Qualifier, b: &Qualifier) -> Ordering {
    match (a, b) {
        (Qualifier::Known(x), Qualifier::Known(y)) => x.cmp(y),
        (Qualifier::Known(_), Qualifier::Other(_)) => Ordering::Less,
        (Qualifier::Other(_), Qualifier::Known(_)) => Ordering::Greater,
        (Qualifier::Other(x), Qualifier::Other(y)) => x.cmp(y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_classification() {
        assert!(is_snapshot("1.0-SNAPSHOT"));
        assert!(is_snapshot("1.0-20070504.153317-1"));
        assert!(!is_snapshot("1.0"));
        assert!(!is_snapshot("1.0-alpha-11"));

        assert!(is_unique_snapshot("1.0-alpha-11-20070316.175232-11"));
        assert!(!is_unique_snapshot("1.0-alpha-11-SNAPSHOT"));
        assert!(is_generic_snapshot("1.0-alpha-11-SNAPSHOT"));
        assert!(!is_generic_snapshot("1.0-20070504.153317-1"));
    }

    #[test]
    fn test_base_version_is_idempotent() {
        let once = base_version("2.2-20070504.153317-1");
        assert_eq!(once, "2.2-SNAPSHOT");
        assert_eq!(base_version(&once), once);
        assert_eq!(base_version("1.0"), "1.0");
    }

    #[test]
    fn test_version_keywords() {
        assert!(is_simple_version_keyword("1.0"));
        assert!(is_simple_version_keyword("SNAPSHOT"));
        assert!(is_simple_version_keyword("20070504.153317"));
        assert!(is_simple_version_keyword("alpha"));
        assert!(is_simple_version_keyword("M1"));
        assert!(!is_simple_version_keyword("sources"));
        assert!(!is_simple_version_keyword("maven"));
        assert!(!is_simple_version_keyword("plugin"));
    }

    #[test]
    fn test_is_version() {
        assert!(is_version("1.0-alpha-11-SNAPSHOT"));
        assert!(is_version("2.0"));
        assert!(is_version("1.0-jdk14"));
        assert!(!is_version("maven-metadata.xml"));
        assert!(!is_version(""));
    }

    #[test]
    fn test_numeric_ordering() {
        assert_eq!(compare_versions("1.0", "1.1"), Ordering::Less);
        assert_eq!(compare_versions("2.0", "10.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.0-alpha-2", "1.0-alpha-11"), Ordering::Less);
    }

    #[test]
    fn test_snapshot_before_release() {
        assert_eq!(
            compare_versions("1.0-alpha-11-SNAPSHOT", "1.0-alpha-11"),
            Ordering::Less
        );
        assert_eq!(compare_versions("2.3-SNAPSHOT", "2.3"), Ordering::Less);
        assert_eq!(compare_versions("2.3-SNAPSHOT", "2.2"), Ordering::Greater);
    }

    #[test]
    fn test_qualifier_ranks() {
        assert_eq!(compare_versions("1.0-alpha-1", "1.0-beta-1"), Ordering::Less);
        assert_eq!(compare_versions("1.0-rc1", "1.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0-M2", "1.0-rc1"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0-sp1"), Ordering::Less);
        assert_eq!(compare_versions("1.0-sp1", "1.0-zeta"), Ordering::Less);
    }

    #[test]
    fn test_unique_snapshots_order_by_timestamp() {
        let mut versions = vec![
            "1.0-SNAPSHOT".to_string(),
            "1.0-20070821.090132-4".to_string(),
            "1.0-20070504.153317-1".to_string(),
            "1.0-20070821.090015-3".to_string(),
        ];
        sort_versions(&mut versions);
        assert_eq!(
            versions,
            vec![
                "1.0-20070504.153317-1",
                "1.0-20070821.090015-3",
                "1.0-20070821.090132-4",
                "1.0-SNAPSHOT",
            ]
        );
        assert_eq!(
            compare_versions("1.0-20070821.090132-4", "1.0"),
            Ordering::Less
        );
    }
}
