//! Maven version parsing, comparison, and range matching.
//!
//! Maven versions use a custom ordering that differs from semver:
//! - Items are split on `.` and `-`; a digit/letter transition acts like `-`
//! - `-` (and a transition) opens a nested list, so `1-1` is not `1.1`
//! - A `.` in front of a qualifier acts like `-` as in Maven 3.9, so
//!   `1.0.alpha` == `1.0-alpha`
//! - Numeric items compare as unbounded integers
//! - Qualifiers have a fixed order:
//!   `alpha` < `beta` < `milestone` < `rc` < `snapshot` < `""` (release) < `sp`,
//!   unknown qualifiers sort after `sp`, alphabetically
//! - Trailing zero / release items are dropped, so `1.0.0` == `1`
//!
//! Items of different kinds are ranked around the padding item that stands
//! in for a missing position:
//! pre-release qualifier < list below padding < padding == release
//! < other qualifier < list above padding < number.
//! Every comparison goes through that one ranking, so the order is total.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Known qualifiers in ascending order. The empty string is a release.
const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// Rank of the release qualifier in [`QUALIFIERS`].
const RELEASE_RANK: &str = "5";

/// A parsed Maven version with comparable items.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Decimal digits with leading zeros stripped; zero is `"0"`.
    Int(String),
    /// Lower-cased qualifier after alias expansion.
    Str(String),
    List(Vec<Item>),
}

impl Version {
    /// Parse any string. Parsing never fails; odd input just produces odd items.
    ///
    /// A string carrying U+FFFD (left behind by lossy decoding) is kept
    /// whole as a single opaque qualifier.
    pub fn parse(version: &str) -> Self {
        let items = if version.contains(char::REPLACEMENT_CHARACTER) {
            vec![Item::Str(version.to_lowercase())]
        } else {
            parse_items(version)
        };
        Self {
            original: version.to_string(),
            items,
        }
    }

    /// Parse raw bytes. Invalid UTF-8 becomes a single opaque qualifier.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// The version exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Normalized form; two versions are equal iff their canonical forms are.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        write_items(&mut out, &self.items);
        out
    }

    pub fn is_snapshot(&self) -> bool {
        self.original.to_ascii_uppercase().ends_with("SNAPSHOT")
    }

    /// Why `raw` is syntactically unusual, if it is.
    ///
    /// Unusual versions still parse and compare; callers surface this as a
    /// warning.
    pub fn unusual(raw: &str) -> Option<&'static str> {
        if raw.trim().is_empty() {
            return Some("empty version");
        }
        if raw.contains(char::REPLACEMENT_CHARACTER) {
            return Some("version is not valid UTF-8");
        }
        if raw.chars().any(char::is_whitespace) {
            return Some("version contains whitespace");
        }
        if raw
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+')))
        {
            return Some("version contains unexpected characters");
        }
        None
    }
}

/// Compare two version strings under Maven ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::parse(a).cmp(&Version::parse(b))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn parse_items(version: &str) -> Vec<Item> {
    let version = version.to_lowercase();
    let chars: Vec<char> = version.chars().collect();

    // Every new list is appended as the last item of the current one, so the
    // nesting is a single chain: keep the enclosing lists on a stack and fold
    // them back together at the end.
    let mut parents: Vec<Vec<Item>> = Vec::new();
    let mut current: Vec<Item> = Vec::new();
    let mut is_digit = false;
    let mut start = 0;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '.' | '-' => {
                if i == start {
                    current.push(Item::Int("0".to_string()));
                } else {
                    current.push(token(&chars[start..i], is_digit, false));
                }
                start = i + 1;
                let qualifier_next = chars
                    .get(i + 1)
                    .is_some_and(|n| !n.is_ascii_digit() && !matches!(n, '.' | '-'));
                if c == '-' || qualifier_next {
                    parents.push(std::mem::take(&mut current));
                }
            }
            c if c.is_ascii_digit() => {
                if !is_digit && i > start {
                    current.push(token(&chars[start..i], false, true));
                    start = i;
                    parents.push(std::mem::take(&mut current));
                }
                is_digit = true;
            }
            _ => {
                if is_digit && i > start {
                    current.push(token(&chars[start..i], true, false));
                    start = i;
                    parents.push(std::mem::take(&mut current));
                }
                is_digit = false;
            }
        }
    }
    if chars.len() > start {
        current.push(token(&chars[start..], is_digit, false));
    }

    normalize(&mut current);
    while let Some(mut parent) = parents.pop() {
        parent.push(Item::List(current));
        normalize(&mut parent);
        current = parent;
    }
    current
}

fn token(chars: &[char], is_digit: bool, followed_by_digit: bool) -> Item {
    let raw: String = chars.iter().collect();
    if is_digit {
        let stripped = raw.trim_start_matches('0');
        return Item::Int(if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        });
    }
    let value = if followed_by_digit && raw.len() == 1 {
        match raw.as_str() {
            "a" => "alpha".to_string(),
            "b" => "beta".to_string(),
            "m" => "milestone".to_string(),
            _ => raw,
        }
    } else {
        raw
    };
    let value = match value.as_str() {
        "ga" | "final" | "release" => String::new(),
        "cr" => "rc".to_string(),
        _ => value,
    };
    Item::Str(value)
}

/// Drop trailing null items (`0`, `""`, empty lists).
///
/// A null followed by a nested list is kept when that list starts with a
/// number, so `1.0-1` keeps its zero and stays distinct from `1-1`.
fn normalize(items: &mut Vec<Item>) {
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if is_null(&items[i]) {
            let removable = match items.get(i + 1) {
                None | Some(Item::Str(_)) => true,
                Some(Item::List(next)) => matches!(next.first(), Some(Item::Str(_))),
                Some(Item::Int(_)) => false,
            };
            if removable {
                items.remove(i);
            }
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

fn is_null(item: &Item) -> bool {
    match item {
        Item::Int(digits) => digits == "0",
        Item::Str(value) => value.is_empty(),
        Item::List(items) => items.is_empty(),
    }
}

fn qualifier_rank(qualifier: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == qualifier) {
        Some(i) => i.to_string(),
        None => format!("{}-{qualifier}", QUALIFIERS.len()),
    }
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Rank of an item's kind around the padding item (`None`).
fn class(item: Option<&Item>) -> u8 {
    match item {
        Some(Item::Str(value)) => match qualifier_rank(value).as_str().cmp(RELEASE_RANK) {
            Ordering::Less => 0,
            Ordering::Equal => 2,
            Ordering::Greater => 3,
        },
        Some(Item::List(items)) => match compare_lists(items, &[]) {
            Ordering::Less => 1,
            Ordering::Equal => 2,
            Ordering::Greater => 4,
        },
        None => 2,
        Some(Item::Int(_)) => 5,
    }
}

fn compare_item(left: Option<&Item>, right: Option<&Item>) -> Ordering {
    match (left, right) {
        (Some(Item::Int(a)), Some(Item::Int(b))) => compare_digits(a, b),
        (Some(Item::Str(a)), Some(Item::Str(b))) => qualifier_rank(a).cmp(&qualifier_rank(b)),
        (Some(Item::List(a)), Some(Item::List(b))) => compare_lists(a, b),
        _ => class(left).cmp(&class(right)),
    }
}

fn compare_lists(left: &[Item], right: &[Item]) -> Ordering {
    (0..left.len().max(right.len()))
        .map(|i| compare_item(left.get(i), right.get(i)))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn write_items(out: &mut String, items: &[Item]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(if matches!(item, Item::List(_)) { '-' } else { '.' });
        }
        match item {
            Item::Int(digits) => out.push_str(digits),
            Item::Str(value) => out.push_str(value),
            Item::List(nested) => write_items(out, nested),
        }
    }
}

/// A Maven version range expression.
///
/// Supports: `[1.0,2.0)`, `[1.0,]`, `(,2.0)`, `[1.5]` (exact).
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

#[derive(Debug, Clone)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl VersionRange {
    /// Parse a Maven version range string.
    ///
    /// Returns `None` for bare versions and unbalanced brackets.
    pub fn parse(range: &str) -> Option<Self> {
        let s = range.trim();
        if !(s.starts_with('[') || s.starts_with('(')) || !(s.ends_with(']') || s.ends_with(')'))
        {
            return None;
        }
        if s.len() < 2 {
            return None;
        }

        let open_inclusive = s.starts_with('[');
        let close_inclusive = s.ends_with(']');
        let inner = &s[1..s.len() - 1];

        let bound = |text: &str, inclusive: bool| {
            let text = text.trim();
            (!text.is_empty()).then(|| Bound {
                version: Version::parse(text),
                inclusive,
            })
        };

        if let Some((lower, upper)) = inner.split_once(',') {
            Some(VersionRange {
                lower: bound(lower, open_inclusive),
                upper: bound(upper, close_inclusive),
            })
        } else {
            // [1.0] means exactly 1.0
            let exact = bound(inner, true)?;
            Some(VersionRange {
                lower: Some(exact.clone()),
                upper: Some(exact),
            })
        }
    }

    /// Check if a version satisfies this range.
    pub fn contains(&self, version: &Version) -> bool {
        if let Some(ref lower) = self.lower {
            match version.cmp(&lower.version) {
                Ordering::Less => return false,
                Ordering::Equal if !lower.inclusive => return false,
                _ => {}
            }
        }
        if let Some(ref upper) = self.upper {
            match version.cmp(&upper.version) {
                Ordering::Greater => return false,
                Ordering::Equal if !upper.inclusive => return false,
                _ => {}
            }
        }
        true
    }
}
