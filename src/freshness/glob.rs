//! Filesystem glob expansion.
//!
//! A rule's `path` and `glob` are joined into one pattern which is expanded
//! one path component at a time. Literal components are appended as-is;
//! components containing `*`, `?`, `[` or `\` are matched against the
//! entries of each candidate directory, in sorted order. Wildcards never
//! cross a path separator.
//!
//! The pattern dialect is the classic one: `*`, `?`, `[...]`, `[^...]` and
//! `\` escapes. Braces and `!` carry no meaning. Components are rewritten
//! into globset syntax before compiling.
//!
//! Directories that are missing or unreadable produce no matches rather than
//! an error. Only a malformed pattern is an error.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlobError {
    #[error("bad glob pattern {pattern:?}: {reason}")]
    Syntax {
        pattern: String,
        reason: &'static str,
    },

    #[error("bad glob pattern {pattern:?}: {source}")]
    Compile {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

enum Segment {
    Literal(OsString),
    Pattern(GlobMatcher),
    /// A component whose character class can never match.
    Nothing,
}

/// Join `base` and `pattern` and return every existing path that matches.
pub fn expand(base: &str, pattern: &str) -> Result<Vec<PathBuf>, GlobError> {
    let joined = join_pattern(base, pattern);
    let segments = compile(&joined)?;

    if segments.iter().all(|s| matches!(s, Segment::Literal(_))) {
        return Ok(if fs::symlink_metadata(&joined).is_ok() {
            vec![joined]
        } else {
            Vec::new()
        });
    }

    let mut candidates = vec![PathBuf::new()];
    for segment in &segments {
        let mut next = Vec::new();
        for dir in &candidates {
            match segment {
                Segment::Literal(name) => next.push(dir.join(name)),
                Segment::Pattern(matcher) => {
                    for name in sorted_entries(dir) {
                        if matcher.is_match(Path::new(&name)) {
                            next.push(dir.join(name));
                        }
                    }
                }
                Segment::Nothing => {}
            }
        }
        candidates = next;
        if candidates.is_empty() {
            break;
        }
    }

    // Trailing literal components were never checked against the disk.
    candidates.retain(|p| fs::symlink_metadata(p).is_ok());
    Ok(candidates)
}

/// Join `pattern` onto `base` and clean the result lexically.
///
/// A leading `/` in `pattern` does not replace `base`. `.` components are
/// dropped and `..` removes the preceding component.
fn join_pattern(base: &str, pattern: &str) -> PathBuf {
    let pattern_parts = Path::new(pattern).components().filter(|component| {
        base.is_empty() || !matches!(component, Component::RootDir | Component::Prefix(_))
    });

    let mut joined = PathBuf::new();
    for component in Path::new(base).components().chain(pattern_parts) {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if joined.file_name().is_some() {
                    joined.pop();
                } else if !joined.has_root() {
                    joined.push("..");
                }
            }
            other => joined.push(other),
        }
    }
    joined
}

fn compile(joined: &Path) -> Result<Vec<Segment>, GlobError> {
    let mut segments = Vec::new();
    for component in joined.components() {
        let name = component.as_os_str();
        let segment = match (component, name.to_str()) {
            (Component::Normal(_), Some(text)) if has_meta(text) => {
                let syntax_error = |reason: &'static str| GlobError::Syntax {
                    pattern: joined.display().to_string(),
                    reason,
                };
                match translate(text).map_err(syntax_error)? {
                    Some(rewritten) => {
                        let glob = GlobBuilder::new(&rewritten)
                            .literal_separator(true)
                            .backslash_escape(true)
                            .build()
                            .map_err(|source| GlobError::Compile {
                                pattern: joined.display().to_string(),
                                source,
                            })?;
                        Segment::Pattern(glob.compile_matcher())
                    }
                    None => Segment::Nothing,
                }
            }
            _ => Segment::Literal(name.to_os_string()),
        };
        segments.push(segment);
    }
    Ok(segments)
}

fn has_meta(component: &str) -> bool {
    component.contains(['*', '?', '[', '\\'])
}

/// Characters globset treats specially outside a class.
const GLOBSET_META: [char; 7] = ['*', '?', '[', ']', '{', '}', '\\'];

/// Characters whose meaning in a globset class depends on position.
/// Kept sorted.
const CLASS_SPECIALS: [char; 4] = ['!', '-', ']', '^'];

/// Rewrite one path component into globset syntax.
///
/// `Ok(None)` means the component contains a class that matches nothing,
/// e.g. `[z-a]`.
fn translate(component: &str) -> Result<Option<String>, &'static str> {
    let mut out = String::with_capacity(component.len() + 4);
    let mut chars = component.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            }
            '?' => out.push('?'),
            '\\' => {
                let escaped = chars.next().ok_or("trailing backslash")?;
                push_literal(&mut out, escaped);
            }
            '[' => {
                let mut negated = false;
                if chars.peek() == Some(&'^') {
                    chars.next();
                    negated = true;
                }
                let mut ranges = Vec::new();
                loop {
                    if chars.peek() == Some(&']') && !ranges.is_empty() {
                        chars.next();
                        break;
                    }
                    let lo = class_char(&mut chars)?;
                    let mut hi = lo;
                    if chars.peek() == Some(&'-') {
                        chars.next();
                        hi = class_char(&mut chars)?;
                    }
                    ranges.push((lo, hi));
                }
                if !push_class(&mut out, negated, &ranges) {
                    return Ok(None);
                }
            }
            other => push_literal(&mut out, other),
        }
    }
    Ok(Some(out))
}

/// Read one class member, honoring `\` escapes. A bare `-` or `]` here, or
/// running out of input, means the class is malformed.
fn class_char(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<char, &'static str> {
    match chars.next() {
        None => Err("unclosed character class"),
        Some('-') | Some(']') => Err("misplaced '-' or ']' in character class"),
        Some('\\') => chars.next().ok_or("unclosed character class"),
        Some(c) => {
            if chars.peek().is_none() {
                return Err("unclosed character class");
            }
            Ok(c)
        }
    }
}

fn push_literal(out: &mut String, c: char) {
    if GLOBSET_META.contains(&c) {
        out.push('\\');
    }
    out.push(c);
}

/// Emit a class so that globset reads exactly `ranges`. Returns false when
/// the class can never match.
///
/// Inverted ranges match nothing and are dropped. Every range is split so
/// that `!`, `-`, `]` and `^` only appear as single members, then members are
/// ordered so none of them lands where globset would read it as syntax.
fn push_class(out: &mut String, negated: bool, ranges: &[(char, char)]) -> bool {
    let mut plain = Vec::new();
    let mut specials = Vec::new();
    for &(lo, hi) in ranges.iter().filter(|(lo, hi)| lo <= hi) {
        let mut start = Some(lo);
        for s in CLASS_SPECIALS {
            match start {
                Some(from) if from <= s && s <= hi => {
                    if from < s {
                        plain.push((from, prev_ascii(s)));
                    }
                    if !specials.contains(&s) {
                        specials.push(s);
                    }
                    start = next_char(s);
                }
                _ => {}
            }
        }
        if let Some(from) = start.filter(|from| *from <= hi) {
            plain.push((from, hi));
        }
    }

    if plain.is_empty() && specials.is_empty() {
        if negated {
            out.push('?');
            return true;
        }
        return false;
    }

    let has = |c: char| specials.contains(&c);
    if !negated && plain.is_empty() && !has(']') && !has('-') {
        // Only `!` and/or `^`: neither may open a class, so spell them out.
        match (has('!'), has('^')) {
            (true, true) => out.push_str("{!,^}"),
            (true, false) => out.push('!'),
            _ => out.push('^'),
        }
        return true;
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    if has(']') {
        out.push(']');
    } else if has('-') && plain.is_empty() {
        out.push('-');
    }
    for (lo, hi) in &plain {
        out.push(*lo);
        if lo != hi {
            out.push('-');
            out.push(*hi);
        }
    }
    for c in ['!', '^'] {
        if has(c) {
            out.push(c);
        }
    }
    if has('-') && (has(']') || !plain.is_empty()) {
        out.push('-');
    }
    out.push(']');
    true
}

fn prev_ascii(c: char) -> char {
    (c as u8 - 1) as char
}

fn next_char(c: char) -> Option<char> {
    char::from_u32(c as u32 + 1)
}

fn sorted_entries(dir: &Path) -> Vec<OsString> {
    let target = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    let Ok(entries) = fs::read_dir(target) else {
        return Vec::new();
    };
    let mut names: Vec<OsString> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn base(dir: &tempfile::TempDir) -> String {
        dir.path().to_str().unwrap().to_string()
    }

    #[test]
    fn test_star_matches_sorted() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("b.log"));
        touch(&dir.path().join("a.log"));
        touch(&dir.path().join("c.txt"));

        let found = expand(&base(&dir), "*.log").unwrap();
        assert_eq!(found, vec![dir.path().join("a.log"), dir.path().join("b.log")]);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("top.log"));
        touch(&dir.path().join("sub/nested.log"));

        let found = expand(&base(&dir), "*.log").unwrap();
        assert_eq!(found, vec![dir.path().join("top.log")]);

        let found = expand(&base(&dir), "*/*.log").unwrap();
        assert_eq!(found, vec![dir.path().join("sub/nested.log")]);
    }

    #[test]
    fn test_wildcard_directory_then_literal_file() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("2024-01/manifest.json"));
        touch(&dir.path().join("2024-02/other.json"));
        touch(&dir.path().join("2024-03/manifest.json"));

        let found = expand(&base(&dir), "2024-*/manifest.json").unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("2024-01/manifest.json"),
                dir.path().join("2024-03/manifest.json"),
            ]
        );
    }

    #[test]
    fn test_question_mark_and_class() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("db1.sql"));
        touch(&dir.path().join("db2.sql"));
        touch(&dir.path().join("db10.sql"));

        let found = expand(&base(&dir), "db?.sql").unwrap();
        assert_eq!(found.len(), 2);

        let found = expand(&base(&dir), "db[2-9].sql").unwrap();
        assert_eq!(found, vec![dir.path().join("db2.sql")]);
    }

    #[test]
    fn test_literal_pattern() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("exact.bak"));

        assert_eq!(
            expand(&base(&dir), "exact.bak").unwrap(),
            vec![dir.path().join("exact.bak")]
        );
        assert!(expand(&base(&dir), "absent.bak").unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let found = expand(missing.to_str().unwrap(), "*.log").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let dir = tempdir().unwrap();
        let err = expand(&base(&dir), "[abc.log").unwrap_err();
        assert!(err.to_string().contains("bad glob pattern"));
    }

    #[test]
    fn test_dotfiles_match_star() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join(".hidden.log"));

        let found = expand(&base(&dir), "*.log").unwrap();
        assert_eq!(found, vec![dir.path().join(".hidden.log")]);
    }

    #[test]
    fn test_leading_slash_in_glob_stays_under_path() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("sub/a.log"));

        let found = expand(&base(&dir), "/sub/*.log").unwrap();
        assert_eq!(found, vec![dir.path().join("sub/a.log")]);
    }

    #[test]
    fn test_join_cleans_dot_components() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("keep/a.log"));

        let found = expand(&base(&dir), "./other/../keep/*.log").unwrap();
        assert_eq!(found, vec![dir.path().join("keep/a.log")]);
    }

    #[test]
    fn test_bang_in_class_is_literal() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("!.log"));
        touch(&dir.path().join("a.log"));
        touch(&dir.path().join("b.log"));

        let found = expand(&base(&dir), "[!a].log").unwrap();
        assert_eq!(found, vec![dir.path().join("!.log"), dir.path().join("a.log")]);
    }

    #[test]
    fn test_caret_negates_class() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.log"));
        touch(&dir.path().join("b.log"));

        let found = expand(&base(&dir), "[^a].log").unwrap();
        assert_eq!(found, vec![dir.path().join("b.log")]);
    }

    #[test]
    fn test_braces_are_literal() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("x.{log"));
        touch(&dir.path().join("x.log"));
        touch(&dir.path().join("y.{a,b}"));

        let found = expand(&base(&dir), "*.{log").unwrap();
        assert_eq!(found, vec![dir.path().join("x.{log")]);

        let found = expand(&base(&dir), "*.{a,b}").unwrap();
        assert_eq!(found, vec![dir.path().join("y.{a,b}")]);
    }

    #[test]
    fn test_class_with_awkward_members() {
        let dir = tempdir().unwrap();
        for name in ["-.txt", "].txt", "^.txt", "m.txt", "z.txt"] {
            touch(&dir.path().join(name));
        }

        let found = expand(&base(&dir), r"[\]\-^a-m].txt").unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("-.txt"),
                dir.path().join("].txt"),
                dir.path().join("^.txt"),
                dir.path().join("m.txt"),
            ]
        );

        let found = expand(&base(&dir), "[z-a].txt").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_malformed_classes_are_errors() {
        let dir = tempdir().unwrap();
        for pattern in ["[].log", "[-a].log", "[a-].log", "a\\"] {
            assert!(
                matches!(expand(&base(&dir), pattern), Err(GlobError::Syntax { .. })),
                "{pattern}"
            );
        }
    }

    #[test]
    fn test_translate_output() {
        assert_eq!(translate("**.log").unwrap().as_deref(), Some("*.log"));
        assert_eq!(translate("[!a]").unwrap().as_deref(), Some("[a!]"));
        assert_eq!(translate("[!]").unwrap().as_deref(), Some("!"));
        assert_eq!(translate(r"[^\-]").unwrap().as_deref(), Some("[!-]"));
        assert_eq!(translate("a{b}").unwrap().as_deref(), Some(r"a\{b\}"));
        assert_eq!(translate("[b-a]").unwrap(), None);
    }
}
