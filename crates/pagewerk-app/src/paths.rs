// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input path handling — drag-and-drop payload parsing, normalisation, and
// selection of the files handed to the batch runner.
//
// Drop payloads come from file managers and Tk-style drop targets as one
// string: paths containing spaces are wrapped in braces, others are bare,
// and entries are separated by whitespace, e.g. `{C:/My Docs/a.pdf} C:/b.pdf`.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Why a candidate path was not handed to the batch runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Does not exist or is not a regular file.
    NotAFile,
    /// Extension is not `.pdf` while PDF-only selection is enabled.
    NotPdf,
    /// Same file as an earlier candidate.
    Duplicate,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotAFile => "not an existing file",
            Self::NotPdf => "not a .pdf file",
            Self::Duplicate => "duplicate of an earlier input",
        };
        f.write_str(label)
    }
}

/// Candidates split into accepted inputs (in first-seen order) and rejects.
#[derive(Debug, Default)]
pub struct Selection {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<(PathBuf, RejectReason)>,
}

/// Split a drop payload into normalised paths.
pub fn parse_drop_payload(payload: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut chars = payload.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let raw: String = if c == '{' {
            chars.next();
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            let mut entry = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                entry.push(ch);
                chars.next();
            }
            entry
        };

        let trimmed = raw.trim().trim_matches(|ch: char| ch == '{' || ch == '}');
        if !trimmed.is_empty() {
            paths.push(normalize_lexically(Path::new(trimmed)));
        }
    }

    paths
}

/// Remove `.` components and resolve `..` against preceding normal
/// components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Keep existing regular files, optionally only `.pdf`, dropping duplicates.
///
/// Duplicates are detected on the canonical path, so `a.pdf` and `./a.pdf`
/// count as one input. Accepted paths keep the spelling first given.
pub fn select_inputs(candidates: impl IntoIterator<Item = PathBuf>, require_pdf: bool) -> Selection {
    let mut selection = Selection::default();
    let mut seen = HashSet::new();

    for candidate in candidates {
        if !candidate.is_file() {
            selection.rejected.push((candidate, RejectReason::NotAFile));
            continue;
        }
        if require_pdf && !has_pdf_extension(&candidate) {
            selection.rejected.push((candidate, RejectReason::NotPdf));
            continue;
        }
        let identity = std::fs::canonicalize(&candidate).unwrap_or_else(|_| normalize_lexically(&candidate));
        if !seen.insert(identity) {
            selection.rejected.push((candidate, RejectReason::Duplicate));
            continue;
        }
        selection.accepted.push(candidate);
    }

    selection
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braced_payload_with_spaces() {
        let paths = parse_drop_payload("{/home/me/My Docs/a.pdf} {/home/me/b c.pdf}");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/me/My Docs/a.pdf"),
                PathBuf::from("/home/me/b c.pdf"),
            ]
        );
    }

    #[test]
    fn mixed_braced_and_bare_entries() {
        let paths = parse_drop_payload("  /tmp/plain.pdf {/tmp/with space.pdf}\n/tmp/last.pdf ");
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/tmp/plain.pdf"),
                PathBuf::from("/tmp/with space.pdf"),
                PathBuf::from("/tmp/last.pdf"),
            ]
        );
    }

    #[test]
    fn empty_and_blank_payloads_yield_nothing() {
        assert!(parse_drop_payload("").is_empty());
        assert!(parse_drop_payload("   {}  { } ").is_empty());
    }

    #[test]
    fn unterminated_brace_takes_rest_of_payload() {
        assert_eq!(
            parse_drop_payload("{/tmp/open ended.pdf"),
            vec![PathBuf::from("/tmp/open ended.pdf")]
        );
    }

    #[test]
    fn payload_paths_are_normalised() {
        assert_eq!(
            parse_drop_payload("{/tmp/./docs/../x.pdf}"),
            vec![PathBuf::from("/tmp/x.pdf")]
        );
    }

    #[test]
    fn lexical_normalisation() {
        assert_eq!(normalize_lexically(Path::new("./a/./b.pdf")), PathBuf::from("a/b.pdf"));
        assert_eq!(normalize_lexically(Path::new("a/../../b.pdf")), PathBuf::from("../b.pdf"));
        assert_eq!(normalize_lexically(Path::new("/../b.pdf")), PathBuf::from("/b.pdf"));
        assert_eq!(normalize_lexically(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn selection_rejects_missing_directories_and_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.pdf");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&a, b"a").expect("write");
        std::fs::write(&notes, b"n").expect("write");
        let a_again = dir.path().join(".").join("a.pdf");

        let selection = select_inputs(
            vec![
                a.clone(),
                dir.path().join("missing.pdf"),
                dir.path().to_path_buf(),
                a_again.clone(),
                notes.clone(),
            ],
            false,
        );

        assert_eq!(selection.accepted, vec![a, notes]);
        let reasons: Vec<RejectReason> = selection.rejected.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            reasons,
            vec![
                RejectReason::NotAFile,
                RejectReason::NotAFile,
                RejectReason::Duplicate,
            ]
        );
        assert_eq!(selection.rejected[2].0, a_again);
    }

    #[test]
    fn pdf_only_selection_checks_extension_case_insensitively() {
        let dir = tempfile::tempdir().expect("tempdir");
        let upper = dir.path().join("SCAN.PDF");
        let text = dir.path().join("notes.txt");
        std::fs::write(&upper, b"x").expect("write");
        std::fs::write(&text, b"x").expect("write");

        let selection = select_inputs(vec![upper.clone(), text.clone()], true);

        assert_eq!(selection.accepted, vec![upper]);
        assert_eq!(selection.rejected, vec![(text, RejectReason::NotPdf)]);
    }
}
