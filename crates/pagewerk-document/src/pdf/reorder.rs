// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page reordering — apply a `PermutationPlan` to a PDF page tree and write the
// result as `<stem>_Reordered<ext>` next to the source.
//
// The page tree is flattened: every page hangs directly off the root /Pages
// node in plan order. Attributes a page inherited from intermediate nodes are
// copied onto the page first so it renders the same afterwards.

use std::ffi::OsString;
use std::fs::Permissions;
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use pagewerk_core::REORDERED_SUFFIX;
use pagewerk_core::error::{PagewerkError, Result};
use tracing::{debug, info, instrument, warn};

use super::plan::PermutationPlan;
use super::reader::PdfReader;
use super::writer::{publish_atomically, serialise};

/// Page attributes a page may inherit from its ancestors (PDF 32000-1, 7.7.3.4).
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic /Parent chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Rewrites PDF documents with their pages in booklet order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageReorderer;

impl PageReorderer {
    pub fn new() -> Self {
        Self
    }

    /// Reorder the PDF at `input` and publish it at [`output_path_for`].
    ///
    /// The source file is never modified. An existing output file is replaced.
    #[instrument(skip_all, fields(input = %input.as_ref().display()))]
    pub fn transform(&self, input: impl AsRef<Path>) -> Result<PathBuf> {
        let input = input.as_ref();
        let output = output_path_for(input)?;

        let reader = PdfReader::open(input)?;
        let permissions = output_permissions(input);

        let plan = PermutationPlan::for_page_count(reader.page_count());
        let mut document = reader.into_document();
        apply_plan(&mut document, &plan).map_err(|err| match err {
            PagewerkError::PdfError(detail) => PagewerkError::format(input, detail),
            other => other,
        })?;

        publish_atomically(&mut document, &output, permissions)?;

        info!(
            pages = plan.len(),
            output = %output.display(),
            "Reordered PDF written"
        );
        Ok(output)
    }

    /// Reorder a PDF held in memory and return the serialised result.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn reorder_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let reader = PdfReader::from_bytes(data)?;
        let plan = PermutationPlan::for_page_count(reader.page_count());
        let mut document = reader.into_document();
        apply_plan(&mut document, &plan)?;
        serialise(&mut document)
    }
}

/// Output location for a reordered copy of `input`.
///
/// `dir/report.pdf` becomes `dir/report_Reordered.pdf`; only the last
/// extension is kept after the suffix.
pub fn output_path_for(input: &Path) -> Result<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        PagewerkError::io(
            input,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    let mut name = OsString::from(stem);
    name.push(REORDERED_SUFFIX);
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    Ok(input.with_file_name(name))
}

/// Permissions for the output: the input's read/write bits with owner-write
/// forced on, so a later run can replace the file.
fn output_permissions(input: &Path) -> Option<Permissions> {
    let permissions = std::fs::metadata(input).ok()?.permissions();
    Some(owner_writable(permissions))
}

#[cfg(unix)]
fn owner_writable(permissions: Permissions) -> Permissions {
    use std::os::unix::fs::PermissionsExt;
    Permissions::from_mode((permissions.mode() & 0o666) | 0o200)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn owner_writable(mut permissions: Permissions) -> Permissions {
    permissions.set_readonly(false);
    permissions
}

/// Rebuild the page tree of `document` so that output page `k` is source
/// page `plan[k]`.
///
/// Only kids lopdf recognises as pages (`/Type /Page`) are kept; when that
/// differs from the root `/Count` a warning is logged.
pub fn apply_plan(document: &mut Document, plan: &PermutationPlan) -> Result<()> {
    let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
    let ordered = plan.apply(&page_ids).ok_or_else(|| {
        PagewerkError::PdfError(format!(
            "plan covers {} pages but document has {}",
            plan.len(),
            page_ids.len()
        ))
    })?;

    let root_id = root_pages_id(document)?;

    if let Some(declared) = declared_page_count(document, root_id)
        .filter(|&declared| declared != page_ids.len() as i64)
    {
        warn!(
            declared,
            found = page_ids.len(),
            "Page tree /Count disagrees with enumerated pages; unrecognised kids are dropped"
        );
    }

    for &page_id in &page_ids {
        let inherited = inherited_attributes(document, page_id);
        let page = document.get_dictionary_mut(page_id).map_err(|err| {
            PagewerkError::PdfError(format!("cannot edit page object {page_id:?}: {err}"))
        })?;
        for (key, value) in inherited {
            page.set(key.to_vec(), value);
        }
        page.set("Parent", Object::Reference(root_id));
    }

    let root = document.get_dictionary_mut(root_id).map_err(|err| {
        PagewerkError::PdfError(format!("cannot edit /Pages node {root_id:?}: {err}"))
    })?;
    root.set(
        "Kids",
        Object::Array(ordered.into_iter().map(Object::Reference).collect()),
    );
    root.set("Count", Object::Integer(page_ids.len() as i64));
    // Attributes are now on every page; the root must not override them.
    for key in INHERITABLE_KEYS {
        root.remove(key);
    }

    let pruned = document.prune_objects();
    debug!(
        pages = page_ids.len(),
        pruned = pruned.len(),
        "Page tree flattened"
    );
    Ok(())
}

/// Object ID of the root /Pages node referenced by the catalog.
fn root_pages_id(document: &Document) -> Result<ObjectId> {
    document
        .catalog()
        .map_err(|err| PagewerkError::PdfError(format!("no catalog: {err}")))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|err| PagewerkError::PdfError(format!("no /Pages reference: {err}")))
}

/// `/Count` of the root /Pages node, if present and an integer.
fn declared_page_count(document: &Document, root_id: ObjectId) -> Option<i64> {
    document
        .get_dictionary(root_id)
        .ok()?
        .get(b"Count")
        .and_then(Object::as_i64)
        .ok()
}

/// Inheritable attributes that `page_id` lacks itself but an ancestor defines.
/// The nearest ancestor wins.
fn inherited_attributes(document: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let mut found = Vec::new();
    let Ok(page) = document.get_dictionary(page_id) else {
        warn!(?page_id, "Page object is not a dictionary");
        return found;
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE_KEYS
        .into_iter()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = document.get_dictionary(node_id) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixture;

    fn expected_labels(labels: &[String]) -> Vec<String> {
        PermutationPlan::for_page_count(labels.len())
            .apply(labels)
            .expect("length matches")
    }

    #[test]
    fn output_name_appends_suffix_before_extension() {
        assert_eq!(
            output_path_for(Path::new("/data/report.pdf")).expect("name"),
            PathBuf::from("/data/report_Reordered.pdf")
        );
        assert_eq!(
            output_path_for(Path::new("report.pdf")).expect("name"),
            PathBuf::from("report_Reordered.pdf")
        );
    }

    #[test]
    fn output_name_handles_missing_and_double_extensions() {
        assert_eq!(
            output_path_for(Path::new("dir/notes")).expect("name"),
            PathBuf::from("dir/notes_Reordered")
        );
        assert_eq!(
            output_path_for(Path::new("dir/archive.tar.pdf")).expect("name"),
            PathBuf::from("dir/archive.tar_Reordered.pdf")
        );
    }

    #[test]
    fn output_name_requires_file_name() {
        assert!(output_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn transform_writes_pages_in_plan_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let labels = fixture::labels("page", 8);
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let input = fixture::write_sample_pdf(dir.path(), "report.pdf", &label_refs);

        let output = PageReorderer::new().transform(&input).expect("transform");

        assert_eq!(output, dir.path().join("report_Reordered.pdf"));
        assert_eq!(
            fixture::page_labels_at(&output),
            vec!["page-6", "page-7", "page-4", "page-5", "page-2", "page-3", "page-0", "page-1"]
        );
    }

    #[test]
    fn transform_handles_odd_page_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = fixture::write_sample_pdf(dir.path(), "odd.pdf", &["a", "b", "c", "d", "e"]);

        let output = PageReorderer::new().transform(&input).expect("transform");

        assert_eq!(fixture::page_labels_at(&output), vec!["e", "c", "d", "a", "b"]);
    }

    #[test]
    fn transform_handles_empty_and_single_page_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let empty = fixture::write_sample_pdf(dir.path(), "empty.pdf", &[]);
        let single = fixture::write_sample_pdf(dir.path(), "single.pdf", &["only"]);

        let empty_out = PageReorderer::new().transform(&empty).expect("empty");
        let single_out = PageReorderer::new().transform(&single).expect("single");

        assert!(fixture::page_labels_at(&empty_out).is_empty());
        assert_eq!(fixture::page_labels_at(&single_out), vec!["only"]);
    }

    #[test]
    fn transform_leaves_input_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = fixture::write_sample_pdf(dir.path(), "keep.pdf", &["a", "b", "c"]);
        let before = std::fs::read(&input).expect("read");

        PageReorderer::new().transform(&input).expect("transform");

        assert_eq!(std::fs::read(&input).expect("read"), before);
    }

    #[test]
    fn transform_overwrites_existing_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = fixture::write_sample_pdf(dir.path(), "doc.pdf", &["a", "b", "c", "d"]);
        let stale = dir.path().join("doc_Reordered.pdf");
        std::fs::write(&stale, b"stale").expect("write stale");

        let output = PageReorderer::new().transform(&input).expect("transform");

        assert_eq!(output, stale);
        assert_eq!(fixture::page_labels_at(&output), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn corrupt_input_fails_without_leaving_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("corrupt.pdf");
        std::fs::write(&input, b"plain text, definitely not a pdf").expect("write");

        let err = PageReorderer::new().transform(&input).unwrap_err();

        assert!(matches!(err, PagewerkError::Format { .. }), "{err}");
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("corrupt.pdf")]);
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = PageReorderer::new()
            .transform(dir.path().join("nope.pdf"))
            .unwrap_err();
        assert!(matches!(err, PagewerkError::Io { .. }), "{err}");
        assert!(!dir.path().join("nope_Reordered.pdf").exists());
    }

    #[test]
    fn nested_page_tree_is_flattened_with_inherited_attributes() {
        let labels = fixture::labels("n", 7);
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let bytes = fixture::nested_sample_pdf(&label_refs, 3);

        let output = PageReorderer::new().reorder_bytes(&bytes).expect("reorder");

        assert_eq!(fixture::page_labels(&output), expected_labels(&labels));

        let doc = Document::load_mem(&output).expect("load output");
        let root_id = root_pages_id(&doc).expect("root");
        for page_id in doc.get_pages().into_values() {
            let page = doc.get_dictionary(page_id).expect("page dict");
            assert!(page.has(b"MediaBox"), "page {page_id:?} lost MediaBox");
            assert!(page.has(b"Resources"), "page {page_id:?} lost Resources");
            assert_eq!(
                page.get(b"Parent").and_then(Object::as_reference).expect("parent"),
                root_id
            );
        }
        let root = doc.get_dictionary(root_id).expect("root dict");
        assert_eq!(root.get(b"Count").and_then(Object::as_i64).expect("count"), 7);
    }

    #[test]
    fn page_own_attributes_win_over_inherited_ones() {
        let mut doc = Document::load_mem(&fixture::sample_pdf(&["a", "b"])).expect("load");
        let first = *doc.get_pages().get(&1).expect("page 1");
        let small_box: Vec<Object> = [0, 0, 100, 100].into_iter().map(Object::Integer).collect();
        doc.get_dictionary_mut(first)
            .expect("page dict")
            .set("MediaBox", Object::Array(small_box));

        apply_plan(&mut doc, &PermutationPlan::for_page_count(2)).expect("apply");

        let width = doc
            .get_dictionary(first)
            .expect("page dict")
            .get(b"MediaBox")
            .and_then(Object::as_array)
            .expect("media box")[2]
            .as_i64()
            .expect("integer width");
        assert_eq!(width, 100);
    }

    #[test]
    fn apply_plan_rejects_mismatched_plan() {
        let mut doc = Document::load_mem(&fixture::sample_pdf(&["a", "b", "c"])).expect("load");
        let err = apply_plan(&mut doc, &PermutationPlan::for_page_count(2)).unwrap_err();
        assert!(matches!(err, PagewerkError::PdfError(_)));
    }

    fn directory_entries(dir: &Path) -> Vec<OsString> {
        let mut names: Vec<OsString> = std::fs::read_dir(dir)
            .expect("read_dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn encrypted_input_is_rejected_without_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("locked.pdf");
        std::fs::write(&input, fixture::encrypted_sample_pdf(&["a", "b", "c"])).expect("write");

        let err = PageReorderer::new().transform(&input).unwrap_err();

        assert!(matches!(err, PagewerkError::Format { .. }), "{err}");
        assert_eq!(directory_entries(dir.path()), vec![OsString::from("locked.pdf")]);
    }

    #[test]
    fn failed_publish_removes_staged_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = fixture::write_sample_pdf(dir.path(), "doc.pdf", &["a", "b"]);
        let blocker = dir.path().join("doc_Reordered.pdf");
        std::fs::create_dir(&blocker).expect("mkdir");
        std::fs::write(blocker.join("keep.txt"), b"keep").expect("write");

        let err = PageReorderer::new().transform(&input).unwrap_err();

        assert!(matches!(err, PagewerkError::Io { .. }), "{err}");
        assert_eq!(
            directory_entries(dir.path()),
            vec![OsString::from("doc.pdf"), OsString::from("doc_Reordered.pdf")]
        );
        assert!(blocker.is_dir());
        assert_eq!(std::fs::read(blocker.join("keep.txt")).expect("read"), b"keep");
    }

    #[cfg(unix)]
    #[test]
    fn read_only_input_gives_replaceable_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let input = fixture::write_sample_pdf(dir.path(), "ro.pdf", &["a", "b"]);
        std::fs::set_permissions(&input, Permissions::from_mode(0o444)).expect("chmod");

        let output = PageReorderer::new().transform(&input).expect("first run");
        let mode = std::fs::metadata(&output).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        PageReorderer::new().transform(&input).expect("second run");
        assert_eq!(fixture::page_labels_at(&output), vec!["a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn output_drops_execute_bits() {
        use std::os::unix::fs::PermissionsExt;

        let kept = owner_writable(Permissions::from_mode(0o755));
        assert_eq!(kept.mode() & 0o777, 0o644);
    }

    #[test]
    fn untyped_kids_are_dropped_and_count_follows_pages() {
        let mut doc = Document::load_mem(&fixture::sample_pdf(&["a", "b", "c"])).expect("load");
        let second = *doc.get_pages().get(&2).expect("page 2");
        doc.get_dictionary_mut(second).expect("page dict").remove(b"Type");
        let root_id = root_pages_id(&doc).expect("root");
        assert_eq!(declared_page_count(&doc, root_id), Some(3));

        apply_plan(&mut doc, &PermutationPlan::for_page_count(2)).expect("apply");

        assert_eq!(declared_page_count(&doc, root_id), Some(2));
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn reorder_bytes_rejects_garbage() {
        let err = PageReorderer::new().reorder_bytes(b"nope").unwrap_err();
        assert!(matches!(err, PagewerkError::PdfError(_)));
    }
}
