// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic PDFs for tests and benchmarks.
//
// Every page carries a single text label in its content stream so page order
// can be checked after reordering without rendering anything.

use std::path::{Path, PathBuf};

use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions,
    Stream, StringFormat, dictionary,
};

/// A4 in PDF points.
const MEDIA_BOX: [i64; 4] = [0, 0, 595, 842];

/// Build a PDF whose pages hang directly off the root `Pages` node.
///
/// `MediaBox` and `Resources` live on the root node and are inherited.
pub fn sample_pdf(labels: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = add_resources(&mut doc);

    let kids: Vec<Object> = labels
        .iter()
        .map(|label| Object::Reference(add_page(&mut doc, pages_id, label)))
        .collect();

    let mut pages = pages_node(kids, labels.len());
    pages.set("Resources", Object::Reference(resources_id));
    pages.set("MediaBox", media_box());
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    finish(doc, pages_id)
}

/// Build a flat sample PDF encrypted (RC4, 128-bit) with a non-empty user
/// password, so it cannot be opened without one.
pub fn encrypted_sample_pdf(labels: &[&str]) -> Vec<u8> {
    let mut doc = Document::load_mem(&sample_pdf(labels)).expect("reload sample PDF");
    let file_id = Object::String(b"pagewerk-fixture".to_vec(), StringFormat::Literal);
    doc.trailer.set("ID", Object::Array(vec![file_id.clone(), file_id]));

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "user",
        key_length: 128,
        permissions: Permissions::all(),
    })
    .expect("encryption state");
    doc.encrypt(&state).expect("encrypt sample PDF");

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise encrypted PDF");
    bytes
}

/// Build a PDF with an intermediate `Pages` level holding `per_node` pages each.
///
/// `MediaBox` sits on the root, `Resources` on the intermediate nodes, so
/// pages inherit attributes from two different ancestors.
pub fn nested_sample_pdf(labels: &[&str], per_node: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let resources_id = add_resources(&mut doc);

    let mut nodes = Vec::new();
    for chunk in labels.chunks(per_node.max(1)) {
        let node_id = doc.new_object_id();
        let kids: Vec<Object> = chunk
            .iter()
            .map(|label| Object::Reference(add_page(&mut doc, node_id, label)))
            .collect();
        let mut node = pages_node(kids, chunk.len());
        node.set("Parent", Object::Reference(root_id));
        node.set("Resources", Object::Reference(resources_id));
        doc.objects.insert(node_id, Object::Dictionary(node));
        nodes.push(Object::Reference(node_id));
    }

    let mut root = pages_node(nodes, labels.len());
    root.set("MediaBox", media_box());
    doc.objects.insert(root_id, Object::Dictionary(root));

    finish(doc, root_id)
}

/// Write [`sample_pdf`] to `dir/name` and return the path.
pub fn write_sample_pdf(dir: &Path, name: &str, labels: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sample_pdf(labels)).expect("write sample PDF");
    path
}

/// Labels of every page in document order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("load PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            label_from_content(&content)
        })
        .collect()
}

/// Labels of every page of the PDF at `path`.
pub fn page_labels_at(path: &Path) -> Vec<String> {
    page_labels(&std::fs::read(path).expect("read PDF"))
}

/// `count` labels of the form `{prefix}-{n}` (0-based).
pub fn labels(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|n| format!("{prefix}-{n}")).collect()
}

fn label_from_content(content: &[u8]) -> String {
    let text = String::from_utf8_lossy(content);
    let start = text.find('(').map(|i| i + 1).unwrap_or(0);
    let end = text.rfind(')').unwrap_or(text.len());
    text[start..end].to_string()
}

fn add_resources(doc: &mut Document) -> ObjectId {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    })
}

fn add_page(doc: &mut Document, parent_id: ObjectId, label: &str) -> ObjectId {
    let content = format!("BT /F1 24 Tf 72 720 Td ({label}) Tj ET");
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent_id,
        "Contents" => content_id,
    })
}

fn pages_node(kids: Vec<Object>, count: usize) -> Dictionary {
    dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(count as i64),
    }
}

fn media_box() -> Object {
    Object::Array(MEDIA_BOX.iter().map(|&v| Object::Integer(v)).collect())
}

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise sample PDF");
    bytes
}
