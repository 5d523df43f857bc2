use lopdf::{Dictionary, Document, Object, StringFormat};
use pirjo_core::pdf::extract_sources;
use std::path::{Path, PathBuf};

/// Write a PDF with one page per entry of `pages` (None = page without content)
fn write_pdf(path: &Path, pages: &[Option<&str>], info: &[(&str, &str)]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let catalog_id = doc.new_object_id();

    let mut kids = Vec::new();
    for page in pages {
        let page_id = doc.new_object_id();
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        if let Some(text) = page {
            let content_id = doc.new_object_id();
            let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", text);
            doc.objects.insert(
                content_id,
                Object::Stream(lopdf::Stream::new(Dictionary::new(), content.into_bytes())),
            );
            page_dict.set("Contents", Object::Reference(content_id));
        }
        doc.objects.insert(page_id, Object::Dictionary(page_dict));
        kids.push(Object::Reference(page_id));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(pages.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog_dict = Dictionary::new();
    catalog_dict.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog_dict.set("Pages", Object::Reference(pages_id));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog_dict));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    if !info.is_empty() {
        let info_id = doc.new_object_id();
        let mut info_dict = Dictionary::new();
        for (key, value) in info {
            info_dict.set(
                key.as_bytes().to_vec(),
                Object::String(value.as_bytes().to_vec(), StringFormat::Literal),
            );
        }
        doc.objects.insert(info_id, Object::Dictionary(info_dict));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    doc.save(path).unwrap();
}

fn fixture(dir: &Path, name: &str, pages: &[Option<&str>], info: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    write_pdf(&path, pages, info);
    path
}

#[test]
fn extracts_fragments_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(
        dir.path(),
        "doc1.pdf",
        &[Some("Primera pagina sobre erosion"), Some("Segunda pagina")],
        &[
            ("Author", "Autor1"),
            ("Title", "Titulo1"),
            ("CreationDate", "D:20200101120000Z"),
        ],
    );

    let sources = extract_sources(&[path], 700).unwrap();

    assert_eq!(sources.metadata.len(), 1);
    let meta = &sources.metadata[0];
    assert_eq!(meta.file, "doc1.pdf");
    assert_eq!(meta.author, "Autor1");
    assert_eq!(meta.title, "Titulo1");
    assert_eq!(meta.year, "2020");

    let keys: Vec<String> = sources.fragments.iter().map(|f| f.key()).collect();
    assert_eq!(keys, vec!["doc1.pdf:1:1", "doc1.pdf:2:1"]);
    assert!(sources.fragments[0].text.contains("Primera pagina"));
}

#[test]
fn missing_info_falls_back_to_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "sin_meta.pdf", &[Some("texto")], &[]);

    let sources = extract_sources(&[path], 700).unwrap();
    let meta = &sources.metadata[0];
    assert_eq!(meta.author, "");
    assert_eq!(meta.year, "");
    assert_eq!(meta.title, "sin_meta.pdf");
}

#[test]
fn pages_without_text_yield_no_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "vacio.pdf", &[None, Some("solo la segunda")], &[]);

    let sources = extract_sources(&[path], 700).unwrap();
    assert_eq!(sources.fragments.len(), 1);
    assert_eq!(sources.fragments[0].page, 2);
    assert_eq!(sources.fragments[0].chunk, 1);
}

#[test]
fn small_chunk_size_numbers_chunks_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(
        dir.path(),
        "largo.pdf",
        &[Some("uno dos tres cuatro cinco seis siete ocho nueve diez")],
        &[],
    );

    let sources = extract_sources(&[path], 3).unwrap();
    assert!(sources.fragments.len() > 1);
    for (i, fragment) in sources.fragments.iter().enumerate() {
        assert_eq!(fragment.page, 1);
        assert_eq!(fragment.chunk as usize, i + 1);
    }
    let joined: String = sources.fragments.iter().map(|f| f.text.as_str()).collect();
    assert_eq!(joined, "uno dos tres cuatro cinco seis siete ocho nueve diez");
}

/// One page shown with a WinAnsi-encoded Helvetica; `content` is raw bytes.
fn write_winansi_pdf(path: &Path, content: &[u8]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    let font_id = doc.add_object(Object::Dictionary(font));

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let content_id = doc.add_object(Object::Stream(lopdf::Stream::new(
        Dictionary::new(),
        content.to_vec(),
    )));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set("Resources", Object::Dictionary(resources));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    page.set("Contents", Object::Reference(content_id));
    let page_id = doc.add_object(Object::Dictionary(page));

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(1));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).unwrap();
}

#[test]
fn page_text_follows_font_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comillas.pdf");
    write_winansi_pdf(
        &path,
        b"BT /F1 12 Tf 50 700 Td (\x93Erosi\xf3n\x94 \x96 costas) Tj ET",
    );

    let sources = extract_sources(&[path], 700).unwrap();
    assert_eq!(sources.fragments.len(), 1);
    assert_eq!(sources.fragments[0].text, "\u{201C}Erosión\u{201D} \u{2013} costas");
    assert!(!sources.fragments[0].text.chars().any(|c| c.is_control()));
}
