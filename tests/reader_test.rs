//! Integration tests for the document readers.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_outline::reader::{LayoutJsonReader, PdfReader};
use pdf_outline::{
    read_document, read_document_with_options, DocumentContent, DocumentReader, Embedder, Error,
    HashingEmbedder, HeadingLevel, OutlineExtractor, OutlineOptions, PageContent, PageSelection,
    PositionedWord, ReadOptions, ReaderRegistry, Result,
};

/// A text line: font resource, size, x, baseline y, text.
type PdfLine = (&'static str, i64, i64, i64, &'static str);

const PAGE_ONE: &[PdfLine] = &[
    ("F2", 24, 72, 720, "Harbour Guide"),
    ("F2", 16, 72, 650, "1. Seafood Markets"),
    ("F1", 10, 72, 620, "Fresh fish arrives at the quay every morning."),
    ("F1", 10, 72, 606, "Stalls close at noon on most days of the week."),
    ("F1", 10, 72, 592, "Locals recommend the smoked mackerel and crab."),
    ("F1", 10, 72, 578, "Prices are lower near the end of trading."),
];

const PAGE_TWO: &[PdfLine] = &[
    ("F2", 16, 72, 720, "2. Museums"),
    ("F1", 10, 72, 690, "The maritime museum tells the story of the port."),
    ("F1", 10, 72, 676, "Entry is free on the first Sunday of each month."),
];

/// Builds a PDF with Helvetica (F1) and Helvetica-Bold (F2) text pages.
fn create_test_pdf(pages: &[&[PdfLine]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (font, size, x, y, text) in lines.iter() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![(*font).into(), (*size).into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn page_words(doc: &DocumentContent, page: usize) -> Vec<&str> {
    doc.pages[page].words.iter().map(|w| w.text.as_str()).collect()
}

#[test]
fn test_pdf_words_and_geometry() {
    let bytes = create_test_pdf(&[PAGE_ONE, PAGE_TWO]);
    let doc = PdfReader::new()
        .read_bytes(&bytes, &ReadOptions::default())
        .unwrap();

    assert_eq!(doc.page_count(), 2);
    let first = &doc.pages[0];
    assert_eq!(first.number, 1);
    assert_eq!((first.width, first.height), (612.0, 792.0));
    assert_eq!(&page_words(&doc, 0)[..2], &["Harbour", "Guide"]);

    let title = &first.words[0];
    assert_eq!(title.page, 1);
    assert_eq!(title.size, 24.0);
    assert!(title.is_bold());
    assert!((title.top - (792.0 - 720.0 - 0.8 * 24.0)).abs() < 0.01);
    assert!(first.words.iter().skip(2).all(|w| w.top > title.top));

    assert!(page_words(&doc, 1).contains(&"maritime"));
    assert!(doc.pages[1].words.iter().all(|w| w.page == 2));
}

#[test]
fn test_pdf_blocks_for_sections() {
    let bytes = create_test_pdf(&[PAGE_ONE]);
    let doc = PdfReader::new()
        .read_bytes(&bytes, &ReadOptions::default())
        .unwrap();

    let texts: Vec<String> = doc.pages[0].blocks.iter().map(|b| b.text()).collect();
    assert_eq!(texts[0], "Harbour Guide");
    assert_eq!(texts[1], "1. Seafood Markets");
    assert!(texts[2].starts_with("Fresh fish arrives at the quay every morning."));
}

#[test]
fn test_pdf_outline_end_to_end() {
    let bytes = create_test_pdf(&[PAGE_ONE, PAGE_TWO]);
    let doc = PdfReader::new()
        .read_bytes(&bytes, &ReadOptions::default())
        .unwrap();

    let embedder: Arc<dyn Embedder> = Arc::new(HashingEmbedder::new(128).unwrap());
    let outline = OutlineExtractor::new(embedder, OutlineOptions::default())
        .unwrap()
        .extract(&doc)
        .unwrap();

    assert_eq!(outline.title, "Harbour Guide");
    let headings: Vec<(HeadingLevel, &str, u32)> = outline
        .outline
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect();
    assert_eq!(
        headings,
        vec![
            (HeadingLevel::H1, "1. Seafood Markets", 1),
            (HeadingLevel::H1, "2. Museums", 2),
        ]
    );
}

#[test]
fn test_pdf_page_selection() {
    let bytes = create_test_pdf(&[PAGE_ONE, PAGE_TWO]);
    let reader = PdfReader::new();

    let options = ReadOptions::new().with_pages(PageSelection::Pages(vec![2]));
    let doc = reader.read_bytes(&bytes, &options).unwrap();
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.pages[0].number, 2);

    let options = ReadOptions::new().with_pages(PageSelection::Range(5..=9));
    assert!(matches!(
        reader.read_bytes(&bytes, &options),
        Err(Error::PageOutOfRange(5, 2))
    ));
}

#[test]
fn test_pdf_file_through_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Guide.PDF");
    fs::write(&path, create_test_pdf(&[PAGE_ONE])).unwrap();

    let doc = read_document(&path).unwrap();
    assert_eq!(doc.id, "Guide.PDF");
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_not_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.pdf");
    fs::write(&path, b"just some text").unwrap();

    assert!(read_document(&path).is_err());
}

fn layout_document() -> DocumentContent {
    let mut doc = DocumentContent::new("");
    for n in 1..=3 {
        let mut page = PageContent::letter(n);
        page.push_word(PositionedWord::new(
            format!("Page{}", n),
            0,
            100.0,
            72.0,
            12.0,
            "Helvetica",
        ));
        doc.add_page(page);
    }
    doc
}

fn write_layout(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&layout_document()).unwrap()).unwrap();
    path
}

#[test]
fn test_layout_json_through_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_layout(dir.path(), "brochure.json");

    let doc = read_document(&path).unwrap();
    assert_eq!(doc.id, "brochure.json");
    assert_eq!(doc.page_count(), 3);

    let options = ReadOptions::new().with_pages(PageSelection::parse("2-3").unwrap());
    let doc = read_document_with_options(&path, &options).unwrap();
    assert_eq!(
        doc.pages.iter().map(|p| p.number).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert_eq!(doc.pages[0].words[0].page, 2);
}

#[test]
fn test_layout_json_invalid() {
    let reader = LayoutJsonReader::new();
    assert!(matches!(
        reader.read_bytes(b"{not json", &ReadOptions::default()),
        Err(Error::Json(_))
    ));
}

/// Reader that always fails, for registry dispatch tests.
struct FailingReader;

impl DocumentReader for FailingReader {
    fn name(&self) -> &str {
        "failing"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<DocumentContent> {
        Err(Error::MissingDocument(path.display().to_string()))
    }

    fn read_bytes(&self, _bytes: &[u8], _options: &ReadOptions) -> Result<DocumentContent> {
        Err(Error::UnknownFormat)
    }
}

#[test]
fn test_registry_dispatch() {
    let mut registry = ReaderRegistry::with_defaults();
    assert!(!registry.supports("txt"));
    registry.register(Arc::new(FailingReader));

    assert!(registry.supports("TXT"));
    assert_eq!(registry.supported_extensions(), vec!["json", "pdf", "txt"]);
    assert!(matches!(
        registry.read(Path::new("notes.txt"), &ReadOptions::default()),
        Err(Error::MissingDocument(_))
    ));
    assert!(matches!(
        registry.read(Path::new("image.png"), &ReadOptions::default()),
        Err(Error::UnknownFormat)
    ));
}
