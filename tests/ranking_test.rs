//! Integration tests for persona-driven section ranking.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use pdf_outline::render::{to_json, JsonFormat};
use pdf_outline::{
    rank_collection, DocumentContent, Embedder, Error, HashingEmbedder, PageContent, RankOptions,
    RankingPipeline, RankingRequest, TextBlock, TextSpan,
};

fn embedder() -> Arc<dyn Embedder> {
    Arc::new(HashingEmbedder::new(512).unwrap())
}

fn block(text: &str, size: f32) -> TextBlock {
    TextBlock::new(vec![TextSpan::new(text, size, "Helvetica")])
}

fn guide(id: &str, sections: &[(&str, &str)]) -> DocumentContent {
    let mut doc = DocumentContent::new(id);
    for (i, (title, body)) in sections.iter().enumerate() {
        let mut page = PageContent::letter(i as u32 + 1);
        page.push_block(block(title, 16.0));
        page.push_block(block(body, 10.0));
        page.push_block(block("Opening hours vary by season and public holidays.", 10.0));
        doc.add_page(page);
    }
    doc
}

fn food_guide() -> DocumentContent {
    guide(
        "food.json",
        &[
            (
                "Seafood",
                "The best seafood restaurants line the old harbour. \
                 Book a table early for fresh oysters.",
            ),
            (
                "Bakeries",
                "Small bakeries sell bread and pastries every morning near the market square.",
            ),
        ],
    )
}

fn outdoors_guide() -> DocumentContent {
    guide(
        "outdoors.json",
        &[
            (
                "Hiking",
                "Mountain trails climb through pine forests to panoramic ridge viewpoints.",
            ),
            (
                "Cycling",
                "Bike lanes follow the river for twenty kilometres through quiet villages.",
            ),
            (
                "Kayaking",
                "Guided kayak tours explore sea caves along the rocky western cliffs.",
            ),
        ],
    )
}

const REQUEST: &str = r#"{
    "challenge_info": {"challenge_id": "round_1b_002"},
    "documents": [
        {"filename": "food.json", "title": "Food"},
        {"filename": "outdoors.json", "title": "Outdoors"},
        {"filename": "missing.pdf", "title": "Missing"}
    ],
    "persona": {"role": "Food Critic"},
    "job_to_be_done": {"task": "Find the best seafood restaurants near the harbour"}
}"#;

fn write_collection(dir: &Path) {
    let docs = dir.join("PDFs");
    fs::create_dir_all(&docs).unwrap();
    for doc in [food_guide(), outdoors_guide()] {
        fs::write(docs.join(&doc.id), serde_json::to_string(&doc).unwrap()).unwrap();
    }
    fs::write(dir.join("challenge1b_input.json"), REQUEST).unwrap();
}

#[test]
fn test_rank_collection_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_collection(dir.path());

    let result = rank_collection(
        dir.path().join("challenge1b_input.json"),
        dir.path().join("PDFs"),
        embedder(),
    )
    .unwrap();

    assert_eq!(
        result.metadata.input_documents,
        vec!["food.json", "outdoors.json", "missing.pdf"]
    );
    assert_eq!(result.metadata.persona, "Food Critic");
    assert_eq!(result.extracted_sections.len(), 5);
    assert_eq!(result.subsection_analysis.len(), 5);

    let top = &result.extracted_sections[0];
    assert_eq!(top.document, "food.json");
    assert_eq!(top.section_title, "Seafood");
    assert_eq!(top.page_number, 1);

    for (i, (section, analysis)) in result
        .extracted_sections
        .iter()
        .zip(&result.subsection_analysis)
        .enumerate()
    {
        assert_eq!(section.importance_rank, i + 1);
        assert_eq!(section.document, analysis.document);
        assert_eq!(section.page_number, analysis.page_number);
        assert!(!analysis.refined_text.is_empty());
    }
}

#[test]
fn test_top_n_limits_output() {
    let request = RankingRequest::from_json(REQUEST).unwrap();
    let pipeline = RankingPipeline::new(embedder(), RankOptions::new().with_top_n(2));

    let result = pipeline
        .rank_documents(&request, &[food_guide(), outdoors_guide()])
        .unwrap();
    assert_eq!(result.extracted_sections.len(), 2);
    assert_eq!(result.subsection_analysis.len(), 2);
}

#[test]
fn test_refined_text_keeps_document_order() {
    let request = RankingRequest::from_json(REQUEST).unwrap();
    let pipeline = RankingPipeline::new(embedder(), RankOptions::default());
    let doc = food_guide();

    let result = pipeline.rank_documents(&request, &[doc]).unwrap();
    let seafood = result
        .subsection_analysis
        .iter()
        .find(|a| a.page_number == 1)
        .unwrap();

    let source = "The best seafood restaurants line the old harbour. \
                  Book a table early for fresh oysters. \
                  Opening hours vary by season and public holidays.";
    let mut last = 0;
    for sentence in pdf_outline::rank::split_sentences(&seafood.refined_text) {
        let pos = source.find(sentence).unwrap();
        assert!(pos >= last);
        last = pos;
    }
}

#[test]
fn test_no_documents_gives_empty_result() {
    let request = RankingRequest::from_json(REQUEST).unwrap();
    let pipeline = RankingPipeline::new(embedder(), RankOptions::default());

    let result = pipeline.rank_documents(&request, &[]).unwrap();
    assert!(result.extracted_sections.is_empty());
    assert!(result.subsection_analysis.is_empty());
    assert_eq!(result.metadata.input_documents.len(), 3);
}

#[test]
fn test_invalid_request() {
    let result = RankingRequest::from_json(
        r#"{"documents": [], "persona": {"role": " "}, "job_to_be_done": {"task": "x"}}"#,
    );
    assert!(matches!(result, Err(Error::InvalidRequest(_))));

    let result = RankingRequest::from_json(r#"{"documents": []}"#);
    assert!(matches!(result, Err(Error::Json(_))));
}

#[test]
fn test_result_json_shape() {
    let request = RankingRequest::from_json(REQUEST).unwrap();
    let pipeline = RankingPipeline::new(embedder(), RankOptions::new().with_top_n(1));
    let result = pipeline.rank_documents(&request, &[food_guide()]).unwrap();

    let json = to_json(&result, JsonFormat::Pretty).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["metadata"]["processing_timestamp"].is_string());
    assert_eq!(value["metadata"]["job_to_be_done"], request.job_to_be_done.task.as_str());
    assert_eq!(value["extracted_sections"][0]["importance_rank"], 1);
    assert_eq!(value["extracted_sections"][0]["section_title"], "Seafood");
    assert!(value["subsection_analysis"][0]["refined_text"].is_string());
}
