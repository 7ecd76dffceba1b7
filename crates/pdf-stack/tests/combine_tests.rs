use lopdf::{Dictionary, Document, Object, Stream};
use pdf_stack::constants::DEFAULT_OUTPUT_SUFFIX;
use pdf_stack::*;
use std::sync::{Arc, Mutex};

fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    // Create pages array
    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // Create pages dict
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    // Create catalog
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

fn pdf_bytes(num_pages: usize) -> Vec<u8> {
    let mut writer = Vec::new();
    create_test_pdf(num_pages).save_to(&mut writer).unwrap();
    writer
}

#[test]
fn test_combine_bytes() {
    let result = combine_bytes(&pdf_bytes(10), &CombineOptions::default(), |_, _| {}).unwrap();
    assert_eq!(result.pair_count, 4);
    assert!(result.elapsed_seconds() >= 0.0);

    let output = Document::load_mem(&result.bytes).unwrap();
    assert_eq!(output.get_pages().len(), 4);
}

#[test]
fn test_combine_corrupt_bytes() {
    let result = combine_bytes(b"not a pdf at all", &CombineOptions::default(), |_, _| {});
    match result {
        Err(StackError::SourceUnreadable(_)) => {}
        _ => panic!("Expected SourceUnreadable error"),
    }
}

#[test]
fn test_combine_zero_pages() {
    let result = combine_bytes(&pdf_bytes(0), &CombineOptions::default(), |_, _| {});
    match result {
        Err(StackError::SourceUnreadable(msg)) => assert!(msg.contains("no pages")),
        _ => panic!("Expected SourceUnreadable error"),
    }
}

#[test]
fn test_combine_two_pages_is_empty_output() {
    let result = combine_bytes(&pdf_bytes(2), &CombineOptions::default(), |_, _| {}).unwrap();
    assert_eq!(result.pair_count, 0);
    let output = Document::load_mem(&result.bytes).unwrap();
    assert_eq!(output.get_pages().len(), 0);
}

#[test]
fn test_combine_rejects_invalid_options() {
    let options = CombineOptions {
        progress_interval: 0,
        ..Default::default()
    };
    let result = combine_bytes(&pdf_bytes(4), &options, |_, _| {});
    match result {
        Err(StackError::Config(_)) => {}
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_batch_isolation() {
    let inputs = vec![pdf_bytes(8), b"garbage bytes".to_vec(), pdf_bytes(5)];
    let options = CombineOptions::default();

    let results: Vec<_> = inputs
        .iter()
        .map(|bytes| combine_bytes(bytes, &options, |_, _| {}))
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 2);
    assert!(matches!(results[1], Err(StackError::SourceUnreadable(_))));
    assert_eq!(results[0].as_ref().unwrap().pair_count, 4);
    assert_eq!(results[2].as_ref().unwrap().pair_count, 2);
}

#[tokio::test]
async fn test_combine_pdf_async() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let result = combine_pdf(pdf_bytes(12), &CombineOptions::default(), move |done, total| {
        sink.lock().unwrap().push((done, total));
    })
    .await
    .unwrap();

    assert_eq!(result.pair_count, 6);
    assert_eq!(*seen.lock().unwrap(), vec![(1, 6), (5, 6), (6, 6)]);
}

#[tokio::test]
async fn test_load_and_save_bytes() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let input = dir.path().join("scan.pdf");
    std::fs::write(&input, pdf_bytes(4)).unwrap();

    let bytes = load_pdf_bytes(&input).await.unwrap();
    let result = combine_pdf(bytes, &CombineOptions::default(), |_, _| {})
        .await
        .unwrap();

    let output = dir
        .path()
        .join(output_file_name(&input, DEFAULT_OUTPUT_SUFFIX));
    save_pdf_bytes(&result.bytes, &output).await.unwrap();

    assert!(output.ends_with("scan_Combinado.pdf"));
    let loaded = Document::load(&output).unwrap();
    assert_eq!(loaded.get_pages().len(), 2);
}

#[tokio::test]
async fn test_load_missing_file() {
    let result = load_pdf_bytes("/nonexistent/definitely/missing.pdf").await;
    assert!(matches!(result, Err(StackError::Io(_))));
}

#[test]
fn test_output_file_name() {
    assert_eq!(
        output_file_name("report.pdf", "_Combinado"),
        "report_Combinado.pdf"
    );
    assert_eq!(
        output_file_name("/tmp/in/scan.v2.pdf", "_Combinado"),
        "scan.v2_Combinado.pdf"
    );
    assert_eq!(output_file_name("notes", "_x"), "notes_x.pdf");
}
