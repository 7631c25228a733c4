//! End-to-end evaluation tests against the mock store.
//!
//! Tests record loading, scoring, the mismatch log and the report together.

use std::io::Write;

use mql_eval::db::{MockDocumentStore, MockResponse};
use mql_eval::eval::{
    load_records, EvaluationReport, Evaluator, MismatchLog, QueryRecord, ReportFormat,
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

const GOLD_SINGERS: &str = "db.singer.find({}, {name: 1, _id: 0})";
const PRED_SINGERS: &str = "db.singer.find({}, {_id: 0, name: 1}).sort({name: -1})";

/// Writes a predictions file and returns its handle.
fn predictions_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn log_text(log: MismatchLog<Vec<u8>>) -> String {
    String::from_utf8(log.into_inner()).unwrap()
}

#[tokio::test]
async fn test_reordered_documents_count_as_correct() {
    let file = predictions_file(&format!(
        r#"[{{
            "question_id": 1,
            "db_id": "concert_singer",
            "gold_mql": "{GOLD_SINGERS}",
            "generated_mql": "{PRED_SINGERS}"
        }}]"#
    ));
    let store = MockDocumentStore::new()
        .with_output("concert_singer", GOLD_SINGERS, r#"[{"x":1},{"x":2}]"#)
        .with_output("concert_singer", PRED_SINGERS, r#"[{"x":2},{"x":1}]"#);

    let records = load_records(file.path()).unwrap();
    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 1)
        .run(&records, &mut log)
        .await
        .unwrap();

    assert_eq!(score.total, 1);
    assert_eq!(score.correct, 1);
    assert_eq!(score.errors, 0);
    assert_eq!(score.accuracy(), 100.0);
    assert_eq!(log_text(log), "");
}

#[tokio::test]
async fn test_predicted_backend_error_counts_as_error_not_incorrect() {
    let records = vec![QueryRecord {
        id: "q-err".into(),
        database: Some("pets_1".to_string()),
        gold: Some("db.pets.countDocuments()".to_string()),
        predicted: Some("db.pets.aggregate([{$cnt: 1}])".to_string()),
    }];
    let store = MockDocumentStore::new()
        .with_output("pets_1", "db.pets.countDocuments()", "3")
        .with_error(
            "pets_1",
            "db.pets.aggregate([{$cnt: 1}])",
            "MongoServerError: Unrecognized pipeline stage name: '$cnt'",
        );

    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 1)
        .run(&records, &mut log)
        .await
        .unwrap();

    assert_eq!(score.total, 1);
    assert_eq!(score.errors, 1);
    assert_eq!(score.correct, 0);
    assert_eq!(score.incorrect(), 0);

    let text = log_text(log);
    assert!(text.contains("[ID: q-err] EXECUTION ERROR"));
    assert!(text.contains("Query: db.pets.aggregate([{$cnt: 1}])"));
    assert!(text.contains("Unrecognized pipeline stage name"));
}

#[tokio::test]
async fn test_zero_records_report_zero_accuracy() {
    let file = predictions_file("[]");
    let store = MockDocumentStore::new();

    let records = load_records(file.path()).unwrap();
    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 1)
        .run(&records, &mut log)
        .await
        .unwrap();

    let report = EvaluationReport::from(score);
    assert_eq!(report.total, 0);
    assert_eq!(report.accuracy, 0.0);
    assert!(report
        .render(ReportFormat::Text)
        .unwrap()
        .contains("ACCURACY:    0.00%"));
}

#[tokio::test]
async fn test_denylist_applies_to_both_sides_independently() {
    let records = vec![
        QueryRecord {
            id: 1.into(),
            database: Some("db".to_string()),
            gold: Some("db.a.DROP()".to_string()),
            predicted: Some("db.a.countDocuments()".to_string()),
        },
        QueryRecord {
            id: 2.into(),
            database: Some("db".to_string()),
            gold: Some("db.a.countDocuments()".to_string()),
            predicted: Some("db.a.Drop()".to_string()),
        },
    ];
    let store = MockDocumentStore::new().with_output("db", "db.a.countDocuments()", "4");

    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 1)
        .run(&records, &mut log)
        .await
        .unwrap();

    // Only the allowed query of each record reached the backend
    assert_eq!(
        store.calls(),
        vec![
            ("db".to_string(), "db.a.countDocuments()".to_string()),
            ("db".to_string(), "db.a.countDocuments()".to_string()),
        ]
    );

    // Rejected gold: mismatch. Rejected prediction: execution error.
    assert_eq!(score.total, 2);
    assert_eq!(score.incorrect(), 1);
    assert_eq!(score.errors, 1);

    let text = log_text(log);
    assert!(text.contains("[ID: 1] MISMATCH"));
    assert!(text.contains("Gold Res: UNSAFE_OR_EMPTY: contains forbidden keyword 'drop'..."));
    assert!(text.contains("[ID: 2] EXECUTION ERROR"));
}

#[tokio::test]
async fn test_missing_fields_are_rejected_as_empty() {
    let file = predictions_file(r#"[{"question_id": 9, "db_id": "db", "gold_mql": "g"}]"#);
    let store = MockDocumentStore::new().with_output("db", "g", "1");

    let records = load_records(file.path()).unwrap();
    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 1)
        .run(&records, &mut log)
        .await
        .unwrap();

    assert_eq!(score.errors, 1);
    let text = log_text(log);
    assert!(text.contains("Query: <missing>"));
    assert!(text.contains("Error: UNSAFE_OR_EMPTY: empty query"));
}

#[tokio::test]
async fn test_mixed_batch_scores_and_logs_in_order() {
    let records: Vec<QueryRecord> = (1..=6)
        .map(|i| QueryRecord {
            id: i.into(),
            database: Some("flights".to_string()),
            gold: Some(format!("gold{i}")),
            predicted: Some(format!("pred{i}")),
        })
        .collect();

    let store = MockDocumentStore::new()
        // 1: scalar, int vs float
        .with_output("flights", "gold1", "12")
        .with_output("flights", "pred1", "12.0")
        // 2: different counts
        .with_output("flights", "gold2", "12")
        .with_output("flights", "pred2", "13")
        // 3: shape mismatch
        .with_output("flights", "gold3", "2")
        .with_output("flights", "pred3", r#"[{"count": 2}]"#)
        // 4: undecodable prediction
        .with_output("flights", "gold4", "[]")
        .with_output("flights", "pred4", "undefined")
        // 5: unreachable backend for the prediction
        .with_output("flights", "gold5", "[]")
        .with_response(
            "flights",
            "pred5",
            MockResponse::Unavailable("connect ECONNREFUSED".into()),
        )
        // 6: nested documents, reordered keys and rows
        .with_output(
            "flights",
            "gold6",
            r#"[{"a": {"x": 1, "y": 2}}, {"a": {"x": 3, "y": 4}}]"#,
        )
        .with_output(
            "flights",
            "pred6",
            r#"[{"a": {"y": 4, "x": 3}}, {"a": {"y": 2, "x": 1}}]"#,
        );

    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 3)
        .run(&records, &mut log)
        .await
        .unwrap();

    assert_eq!(score.total, 6);
    assert_eq!(score.correct, 2);
    assert_eq!(score.incorrect(), 2);
    assert_eq!(score.errors, 2);

    let text = log_text(log);
    let positions: Vec<usize> = [
        "[ID: 2] MISMATCH",
        "[ID: 3] MISMATCH",
        "[ID: 4] EXECUTION ERROR",
        "[ID: 5] EXECUTION ERROR",
    ]
    .iter()
    .map(|needle| text.find(needle).unwrap())
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(text.contains("Error: JSON_PARSE_ERROR: "));
    assert!(text.contains("Error: BACKEND_UNAVAILABLE: connect ECONNREFUSED"));
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential_run() {
    let records: Vec<QueryRecord> = (0..20)
        .map(|i| QueryRecord {
            id: i.into(),
            database: Some("db".to_string()),
            gold: Some(format!("g{i}")),
            predicted: Some(format!("p{i}")),
        })
        .collect();

    let store = (0..20).fold(MockDocumentStore::new(), |store, i| {
        let predicted = if i % 3 == 0 { i + 1 } else { i };
        store
            .with_output("db", format!("g{i}"), i.to_string())
            .with_output("db", format!("p{i}"), predicted.to_string())
    });

    let mut sequential_log = MismatchLog::new(Vec::new(), 100);
    let sequential = Evaluator::new(&store, 1)
        .run(&records, &mut sequential_log)
        .await
        .unwrap();

    let mut concurrent_log = MismatchLog::new(Vec::new(), 100);
    let concurrent = Evaluator::new(&store, 8)
        .run(&records, &mut concurrent_log)
        .await
        .unwrap();

    assert_eq!(sequential, concurrent);
    assert_eq!(sequential.correct, 13);
    assert_eq!(log_text(sequential_log), log_text(concurrent_log));
}

#[tokio::test]
async fn test_boolean_results_score_like_numbers() {
    let records: Vec<QueryRecord> = ["p1", "p2", "p3"]
        .iter()
        .enumerate()
        .map(|(i, predicted)| QueryRecord {
            id: i.into(),
            database: Some("shop".to_string()),
            gold: Some(format!("g{}", i + 1)),
            predicted: Some(predicted.to_string()),
        })
        .collect();

    let store = MockDocumentStore::new()
        // hasNext() against hasNext()
        .with_output("shop", "g1", "true")
        .with_output("shop", "p1", "true")
        // empty check against a count
        .with_output("shop", "g2", "false")
        .with_output("shop", "p2", "0")
        .with_output("shop", "g3", "true")
        .with_output("shop", "p3", "false");

    let mut log = MismatchLog::new(Vec::new(), 100);
    let score = Evaluator::new(&store, 1)
        .run(&records, &mut log)
        .await
        .unwrap();

    assert_eq!(score.total, 3);
    assert_eq!(score.correct, 2);
    assert_eq!(score.incorrect(), 1);

    let text = log_text(log);
    assert!(text.contains("Gold Res: true...\nPred Res: false...\n"));
}
