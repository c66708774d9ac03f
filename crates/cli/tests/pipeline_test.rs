//! Integration tests for the CLI pipelines, driven through files on disk

use pretty_assertions::assert_eq;
use rankdup::duplicates::{build_shingle_file, detection, exact_duplicates, near_duplicates};
use rankdup::evaluation::{evaluate_runs, grade_engines, top_per_dataset};
use rankdup::report::grade_report;
use rankdup::Config;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

/// One dataset with two runs whose rankings differ only in quality
fn evaluation_fixture(dir: &TempDir) -> Config {
    let queries = write(
        dir.path(),
        "queries.tsv",
        "Query_ID\tQuery\n1\tfirst\n2\tsecond\n3\tunjudged\n",
    );
    let ground_truth = write(
        dir.path(),
        "gt.tsv",
        "Query_id\tRelevant_Doc_id\n1\t10\n1\t11\n2\t20\n",
    );
    let good = write(
        dir.path(),
        "good.tsv",
        "Query_ID\tDoc_ID\tRank\n1\t10\t1\n1\t11\t2\n2\t20\t1\n3\t99\t1\n",
    );
    let poor = write(
        dir.path(),
        "poor.tsv",
        "Query_ID\tDoc_ID\tRank\n1\t10\t2\n1\t5\t1\n2\t7\t1\n2\t20\t3\n2\t8\t2\n",
    );

    let toml = format!(
        r#"
        [evaluation]
        k_values = [1, 3]
        top_n = 1

        [datasets.small]
        queries = "{queries}"
        ground_truth = "{ground_truth}"

        [[runs]]
        dataset = "small"
        analyzer = "standard"
        scoring = "tfidf"
        results = "{poor}"

        [[runs]]
        dataset = "small"
        analyzer = "stemming"
        scoring = "bm25f"
        b = 0.8
        results = "{good}"
        "#
    );
    let config = Config::from_toml_str(&toml).unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn test_evaluate_runs_and_rank() {
    let dir = TempDir::new().unwrap();
    let config = evaluation_fixture(&dir);

    let records = evaluate_runs(&config, None).unwrap();
    assert_eq!(records.len(), 2);

    // poor: q0 first hit at rank 2, q1 at rank 3
    assert!((records[0].mrr() - (0.5 + 1.0 / 3.0) / 2.0).abs() < 1e-9);
    assert!((records[1].mrr() - 1.0).abs() < 1e-9);
    assert_eq!(records[1].queries(), 2);

    let top = top_per_dataset(&records, config.evaluation.top_n);
    assert_eq!(top["small"].len(), 1);
    assert_eq!(top["small"][0].label().to_string(), "stemming-bm25f(0.8,1.2)");
}

#[test]
fn test_evaluate_counts_unanswered_queries_as_misses() {
    let dir = TempDir::new().unwrap();
    let queries = write(dir.path(), "queries.tsv", "Query_ID\tQuery\n1\tfirst\n2\tsecond\n");
    let ground_truth = write(
        dir.path(),
        "gt.tsv",
        "Query_id\tRelevant_Doc_id\n1\t10\n2\t20\n",
    );
    // query 2 returned nothing and is absent from the file
    let sparse = write(dir.path(), "sparse.tsv", "Query_ID\tDoc_ID\tRank\n1\t10\t1\n");

    let toml = format!(
        r#"
        [evaluation]
        k_values = [1]

        [datasets.small]
        queries = "{queries}"
        ground_truth = "{ground_truth}"

        [[runs]]
        dataset = "small"
        analyzer = "standard"
        scoring = "frequency"
        results = "{sparse}"
        "#
    );
    let config = Config::from_toml_str(&toml).unwrap();

    let records = evaluate_runs(&config, None).unwrap();
    assert_eq!(records[0].queries(), 2);
    assert!((records[0].mrr() - 0.5).abs() < 1e-9);
}

#[test]
fn test_evaluate_unknown_dataset() {
    let dir = TempDir::new().unwrap();
    let config = evaluation_fixture(&dir);

    let err = evaluate_runs(&config, Some("missing")).unwrap_err();
    assert!(err.to_string().contains("Unknown dataset 'missing'"));
}

#[test]
fn test_grade_engines() {
    let dir = TempDir::new().unwrap();
    // zero-based ids, as produced by the engines being graded
    let gt = write(
        dir.path(),
        "Ground_Truth.tsv",
        "Query_id\tRelevant_Doc_id\n0\t1\n0\t2\n1\t3\n",
    );
    let se_1 = write(
        dir.path(),
        "SE_1.tsv",
        "Query_ID\tDoc_ID\tRank\n0\t1\t1\n0\t9\t2\n1\t3\t1\n5\t4\t1\n",
    );
    let se_2 = write(
        dir.path(),
        "SE_2.tsv",
        "Query_ID\tDoc_ID\tRank\n0\t8\t1\n0\t9\t2\n1\t7\t1\n",
    );

    let config = Config::default();
    let grades =
        grade_engines(Path::new(&gt), &[se_1.into(), se_2.into()], &config.grading).unwrap();

    assert_eq!(grades.len(), 2);
    assert_eq!(grades[0].name, "SE_1");
    // k=4 clamps to |G|: q0 1/2, q1 1/1
    assert!((grades[0].precision.mean - 0.75).abs() < 1e-9);
    assert!((grades[0].recall.mean - 0.75).abs() < 1e-9);
    assert!(grades[0].mean_f_score.is_some());
    assert_eq!(grades[1].mean_f_score, None);

    let report = grade_report(&grades, config.grading.k);
    assert!(report.contains("Precision at 4"));
    assert!(report.contains("SE_2\tundefined"));
}

#[test]
fn test_duplicate_pipeline() {
    let dir = TempDir::new().unwrap();
    let corpus = write(
        dir.path(),
        "songs.csv",
        "index,song,year,artist,genre,lyrics\n\
         0,a,2009,x,Pop,\"She loves you yeah yeah yeah\"\n\
         1,b,2009,x,Pop,\"She loves you, yeah, yeah, yeah!\"\n\
         2,c,2009,x,Pop,\"Here comes the sun again\"\n",
    );
    let shingles = dir.path().join("shingles.tsv");
    let config = Config::default();

    let rows =
        build_shingle_file(Path::new(&corpus), &shingles, &config.corpus, &config.shingling)
            .unwrap();
    assert_eq!(rows, 3);

    let exact = dir.path().join("exact_duplicates.tsv");
    assert_eq!(exact_duplicates(&shingles, Some(&exact)).unwrap(), 1);
    assert_eq!(
        fs::read_to_string(&exact).unwrap(),
        "id_set_1\tid_set_2\nid_0\tid_1\n"
    );

    let brute_force = dir.path().join("BRUTE_FORCE_near_duplicates.tsv");
    assert_eq!(near_duplicates(&shingles, 0.8, &brute_force).unwrap(), 1);

    let predicted = write(
        dir.path(),
        "PRED_near_duplicates.tsv",
        "jaccard\tid_1\tname_1\tid_2\tname_2\n1.0\tid_1\t\tid_0\t\n0.9\tid_2\t\tid_0\t\n",
    );
    let report = detection(&brute_force, Path::new(&predicted)).unwrap();
    assert_eq!(report.detection_probability, 1.0);
    assert_eq!(report.false_positives, 1);
    assert_eq!(report.false_negatives, 0);
}
