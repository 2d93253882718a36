use assert_approx_eq::assert_approx_eq;

use csv_eda_analyzer::{
    analysis::{describe, DescribeMode, StatValue, Statistic, SummaryReport},
    config::EdaConfig,
    error::EdaError,
    io::{self, ReportWriter},
    models::{DType, Dataset},
    pipeline,
    visualization::BoxplotRenderer,
    Analyzer,
};

fn load(data: &str) -> Dataset {
    io::read_csv_from_bytes(data.as_bytes(), "test").unwrap()
}

fn mixed_dataset() -> Dataset {
    load(
        "id,score,grade,passed,taken\n\
         1,88.5,B,true,2024-01-05\n\
         2,92.0,A,true,2024-01-06\n\
         3,NA,C,false,2024-01-07\n\
         4,75.25,B,,2024-01-08\n\
         4,75.25,B,,2024-01-08\n",
    )
}

#[test]
fn test_dtype_inference() {
    let ds = mixed_dataset();
    let dtypes: Vec<DType> = ds.columns().iter().map(|c| c.dtype).collect();
    assert_eq!(
        dtypes,
        vec![
            DType::Int64,
            DType::Float64,
            DType::Object,
            DType::Object,
            DType::Datetime
        ]
    );
    assert_eq!(ds.numeric_columns().len(), 2);
}

#[test]
fn test_summary_report_views() {
    let ds = mixed_dataset();
    let report = SummaryReport::compute(&ds).unwrap();

    assert_eq!(report.shape, (5, 5));
    assert_eq!(report.duplicate_rows, 1);

    let score = report.missing.iter().find(|m| m.column == "score").unwrap();
    assert_eq!(score.missing_count, 1);
    assert_approx_eq!(score.missing_pct, 20.0);

    let passed = report.missing.iter().find(|m| m.column == "passed").unwrap();
    assert_eq!(passed.missing_count, 2);

    assert_eq!(report.unique.len(), ds.num_columns());
    let grade = report.unique.iter().find(|u| u.column == "grade").unwrap();
    assert_eq!(grade.unique_count, 3);
}

#[test]
fn test_describe_numeric_one_to_five() {
    let ds = load("x\n1\n2\n3\n4\n5\n");
    let table = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap();

    assert_eq!(table.get("x", Statistic::Count), Some(&StatValue::Number(5.0)));
    assert_approx_eq!(table.get("x", Statistic::Mean).unwrap().as_f64().unwrap(), 3.0);
    assert_approx_eq!(table.get("x", Statistic::Min).unwrap().as_f64().unwrap(), 1.0);
    assert_approx_eq!(table.get("x", Statistic::Max).unwrap().as_f64().unwrap(), 5.0);
    assert_approx_eq!(
        table.get("x", Statistic::Std).unwrap().as_f64().unwrap(),
        1.5811388300841898
    );
}

#[test]
fn test_describe_categorical_top_and_freq() {
    let ds = load("color\nred\nblue\nred\n");
    let table = describe(&ds, DescribeMode::Basic).unwrap();
    assert_eq!(
        table.get("color", Statistic::Top),
        Some(&StatValue::Text("red".to_string()))
    );
    assert_eq!(table.get("color", Statistic::Freq), Some(&StatValue::Integer(2)));
    assert_eq!(table.get("color", Statistic::Unique), Some(&StatValue::Integer(2)));
}

#[test]
fn test_describe_falls_back_for_mixed_timezones() {
    let ds = load("when\n2024-01-01 10:00:00+02:00\n2024-01-02 11:00:00\n");
    assert_eq!(ds.columns()[0].dtype, DType::Datetime);

    let err = describe(&ds, DescribeMode::DatetimeAsNumeric).unwrap_err();
    assert!(matches!(err, EdaError::Unsupported(_)));

    let (table, mode) = Analyzer::new(&ds).describe().unwrap();
    assert_eq!(mode, DescribeMode::Basic);
    assert_eq!(table.get("when", Statistic::Count), Some(&StatValue::Integer(2)));
}

#[test]
fn test_correlation_matrix() {
    let ds = load("a,b,c,k\n1,2,5,7\n2,4,4,7\n3,6,3,7\n4,8,1,7\n");
    let corr = Analyzer::new(&ds).correlation();

    assert_eq!(corr.len(), 4);
    assert_approx_eq!(corr.get("a", "b").unwrap(), 1.0);
    assert!(corr.get("a", "c").unwrap() < -0.9);
    assert!(corr.get("a", "k").unwrap().is_nan());
    assert!(corr.get("k", "k").unwrap().is_nan());
    assert_approx_eq!(corr.get("a", "a").unwrap(), 1.0);
}

#[test]
fn test_histograms_and_box_stats() {
    let ds = load("v,w\n1,10\n2,10\n3,10\n4,10\n100,10\n");
    let analyzer = Analyzer::new(&ds);

    let hists = analyzer.histograms(30);
    assert_eq!(hists.len(), 2);
    assert!(hists.iter().all(|h| h.counts.len() == 30 && h.total() == 5));

    let boxes = analyzer.box_stats();
    let v = boxes.iter().find(|b| b.column == "v").unwrap();
    assert_eq!(v.outliers, vec![100.0]);
    assert_approx_eq!(v.median, 3.0);
}

#[test]
fn test_report_writer_round_trip_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let ds = mixed_dataset();
    let report = SummaryReport::compute(&ds).unwrap();
    ReportWriter::new(dir.path()).write_all(&report).unwrap();

    let dtypes = std::fs::read_to_string(dir.path().join(io::DTYPES_FILE)).unwrap();
    assert_eq!(
        dtypes,
        ",dtype\nid,int64\nscore,float64\ngrade,object\npassed,object\ntaken,datetime64[ns]\n"
    );
    let dups = std::fs::read_to_string(dir.path().join(io::DUPLICATES_FILE)).unwrap();
    assert_eq!(dups, "Duplicate rows: 1\n");
}

#[test]
fn test_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scores.csv");
    std::fs::write(
        &input,
        "id,score,grade\n1,88.5,B\n2,92.0,A\n3,70.0,C\n4,75.25,B\n5,99.0,A\n",
    )
    .unwrap();

    let mut config = EdaConfig {
        input,
        output_dir: dir.path().join("out"),
        ..EdaConfig::default()
    };
    config.plots.dpi = 40;

    let summary = pipeline::run(&config).unwrap();
    assert!(!summary.plots_skipped);
    assert_eq!(summary.artifacts.len(), 8);
    assert!(matches!(
        summary.boxplot_renderer,
        Some(BoxplotRenderer::Native | BoxplotRenderer::Manual)
    ));
    for path in &summary.artifacts {
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }
}

#[test]
fn test_pipeline_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = EdaConfig {
        input: dir.path().join("nope.csv"),
        output_dir: dir.path().join("out"),
        ..EdaConfig::default()
    };
    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, EdaError::InputNotFound(_)));
    assert!(!dir.path().join("out").exists());
}
