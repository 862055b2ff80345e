//! Integration tests for sheet-lens

use sheet_lens::{
    Analyzer, CellValue, ColumnKind, DatePreference, LensError, Table, correlation_matrix,
    detect_outliers_by_column, duplicates_and_keys, histogram, missingness, profile_columns,
    tabular_quality, top_categories,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn cells(values: &[f64]) -> Vec<Vec<CellValue>> {
    values.iter().map(|&v| vec![v.into()]).collect()
}

#[test]
fn test_duplicates_and_candidate_keys() {
    let table = Table::from_rows(
        ["id", "name"],
        vec![
            vec![1.into(), "a".into()],
            vec![1.into(), "a".into()],
            vec![2.into(), "b".into()],
        ],
    );
    assert_eq!(duplicates_and_keys(&table).dup_row_count, 1);

    let table = Table::from_rows(
        ["id", "name"],
        vec![
            vec![1.into(), "x".into()],
            vec![2.into(), "y".into()],
            vec![3.into(), "x".into()],
        ],
    );
    let names: Vec<_> = duplicates_and_keys(&table)
        .candidates
        .into_iter()
        .map(|k| k.name)
        .collect();
    assert_eq!(names, vec!["id"]);
}

#[test]
fn test_missingness_all_blank_rows() {
    let table = Table::from_rows(
        ["a", "b", "c"],
        vec![
            vec![CellValue::Null, "".into(), CellValue::Null],
            vec!["".into()],
        ],
    );
    let m = missingness(&table);
    assert_eq!(m.overall, 0.0);
    assert!(m.by_column.iter().all(|c| c.rate == 0.0));
}

#[test]
fn test_heavy_tail_outliers() {
    let table = Table::from_rows(
        ["v"],
        cells(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]),
    );
    let out = &detect_outliers_by_column(&table)[0];
    assert!(out.numeric);
    assert_eq!(out.count_iqr, 1);
    assert!(out.count_z <= out.count_iqr);
}

#[test]
fn test_correlation_excludes_sparse_columns() {
    let rows: Vec<Vec<CellValue>> = (0..10)
        .map(|i| {
            let x = f64::from(i);
            let sparse = if i % 3 == 0 { CellValue::from(x) } else { "n/a".into() };
            vec![x.into(), (x * x).into(), sparse]
        })
        .collect();
    let table = Table::from_rows(["x", "x2", "sparse"], rows);
    let m = correlation_matrix(&table);
    assert_eq!(m.names, vec!["x", "x2"]);
    assert!((m.matrix[0][0] - 1.0).abs() < 1e-12);
    assert!((m.matrix[1][1] - 1.0).abs() < 1e-12);
    assert!(m.matrix[0][1] > 0.9);
}

#[test]
fn test_top_categories_example() {
    let values: Vec<CellValue> = ["a", "b", "a", "c", "b", "a"]
        .into_iter()
        .map(CellValue::from)
        .collect();
    let top = top_categories(&values, 2);
    assert_eq!(top.items.len(), 2);
    assert_eq!((top.items[0].value.as_str(), top.items[0].count), ("a", 3));
    assert_eq!((top.items[1].value.as_str(), top.items[1].count), ("b", 2));
    assert_eq!(top.items[0].pct, 0.5);
    assert!((top.items[1].pct - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_histogram_every_value_binned() {
    let xs = [0.5, 1.25, 9.75, 3.0, 3.0, 10.0, -2.0];
    let h = histogram(&xs, 6);
    assert_eq!(h.total(), xs.len());
    for &v in &xs {
        let hits = (0..h.counts.len())
            .filter(|&i| {
                let lo = h.bin_edges[i];
                if i + 1 == h.counts.len() {
                    v >= lo && v <= h.max
                } else {
                    v >= lo && v < h.bin_edges[i + 1]
                }
            })
            .count();
        assert_eq!(hits, 1, "{v}");
    }
}

#[test]
fn test_ragged_rows() {
    let table = Table::from_rows(
        ["a", "b", "c"],
        vec![vec![1.into()], vec![2.into(), 3.into(), 4.into(), 5.into()]],
    );
    let profiles = profile_columns(&table);
    assert_eq!(profiles[1].non_null_count, 1);
    assert_eq!(profiles[2].empty_rate, 0.5);
    let q = tabular_quality(&table.rows);
    assert_eq!(q.avg_row_len, 2.5);
    assert!(q.uniformity < 1.0);
}

#[test]
fn test_analyze_from_file() {
    let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(temp_file, "id,city,joined,amount").unwrap();
    for (i, city) in ["Oslo", "Rome", "Oslo", "Lima", "Oslo", "Rome"].iter().enumerate() {
        writeln!(temp_file, "{},{},2023-0{}-15,{}", i + 1, city, i + 1, (i + 1) * 10).unwrap();
    }
    writeln!(temp_file, ",,,").unwrap();
    temp_file.flush().unwrap();

    let report = Analyzer::new().analyze_path(temp_file.path()).unwrap();

    assert_eq!(report.overview.row_count, 6);
    let kinds: Vec<_> = report.profiles.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![ColumnKind::Number, ColumnKind::Text, ColumnKind::Date, ColumnKind::Number]
    );
    assert_eq!(report.correlation.names, vec!["id", "amount"]);
    assert!((report.correlation.matrix[0][1] - 1.0).abs() < 1e-12);
    let keys: Vec<_> = report.duplicates.candidates.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(keys, vec!["id", "joined", "amount"]);
    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.categories[0].top.items[0].value, "Oslo");
}

#[test]
fn test_analyze_tsv_file() {
    let mut temp_file = NamedTempFile::with_suffix(".tsv").unwrap();
    write!(temp_file, "a\tb\n1\tx\n2\ty\n").unwrap();
    temp_file.flush().unwrap();

    let table = Table::from_path(temp_file.path()).unwrap();
    assert_eq!(table.headers, vec!["a", "b"]);
    assert_eq!(table.cell(1, 1), &CellValue::from("y"));
}

#[test]
fn test_missing_file() {
    let result = Table::from_path("/definitely/not/here.csv");
    assert!(matches!(result, Err(LensError::Io(_))));
}

#[test]
fn test_empty_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let result = Analyzer::new().analyze_path(temp_file.path());
    assert!(matches!(result, Err(LensError::EmptyData)));
}

#[test]
fn test_dmy_dates() {
    let table = Table::from_csv_bytes(b"when\n01/02/2020\n03/04/2021\n", b',').unwrap();
    let mut analyzer = Analyzer::new();
    analyzer.date_preference(DatePreference::DmyFormat);
    let report = analyzer.analyze(&table).unwrap();
    assert_eq!(report.profiles[0].kind, ColumnKind::Date);
}

#[test]
fn test_report_serializes() {
    let table = Table::from_csv_bytes(b"x,y\n1,a\n2,b\n3,c\n4,d\n5,e\n", b',').unwrap();
    let report = Analyzer::new().analyze(&table).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["profiles"][0]["kind"], "number");
    assert_eq!(json["overview"]["row_count"], 5);
    assert_eq!(json["correlation"]["names"][0], "x");
    // NaN fences of the text column serialize as null
    assert!(json["outliers"][1]["low"].is_null());
}

#[test]
fn test_concurrent_calls() {
    let table = Table::from_rows(["v"], cells(&[1.0, 2.0, 3.0, 4.0, 5.0, 60.0]));
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| detect_outliers_by_column(&table)[0].count_iqr))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 1);
        }
    });
}
