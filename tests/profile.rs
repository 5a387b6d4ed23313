mod common;

use common::{date, people_table};
use csv_lens::{
    config::EdaConfig,
    dataset::profile_dataset,
    explore::Explorer,
    frame::{Column, Table},
    frequency::MISSING_LABEL,
    profile::{ColumnProfile, profile_column},
    schema::{Kind, Schema},
};

#[test]
fn people_table_profiles_each_kind() {
    let table = people_table();
    let explorer = Explorer::new(&table, EdaConfig::default());

    let age = explorer.column_profile("age").unwrap();
    let age = age.as_numeric().expect("numeric");
    assert_eq!(age.count, 3);
    assert_eq!(age.missing, 1);
    assert_eq!(age.median, Some(30.0));

    let city = explorer.column_profile("city").unwrap();
    let city = city.as_categorical().expect("categorical");
    let labels: Vec<&str> = city.frequencies.iter().map(|e| e.label()).collect();
    assert_eq!(labels, vec!["NY", "LA", MISSING_LABEL]);
    assert_eq!(city.unique_count, 3);

    let signup = explorer.column_profile("signup_date").unwrap();
    let signup = signup.as_datetime().expect("datetime");
    assert_eq!(signup.count, 3);
    assert_eq!(signup.min.unwrap().date(), date(2024, 1, 1));
    assert_eq!(signup.max.unwrap().date(), date(2024, 3, 1));
    assert_eq!(signup.sample.len(), 3);
}

#[test]
fn dataset_profile_reports_null_counts() {
    let table = people_table();
    let schema = Schema::classify(&table, &EdaConfig::default());
    let dataset = profile_dataset(&table, &schema).unwrap();
    assert_eq!(dataset.rows, 4);
    assert_eq!(dataset.columns, 3);
    let city = dataset.null_count("city").unwrap();
    assert_eq!((city.non_null, city.missing), (3, 1));
}

#[test]
fn frequency_table_truncates_to_configured_top_n() {
    let labels: Vec<String> = (0..15).map(|i| format!("v{i:02}")).collect();
    let refs: Vec<Option<&str>> = labels.iter().map(|l| Some(l.as_str())).collect();
    let column = Column::texts("code", &refs);
    let config = EdaConfig {
        frequency_top_n: 10,
        ..EdaConfig::default()
    };
    let profile = profile_column(&column, Kind::Categorical, &config);
    let profile = profile.as_categorical().unwrap();
    assert!(profile.truncated);
    assert_eq!(profile.frequencies.len(), 10);
    assert_eq!(profile.unique_count, 15);
    assert_eq!(profile.frequencies[0].label(), "v00");
}

#[test]
fn datetime_sample_is_capped() {
    let days: Vec<_> = (1..=20).rev().map(|d| Some(date(2024, 5, d))).collect();
    let column = Column::dates("day", &days);
    let profile = profile_column(&column, Kind::Datetime, &EdaConfig::default());
    let profile = profile.as_datetime().unwrap();
    assert_eq!(profile.sample.len(), 10);
    assert_eq!(profile.sample[0].date(), date(2024, 5, 1));
    assert_eq!(profile.sample[9].date(), date(2024, 5, 10));
}

#[test]
fn boolean_columns_profile_as_categories() {
    let table = Table::new(vec![Column::booleans(
        "active",
        &[Some(true), Some(false), Some(true), None],
    )])
    .unwrap();
    let explorer = Explorer::new(&table, EdaConfig::default());
    let analysis = explorer.analyze("active").unwrap();
    assert_eq!(analysis.column.kind, Kind::Boolean);
    match analysis.profile {
        ColumnProfile::Categorical(profile) => {
            assert_eq!(profile.kind, Kind::Boolean);
            assert_eq!(profile.top(), Some("true"));
            let total: usize = profile.frequencies.iter().map(|e| e.count).sum();
            assert_eq!(total, 4);
        }
        other => panic!("unexpected profile {other:?}"),
    }
}
