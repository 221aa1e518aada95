//! Tests for expression filtering and cohort selection

use sample_match::algorithm::cohort::{self, CohortConfig, Role};
use sample_match::filter::{Expr, LiteralValue, parse_query_lines};
use sample_match::metadata::MetadataTable;

fn study_table() -> MetadataTable {
    MetadataTable::new(
        vec![
            "id".into(),
            "status".into(),
            "sex".into(),
            "age".into(),
        ],
        vec![
            vec!["s1".into(), "sick".into(), "F".into(), "34".into()],
            vec!["s2".into(), "healthy".into(), "F".into(), "36".into()],
            vec!["s3".into(), "sick".into(), "M".into(), "51".into()],
            vec!["s4".into(), "healthy".into(), "M".into(), "49".into()],
            vec!["s5".into(), "healthy".into(), "F".into(), "NA".into()],
            vec!["s6".into(), "withdrawn".into(), "F".into(), "40".into()],
        ],
    )
    .unwrap()
}

#[test]
fn keep_filter_drops_non_matching_rows() {
    let table = study_table();
    let keep = parse_query_lines(["status != withdrawn"]).unwrap();
    let kept = cohort::apply_keep(&table, &keep).unwrap();
    assert_eq!(kept.len(), 5);
    assert!(kept.row_index("s6").is_none());
}

#[test]
fn keep_filter_with_no_survivors_is_an_error() {
    let table = study_table();
    let keep = Expr::Eq("status".into(), LiteralValue::String("unknown".into()));
    assert!(cohort::apply_keep(&table, &keep).is_err());
}

#[test]
fn roles_follow_case_and_control_queries() {
    let table = study_table();
    let case = parse_query_lines(["status = sick"]).unwrap();
    let control = parse_query_lines(["status = healthy"]).unwrap();
    let roles = cohort::label_roles(&table, &case, &control).unwrap();
    assert_eq!(
        roles,
        vec![
            Role::Case,
            Role::Control,
            Role::Case,
            Role::Control,
            Role::Control,
            Role::Excluded,
        ]
    );
}

#[test]
fn control_label_wins_when_queries_overlap() {
    let table = study_table();
    // Every sick sample also satisfies the control query here
    let case = parse_query_lines(["status = sick"]).unwrap();
    let control = parse_query_lines(["sex = M"]).unwrap();
    let roles = cohort::label_roles(&table, &case, &control).unwrap();
    assert_eq!(roles[2], Role::Control);
    assert_eq!(roles[0], Role::Case);
}

#[test]
fn missing_covariates_drop_rows_of_any_role() {
    let table = study_table();
    let roles = vec![
        Role::Case,
        Role::Control,
        Role::Case,
        Role::Control,
        Role::Control,
        Role::Excluded,
    ];
    let (kept, kept_roles) = cohort::drop_missing(
        &table,
        &roles,
        &["age".to_string()],
        &["NA".to_string(), "".to_string()],
    )
    .unwrap();
    assert_eq!(kept.len(), 5);
    assert!(kept.row_index("s5").is_none());
    assert_eq!(kept_roles.len(), 5);
    assert_eq!(kept_roles[4], Role::Excluded);
}

#[test]
fn drop_missing_requires_known_columns() {
    let table = study_table();
    let roles = vec![Role::Excluded; table.len()];
    let result = cohort::drop_missing(&table, &roles, &["weight".to_string()], &["NA".to_string()]);
    assert!(result.is_err());
}

#[test]
fn build_cohort_runs_the_full_pipeline() {
    let table = study_table();
    let config = CohortConfig {
        keep: Some(parse_query_lines(["status != withdrawn"]).unwrap()),
        case: parse_query_lines(["status = sick"]).unwrap(),
        control: parse_query_lines(["status = healthy"]).unwrap(),
        null_values: vec!["NA".to_string()],
    };
    let (cohort_table, roles) =
        cohort::build_cohort(&table, &config, &["age".to_string()]).unwrap();

    // s6 fails the keep filter, s5 has a missing age
    assert_eq!(cohort_table.len(), 4);
    assert_eq!(
        roles,
        vec![Role::Case, Role::Control, Role::Case, Role::Control]
    );
}

#[test]
fn role_column_is_written_back() {
    let table = study_table();
    let mut annotated = table.clone();
    let roles = vec![
        Role::Case,
        Role::Control,
        Role::Case,
        Role::Control,
        Role::Control,
        Role::Excluded,
    ];
    cohort::apply_roles(&mut annotated, &roles).unwrap();
    assert_eq!(annotated.value(0, "case_control").unwrap(), "case");
    assert_eq!(annotated.value(4, "case_control").unwrap(), "control");
    assert_eq!(annotated.value(5, "case_control").unwrap(), "excluded");
}
