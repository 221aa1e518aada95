//! Tests for metadata TSV loading and saving

use std::fs;
use std::path::PathBuf;

use sample_match::metadata::{load_metadata, save_metadata};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sample_match_{}_{name}", std::process::id()))
}

#[test]
fn loads_tab_separated_metadata() {
    let path = scratch_path("load.tsv");
    fs::write(
        &path,
        "#SampleID\tsex\tage\ns1\tF\t34\ns2\tM\t40\n",
    )
    .unwrap();

    let table = load_metadata(&path).unwrap();
    assert_eq!(table.id_header(), "#SampleID");
    assert_eq!(table.ids(), ["s1", "s2"]);
    assert_eq!(table.value(1, "age").unwrap(), "40");

    fs::remove_file(&path).unwrap();
}

#[test]
fn skips_embedded_comment_rows() {
    let path = scratch_path("comments.tsv");
    fs::write(
        &path,
        "id\tsex\n#q2:types\tcategorical\ns1\tF\ns2\tM\n",
    )
    .unwrap();

    let table = load_metadata(&path).unwrap();
    assert_eq!(table.ids(), ["s1", "s2"]);

    fs::remove_file(&path).unwrap();
}

#[test]
fn ragged_rows_are_rejected() {
    let path = scratch_path("ragged.tsv");
    fs::write(&path, "id\tsex\tage\ns1\tF\n").unwrap();

    assert!(load_metadata(&path).is_err());

    fs::remove_file(&path).unwrap();
}

#[test]
fn duplicate_ids_are_rejected() {
    let path = scratch_path("dup.tsv");
    fs::write(&path, "id\tsex\ns1\tF\ns1\tM\n").unwrap();

    assert!(load_metadata(&path).is_err());

    fs::remove_file(&path).unwrap();
}

#[test]
fn save_and_reload_round_trips() {
    let in_path = scratch_path("roundtrip_in.tsv");
    let out_path = scratch_path("roundtrip_out.tsv");
    fs::write(
        &in_path,
        "id\tsex\tage\ns1\tF\t34\ns2\tM\t40\ns3\tF\t29\n",
    )
    .unwrap();

    let mut table = load_metadata(&in_path).unwrap();
    table
        .add_column(
            "matched_to",
            vec!["s2".into(), "s1".into(), "0".into()],
        )
        .unwrap();
    save_metadata(&out_path, &table).unwrap();

    let reloaded = load_metadata(&out_path).unwrap();
    assert_eq!(reloaded.ids(), table.ids());
    assert_eq!(
        reloaded.columns(),
        ["sex", "age", "matched_to"]
    );
    assert_eq!(reloaded.value(0, "matched_to").unwrap(), "s2");
    assert_eq!(reloaded.value(2, "matched_to").unwrap(), "0");

    fs::remove_file(&in_path).unwrap();
    fs::remove_file(&out_path).unwrap();
}
