mod common;

use arcmap_map::{
    read_candidates_csv, write_candidates_csv, write_candidates_json, write_responses_csv,
};
use arcmap_model::{CandidateMatch, Response, ResponseMatch, ReviewStatus};

use common::{categorical, field};

fn sample_table() -> Vec<CandidateMatch> {
    let sex = categorical("sex", "Sex of patient", &[("1", "male"), ("2", "female")]);
    let demog_sex = categorical(
        "demog_sex",
        "Sex at birth",
        &[("1", "Male"), ("2", "Female")],
    );
    let age = field("age", "Age in years");
    let mut rows = vec![
        CandidateMatch::from_fields(&sex, &demog_sex, 0),
        CandidateMatch::from_fields(&age, &field("demog_age", "Age"), 0),
        CandidateMatch::from_fields(&age, &field("demog_dob", "Date of birth"), 1),
    ];
    rows[0].status = ReviewStatus::Accepted;
    rows[2].status = ReviewStatus::Rejected;
    rows
}

fn render(rows: &[CandidateMatch]) -> String {
    let mut buffer = Vec::new();
    write_candidates_csv(&mut buffer, rows).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn candidate_csv_layout() {
    insta::assert_snapshot!(render(&sample_table()), @r###"
    status,raw_variable,raw_description,raw_response,arc_variable,arc_description,arc_response,rank
    y,sex,Sex of patient,"1, male | 2, female",demog_sex,Sex at birth,"1, Male | 2, Female",0
    -,age,Age in years,,demog_age,Age,,0
    n,age,Age in years,,demog_dob,Date of birth,,1
    "###);
}

#[test]
fn reviewed_table_reads_back() {
    let rows = sample_table();
    let read = read_candidates_csv(render(&rows).as_bytes()).unwrap();
    assert_eq!(read, rows);
}

#[test]
fn reads_table_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.csv");
    write_candidates_csv(std::fs::File::create(&path).unwrap(), &sample_table()).unwrap();
    let read = read_candidates_csv(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(read.len(), 3);
    assert_eq!(read[0].status, ReviewStatus::Accepted);
}

#[test]
fn unparseable_response_cell_reads_as_none() {
    let csv = "status,raw_variable,raw_response,arc_variable\ny,sex,male or female,demog_sex\n";
    let rows = read_candidates_csv(csv.as_bytes()).unwrap();
    assert_eq!(rows[0].raw_response, None);
    assert_eq!(rows[0].status, ReviewStatus::Accepted);
}

#[test]
fn json_uses_code_label_objects() {
    let mut buffer = Vec::new();
    write_candidates_json(&mut buffer, &sample_table()[..1]).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(value[0]["status"], "y");
    assert_eq!(value[0]["raw_response"][1]["code"], "2");
    assert_eq!(value[0]["raw_response"][1]["label"], "female");
    assert_eq!(value[0]["rank"], 0);
}

#[test]
fn response_csv_renders_single_responses() {
    let rows = sample_table();
    let expanded = vec![
        ResponseMatch::from_candidate(
            &rows[0],
            Some(Response::new("2", "female")),
            Some(Response::new("2", "Female")),
        ),
        ResponseMatch::from_candidate(&rows[1], None, None),
    ];
    let mut buffer = Vec::new();
    write_responses_csv(&mut buffer, &expanded).unwrap();
    insta::assert_snapshot!(String::from_utf8(buffer).unwrap(), @r###"
    status,raw_variable,raw_description,raw_response,arc_variable,arc_description,arc_response
    y,sex,Sex of patient,"2, female",demog_sex,Sex at birth,"2, Female"
    -,age,Age in years,,demog_age,Age,
    "###);
}

#[test]
fn enum_values_with_separators_survive_review() {
    let route = categorical(
        "route",
        "Route of administration",
        &[("IV|IM", "IV|IM"), ("oral", "oral")],
    );
    let answer = categorical(
        "treat_yn",
        "Treated",
        &[("Yes, confirmed", "Yes, confirmed"), ("No", "No")],
    );
    let mut rows = vec![
        CandidateMatch::from_fields(&route, &answer, 0),
        CandidateMatch::from_fields(&answer, &route, 0),
    ];
    rows[0].status = ReviewStatus::Accepted;

    let text = render(&rows);
    let read = read_candidates_csv(text.as_bytes()).unwrap();
    assert_eq!(read, rows);
    assert_eq!(
        read[1].raw_response.as_ref().unwrap()[0],
        Response::new("Yes, confirmed", "Yes, confirmed")
    );
}
