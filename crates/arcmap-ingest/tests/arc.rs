use std::fs;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use arcmap_ingest::{IngestError, NormalizeOptions, normalize_dictionary, prepare_arc_schema, read_data};
use arcmap_model::{ArcmapError, DataType, Response, ResponseParser};

fn text_column(name: &str, values: &[Option<&str>]) -> Column {
    Series::new(name.into(), values.to_vec()).into_column()
}

fn arc_frame() -> DataFrame {
    DataFrame::new(vec![
        text_column("Variable", &[Some("demog_sex"), Some("demog_age"), Some("outco_date")]),
        text_column("Question", &[Some("Sex at birth"), Some("Age"), Some("Outcome date")]),
        text_column("Definition", &[Some("Biological sex"), None, Some("Date of outcome")]),
        text_column("Type", &[Some("radio"), Some("number"), Some("date_dmy")]),
        text_column(
            "Answer Options",
            &[Some("1, Male | 2, Female | 3, Unknown"), None, None],
        ),
        Series::new("preset_dengue".into(), vec![1i64, 0, 1]).into_column(),
    ])
    .unwrap()
}

#[test]
fn prepares_descriptions_types_and_responses() {
    let fields = prepare_arc_schema(&arc_frame(), None).unwrap();

    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].variable, "demog_sex");
    assert_eq!(fields[0].description, "Sex at birth Biological sex");
    assert_eq!(fields[0].data_type, DataType::Categorical);
    assert_eq!(
        fields[0].responses,
        Some(vec![
            Response::new("1", "Male"),
            Response::new("2", "Female"),
            Response::new("3", "Unknown"),
        ])
    );
    assert_eq!(fields[1].description, "Age");
    assert_eq!(fields[1].data_type, DataType::Number);
    assert_eq!(fields[1].responses, None);
    assert_eq!(fields[2].data_type, DataType::Date);
}

#[test]
fn preset_keeps_flagged_rows() {
    let fields = prepare_arc_schema(&arc_frame(), Some("dengue")).unwrap();
    let variables: Vec<&str> = fields.iter().map(|f| f.variable.as_str()).collect();
    assert_eq!(variables, vec!["demog_sex", "outco_date"]);
}

#[test]
fn unknown_preset_is_configuration_error() {
    let err = prepare_arc_schema(&arc_frame(), Some("mpox")).unwrap_err();
    assert!(matches!(
        err.as_arcmap(),
        Some(ArcmapError::Configuration(_))
    ));
}

#[test]
fn missing_arc_column_is_schema_error() {
    let frame = arc_frame().drop("Definition").unwrap();
    let err = prepare_arc_schema(&frame, None).unwrap_err();
    assert!(matches!(err.as_arcmap(), Some(ArcmapError::Schema(_))));
}

#[test]
fn reads_csv_dictionary_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dictionary.csv");
    fs::write(
        &path,
        "Variable / Field Name,Field Label,Choices\n\
         sex,Sex of patient,\"1, male | 2, female\"\n\
         age,Age in years,\n",
    )
    .unwrap();

    let frame = read_data(&path).unwrap();
    let options = NormalizeOptions::default()
        .with_description_field("Field Label")
        .with_responses("Choices", ResponseParser::Redcap);
    let fields = normalize_dictionary(&frame, &options).unwrap();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].variable, "sex");
    assert_eq!(
        fields[0].responses,
        Some(vec![Response::new("1", "male"), Response::new("2", "female")])
    );
    assert_eq!(fields[1].responses, None);
}

#[test]
fn rejects_unsupported_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dictionary.xlsx");
    fs::write(&path, b"not a spreadsheet").unwrap();
    let err = read_data(&path).unwrap_err();
    assert!(matches!(
        err.as_arcmap(),
        Some(ArcmapError::Configuration(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_data(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}
