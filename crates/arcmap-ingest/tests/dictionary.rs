use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use arcmap_ingest::{NormalizeOptions, infer_description_field, normalize_dictionary};
use arcmap_model::{ArcmapError, DataType, Response, ResponseParser};

fn text_column(name: &str, values: &[Option<&str>]) -> Column {
    Series::new(name.into(), values.to_vec()).into_column()
}

fn redcap_frame() -> DataFrame {
    DataFrame::new(vec![
        text_column(
            "Variable / Field Name",
            &[Some("subjid"), Some("sex"), Some("age"), Some("outcome")],
        ),
        text_column("Form Name", &[Some("demo"), Some("demo"), Some("demo"), Some("out")]),
        text_column(
            "Field Label",
            &[
                Some("Participant identification number"),
                Some("Sex at birth of the patient"),
                Some("Age in years at enrolment"),
                Some("Outcome at discharge"),
            ],
        ),
        text_column(
            "Choices, Calculations, OR Slider Labels",
            &[None, Some("1, Male | 2, Female"), None, Some("discharged alive")],
        ),
        text_column("Field Type", &[Some("text"), Some("categorical"), Some("number"), None]),
    ])
    .unwrap()
}

#[test]
fn defaults_use_first_column_and_longest_text_column() {
    let fields = normalize_dictionary(&redcap_frame(), &NormalizeOptions::default()).unwrap();

    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].variable, "subjid");
    assert_eq!(fields[0].description, "Participant identification number");
    assert!(fields.iter().all(|f| f.responses.is_none()));
    assert!(fields.iter().all(|f| f.data_type == DataType::String));
}

#[test]
fn preserves_source_order() {
    let fields = normalize_dictionary(&redcap_frame(), &NormalizeOptions::default()).unwrap();
    let variables: Vec<&str> = fields.iter().map(|f| f.variable.as_str()).collect();
    assert_eq!(variables, vec!["subjid", "sex", "age", "outcome"]);
}

#[test]
fn infers_description_from_mean_length() {
    assert_eq!(
        infer_description_field(&redcap_frame()).as_deref(),
        Some("Field Label")
    );
}

#[test]
fn description_inference_breaks_ties_by_column_order() {
    let frame = DataFrame::new(vec![
        text_column("name", &[Some("ab"), Some("cd")]),
        text_column("first", &[Some("abcd"), Some("efgh")]),
        text_column("second", &[Some("wxyz"), Some("ijkl")]),
    ])
    .unwrap();
    assert_eq!(infer_description_field(&frame).as_deref(), Some("first"));
}

#[test]
fn description_inference_skips_numeric_columns() {
    let frame = DataFrame::new(vec![
        text_column("name", &[Some("a"), Some("b")]),
        Series::new("code".into(), vec![123_456_789i64, 987_654_321])
            .into_column(),
    ])
    .unwrap();
    assert_eq!(infer_description_field(&frame).as_deref(), Some("name"));
}

#[test]
fn parses_responses_when_configured() {
    let options = NormalizeOptions::default()
        .with_description_field("Field Label")
        .with_type_field("Field Type")
        .with_responses(
            "Choices, Calculations, OR Slider Labels",
            ResponseParser::Redcap,
        );
    let fields = normalize_dictionary(&redcap_frame(), &options).unwrap();

    assert_eq!(fields[0].responses, None);
    assert_eq!(
        fields[1].responses,
        Some(vec![Response::new("1", "Male"), Response::new("2", "Female")])
    );
    // unparseable choice text is treated as free text, not an error
    assert_eq!(fields[3].responses, None);

    assert_eq!(fields[1].data_type, DataType::Categorical);
    assert_eq!(fields[2].data_type, DataType::Number);
    assert_eq!(fields[3].data_type, DataType::String);
}

#[test]
fn response_field_without_parser_is_configuration_error() {
    let options = NormalizeOptions {
        response_field: Some("Choices, Calculations, OR Slider Labels".to_string()),
        ..NormalizeOptions::default()
    };
    let err = normalize_dictionary(&redcap_frame(), &options).unwrap_err();
    assert!(matches!(err, ArcmapError::Configuration(_)));
}

#[test]
fn parser_without_response_field_is_configuration_error() {
    let options = NormalizeOptions {
        response_parser: Some(ResponseParser::Redcap),
        ..NormalizeOptions::default()
    };
    let err = normalize_dictionary(&redcap_frame(), &options).unwrap_err();
    assert!(matches!(err, ArcmapError::Configuration(_)));
}

#[test]
fn missing_columns_are_schema_errors() {
    let frame = redcap_frame();
    for options in [
        NormalizeOptions::default().with_variable_field("Variable"),
        NormalizeOptions::default().with_description_field("Label"),
        NormalizeOptions::default().with_type_field("Kind"),
        NormalizeOptions::default().with_responses("Choices", ResponseParser::Redcap),
    ] {
        let err = normalize_dictionary(&frame, &options).unwrap_err();
        assert!(matches!(err, ArcmapError::Schema(_)), "got {err:?}");
    }
}

#[test]
fn duplicate_variables_are_rejected() {
    let frame = DataFrame::new(vec![
        text_column("variable", &[Some("age"), Some("age")]),
        text_column("description", &[Some("Age"), Some("Age again")]),
    ])
    .unwrap();
    let err = normalize_dictionary(&frame, &NormalizeOptions::default()).unwrap_err();
    assert!(matches!(err, ArcmapError::Schema(_)));
}

#[test]
fn numeric_variable_names_render_without_decimals() {
    let frame = DataFrame::new(vec![
        Series::new("variable".into(), vec![1.0f64, 2.0]).into_column(),
        text_column("description", &[Some("First"), None]),
    ])
    .unwrap();
    let fields = normalize_dictionary(&frame, &NormalizeOptions::default()).unwrap();
    assert_eq!(fields[0].variable, "1");
    assert_eq!(fields[1].variable, "2");
    assert_eq!(fields[1].description, "");
}

#[test]
fn empty_table_yields_no_fields() {
    let frame = DataFrame::new(vec![
        text_column("variable", &[]),
        text_column("description", &[]),
    ])
    .unwrap();
    let fields = normalize_dictionary(&frame, &NormalizeOptions::default()).unwrap();
    assert!(fields.is_empty());
}
