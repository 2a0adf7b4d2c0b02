use arcmap_model::{
    CandidateMatch, DataType, DictionaryField, Response, ResponseMatch, ReviewStatus,
    has_categorical,
};

#[test]
fn data_type_parses_aliases() {
    assert_eq!("string".parse::<DataType>(), Ok(DataType::String));
    assert_eq!("Number".parse::<DataType>(), Ok(DataType::Number));
    assert_eq!("enum".parse::<DataType>(), Ok(DataType::Categorical));
    assert_eq!("multiselect".parse::<DataType>(), Ok(DataType::Multiselect));
    assert!("radio".parse::<DataType>().is_err());
    assert_eq!(DataType::default(), DataType::String);
}

#[test]
fn empty_response_list_is_still_categorical() {
    let field = DictionaryField::new("flag", "").with_responses(Vec::new());
    assert!(field.is_categorical());
    assert!(!DictionaryField::new("notes", "Free text").is_categorical());
}

#[test]
fn has_categorical_checks_any_field() {
    let plain = vec![DictionaryField::new("a", ""), DictionaryField::new("b", "")];
    assert!(!has_categorical(&plain));
    let mut mixed = plain;
    mixed.push(DictionaryField::new("c", "").with_responses(vec![Response::new("1", "yes")]));
    assert!(has_categorical(&mixed));
}

#[test]
fn review_status_round_trips_through_text() {
    for status in [
        ReviewStatus::Unreviewed,
        ReviewStatus::Accepted,
        ReviewStatus::Rejected,
    ] {
        assert_eq!(status.as_str().parse::<ReviewStatus>(), Ok(status));
    }
    assert_eq!("TRUE".parse::<ReviewStatus>(), Ok(ReviewStatus::Accepted));
    assert_eq!("".parse::<ReviewStatus>(), Ok(ReviewStatus::Unreviewed));
    assert!("maybe".parse::<ReviewStatus>().is_err());
}

#[test]
fn join_key_renders_response() {
    let source = DictionaryField::new("sex", "Sex");
    let target = DictionaryField::new("demog_sex", "Sex");
    let candidate = CandidateMatch::from_fields(&source, &target, 0);

    let row = ResponseMatch::from_candidate(
        &candidate,
        Some(Response::new("M", "man")),
        Some(Response::new("1", "male")),
    );
    assert_eq!(
        row.join_key(),
        ("demog_sex".to_string(), Some("1, male".to_string()))
    );

    let plain = ResponseMatch::from_candidate(&candidate, None, None);
    assert_eq!(plain.join_key(), ("demog_sex".to_string(), None));
}
