pub mod dictionary;
pub mod error;
pub mod matching;
pub mod response;

pub use dictionary::{DataType, DictionaryField, has_categorical};
pub use error::{ArcmapError, Result};
pub use matching::{CandidateMatch, ResponseMatch, ReviewStatus};
pub use response::{Response, ResponseParser, format_responses, parse_redcap};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_copies_both_sides() {
        let source = DictionaryField::new("sex", "Sex of patient")
            .with_responses(vec![Response::new("1", "male")]);
        let target = DictionaryField::new("demog_sex", "Sex of participant");
        let row = CandidateMatch::from_fields(&source, &target, 1);
        assert_eq!(row.status, ReviewStatus::Unreviewed);
        assert_eq!(row.raw_variable, "sex");
        assert_eq!(row.arc_variable, "demog_sex");
        assert!(row.raw_response.is_some());
        assert!(row.arc_response.is_none());
        assert_eq!(row.rank, 1);
    }

    #[test]
    fn candidate_serializes_with_status_sentinel() {
        let source = DictionaryField::new("age", "Age in years");
        let row = CandidateMatch::from_fields(&source, &source, 0);
        let json = serde_json::to_value(&row).expect("serialize candidate");
        assert_eq!(json["status"], "-");
        assert_eq!(json["raw_response"], serde_json::Value::Null);
        let round: CandidateMatch = serde_json::from_value(json).expect("deserialize candidate");
        assert_eq!(round, row);
    }
}
