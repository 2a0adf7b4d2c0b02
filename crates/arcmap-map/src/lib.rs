//! Similarity strategies and candidate selection for mapping data
//! dictionaries onto ARC.
//!
//! The pipeline is: build one text per field ([`similarity_texts`]), score
//! every source/target pair with a [`Strategy`], then keep the best targets
//! per source variable with [`select_matches`]. Categorical fields get a
//! second pass ([`infer_response_mapping`]) that pairs response labels.

pub mod embedding;
pub mod engine;
pub mod handoff;
pub mod matrix;
pub mod options;
pub mod responses;
pub mod select;
pub mod strategy;
pub mod table;
pub mod text;

pub use embedding::{
    DefaultModelLoader, HASHED_MODEL, ModelCache, ModelLoader, SentenceEmbedder, cosine_matrix,
};
pub use engine::{MappingEngine, run_strategy};
pub use handoff::{
    DEFAULT_MERGE_COLUMNS, MergedRow, RESOURCE_SUFFIX, ResourceRow, ResourceTable,
    accepted_matches, format_merge, join_resource,
};
pub use matrix::SimilarityMatrix;
pub use options::{DEFAULT_MODEL, DEFAULT_NUM_MATCHES, DEFAULT_THRESHOLD, MatchOptions};
pub use responses::{has_response_pair, infer_response_mapping, match_responses};
pub use select::{MatchSummary, select_matches};
pub use strategy::{SimilarityStrategy, Strategy, StrategyKind};
pub use table::{
    TableError, read_candidates_csv, write_candidates_csv, write_candidates_json,
    write_responses_csv, write_responses_json,
};
pub use text::{similarity_text, similarity_texts};
