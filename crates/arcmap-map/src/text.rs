use arcmap_model::DictionaryField;

/// Text fed to the similarity strategies for one field.
///
/// Underscores in the variable name become spaces so `demog_sex` contributes
/// the words "demog" and "sex".
pub fn similarity_text(field: &DictionaryField) -> String {
    format!("{} {}", field.variable.replace('_', " "), field.description)
}

pub fn similarity_texts(fields: &[DictionaryField]) -> Vec<String> {
    fields.iter().map(similarity_text).collect()
}
