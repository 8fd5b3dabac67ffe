//! YAML decoding for definition files

use crate::error::YamlParseError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Whether `text` holds no YAML content at all
fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// Decode the first document of `text` into `T`
///
/// Blank files and `null` documents decode to `None`.
///
/// # Errors
/// Returns [`YamlParseError`] naming `path` when the text is not valid YAML
/// or does not match the shape of `T`.
pub fn parse_yaml<T: DeserializeOwned>(path: &str, text: &str) -> Result<Option<T>, YamlParseError> {
    if is_blank(text) {
        return Ok(None);
    }

    let document = serde_yaml::Deserializer::from_str(text)
        .next()
        .ok_or_else(|| YamlParseError {
            path: path.to_string(),
            message: "no YAML document".to_string(),
        })?;

    Option::<T>::deserialize(document).map_err(|err| YamlParseError {
        path: path.to_string(),
        message: err.to_string(),
    })
}
