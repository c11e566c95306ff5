use crate::errors::PentestError;

/// Substrings refused anywhere in the config.
const DANGEROUS_PATTERNS: &[&str] = &[
    "../",
    "..\\",
    "<script",
    "javascript:",
    "vbscript:",
    "data:",
    "file:",
];

/// Keys whose values are sent verbatim as HTTP header values.
const HEADER_KEYS: &[&str] = &["client_id", "client_secret"];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), PentestError> {
    walk(value, &mut Vec::new())
}

fn walk(value: &serde_yaml::Value, path: &mut Vec<String>) -> Result<(), PentestError> {
    match value {
        serde_yaml::Value::String(s) => check_string(s, path),
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                path.push(k.as_str().unwrap_or("<non-string key>").to_string());
                walk(v, path)?;
                path.pop();
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                path.push(format!("[{}]", i));
                walk(v, path)?;
                path.pop();
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn check_string(s: &str, path: &[String]) -> Result<(), PentestError> {
    let location = if path.is_empty() { "root".to_string() } else { path.join(".") };

    let lower = s.to_lowercase();
    if let Some(pattern) = DANGEROUS_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(PentestError::Config(format!(
            "Dangerous pattern '{}' found at config path: {}",
            pattern, location
        )));
    }

    let is_header_value = path.last().map_or(false, |k| HEADER_KEYS.contains(&k.as_str()));
    if is_header_value {
        validate_header_value(&location, s)?;
    }

    Ok(())
}

/// Credential values are sent verbatim as HTTP headers.
pub fn validate_header_value(name: &str, value: &str) -> Result<(), PentestError> {
    if value.chars().any(|c| c.is_control()) {
        return Err(PentestError::Config(format!(
            "Control characters are not allowed in header value: {}",
            name
        )));
    }
    Ok(())
}
