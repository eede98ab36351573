use std::collections::BTreeMap;

/// Replace every literal occurrence of each key in `values`
///
/// Plain substring replacement, keys taken in sorted order. Keys are expected
/// not to overlap one another (the `#name#` convention guarantees that).
pub fn substitute_keys(template: &str, values: &BTreeMap<String, String>) -> String {
    values
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .fold(template.to_string(), |acc, (key, value)| {
            if acc.contains(key.as_str()) {
                acc.replace(key.as_str(), value)
            } else {
                acc
            }
        })
}
