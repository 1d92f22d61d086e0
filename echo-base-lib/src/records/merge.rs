use super::Record;

/// Combines two records, `overrides` winning on every field it carries.
///
/// The result starts as a copy of `default`. Fields present in both keep the
/// position they have in `default`; fields only in `overrides` are appended in
/// the order `overrides` lists them. Neither input is modified.
#[must_use]
pub fn merge(default: &Record, overrides: &Record) -> Record {
    let mut result = default.clone();
    for (key, value) in overrides.iter() {
        let _ = result.insert(key.clone(), value.clone());
    }

    result
}
