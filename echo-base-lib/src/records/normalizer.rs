use super::coerce::{self, DEFAULT_LIST_DELIMITER};
use super::field_types::{FieldTypeClass, FieldTypes, ReferenceShape};
use super::sentinel::is_unknown;
use super::{EntityKind, Record};
use crate::Result;
use crate::fetch::Fetch;
use ohno::IntoAppError;
use serde_json::Value;

const LOG_TARGET: &str = " normalize";

/// Reference chains longer than this are left unresolved unless configured otherwise.
pub const DEFAULT_MAX_REFERENCE_DEPTH: usize = 4;

/// Turns filtered, stringly-typed records into typed records.
///
/// Normalization resolves sentinels to `null`, trims the unit suffix off
/// `gravity`, coerces fields according to a [`FieldTypes`] table, and replaces
/// reference fields with the normalized records they point at. Referenced
/// records are fetched through `F`, filtered to the key set of their kind, and
/// normalized in turn.
#[derive(Debug)]
pub struct Normalizer<F> {
    field_types: FieldTypes,
    fetcher: F,
    max_depth: usize,
}

impl<F: Fetch> Normalizer<F> {
    #[must_use]
    pub const fn new(field_types: FieldTypes, fetcher: F) -> Self {
        Self {
            field_types,
            fetcher,
            max_depth: DEFAULT_MAX_REFERENCE_DEPTH,
        }
    }

    /// Limit how many references deep resolution may go.
    ///
    /// A depth of zero leaves every reference as its raw URL.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Normalize `record`.
    ///
    /// Coercion never fails: values that do not parse are kept as they are.
    /// The only error is a failure to fetch a referenced record.
    pub async fn clean(&self, record: Record) -> Result<Record> {
        let mut path = Vec::new();
        self.clean_at(record, &mut path).await
    }

    /// `path` holds the URLs of the references currently being resolved, outermost first.
    async fn clean_at(&self, mut record: Record, path: &mut Vec<String>) -> Result<Record> {
        resolve_sentinels(&mut record);
        trim_gravity_units(&mut record);

        let mut references = Vec::new();
        for (key, value) in record.iter_mut() {
            match self.field_types.class_of(key) {
                Some(FieldTypeClass::Integer) => coerce_in_place(value, coerce::to_int),
                Some(FieldTypeClass::Float) => coerce_in_place(value, coerce::to_float),
                Some(FieldTypeClass::StringList) => {
                    if let Value::String(s) = value {
                        *value = Value::from(coerce::to_list(s, DEFAULT_LIST_DELIMITER));
                    }
                }
                Some(FieldTypeClass::Reference { target, shape }) => references.push((key.clone(), target, shape)),
                None => {}
            }
        }

        for (key, target, shape) in references {
            let Some(raw) = record.get(&key).cloned() else {
                continue;
            };

            let resolved = self.resolve_reference(raw, target, shape, path).await?;
            let _ = record.insert(key, resolved);
        }

        Ok(record)
    }

    async fn resolve_reference(&self, raw: Value, target: EntityKind, shape: ReferenceShape, path: &mut Vec<String>) -> Result<Value> {
        match (shape, raw) {
            (ReferenceShape::Record, Value::String(url)) => self.resolve_url(url, target, path).await,
            (ReferenceShape::RecordList, Value::Array(urls)) => {
                let Some(url) = urls.first().and_then(Value::as_str).map(str::to_string) else {
                    return Ok(Value::Array(urls));
                };

                if urls.len() > 1 {
                    log::debug!(target: LOG_TARGET, "Keeping only the first of {} {target} references", urls.len());
                }

                let resolved = self.resolve_url(url, target, path).await?;
                Ok(Value::Array(vec![resolved]))
            }
            (ReferenceShape::RecordList, Value::String(url)) => {
                let resolved = self.resolve_url(url, target, path).await?;
                Ok(Value::Array(vec![resolved]))
            }

            // null, already resolved, or some shape we do not know how to follow
            (_, other) => Ok(other),
        }
    }

    /// Fetch, filter, and normalize the record at `url`.
    ///
    /// Returns the raw URL instead when following it would exceed the depth
    /// limit or revisit a URL already being resolved.
    async fn resolve_url(&self, url: String, target: EntityKind, path: &mut Vec<String>) -> Result<Value> {
        if path.len() >= self.max_depth {
            log::warn!(target: LOG_TARGET, "Not resolving {target} reference '{url}': depth limit of {} reached", self.max_depth);
            return Ok(Value::String(url));
        }

        if path.contains(&url) {
            log::warn!(target: LOG_TARGET, "Not resolving {target} reference '{url}': cycle detected");
            return Ok(Value::String(url));
        }

        log::debug!(target: LOG_TARGET, "Resolving {target} reference '{url}'");

        let fetched = self
            .fetcher
            .fetch(&url, &[])
            .await
            .into_app_err_with(|| format!("resolving {target} reference '{url}'"))?;

        let filtered = target.filter(&fetched);

        path.push(url);
        let cleaned = Box::pin(self.clean_at(filtered, path)).await;
        let _ = path.pop();

        Ok(cleaned?.into_value())
    }
}

/// Replace every sentinel string with `null`.
fn resolve_sentinels(record: &mut Record) {
    for value in record.values_mut() {
        if is_unknown(value) {
            *value = Value::Null;
        }
    }
}

/// Keep only the leading number of `gravity` values such as `"1.5 standard"`.
///
/// Values without any token are left alone.
fn trim_gravity_units(record: &mut Record) {
    if let Some(Value::String(gravity)) = record.get_mut("gravity")
        && let Some(token) = gravity.split_whitespace().next()
    {
        *gravity = token.to_string();
    }
}

fn coerce_in_place(value: &mut Value, coerce: fn(Value) -> coerce::Coerced) {
    if value.is_string() {
        *value = coerce(value.take()).into_value();
    }
}
