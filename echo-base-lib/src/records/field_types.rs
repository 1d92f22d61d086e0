use super::EntityKind;
use core::fmt;
use std::collections::HashMap;

const INTEGER_FIELDS: &[&str] = &[
    "height",
    "mass",
    "rotation_period",
    "orbital_period",
    "diameter",
    "surface_water",
    "population",
    "average_height",
    "average_lifespan",
    "max_atmosphering_speed",
    "MGLT",
    "crew",
    "passengers",
    "cargo_capacity",
    "system_position",
    "natural_satellites",
];

const FLOAT_FIELDS: &[&str] = &["gravity", "length", "width", "hyperdrive_rating"];

const STRING_LIST_FIELDS: &[&str] = &[
    "hair_color",
    "skin_color",
    "climate",
    "terrain",
    "skin_colors",
    "hair_colors",
    "eye_colors",
    "indigenous_life_forms",
];

/// How a reference field stores the record it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceShape {
    /// A single URL, replaced by the resolved record.
    Record,

    /// A list of URLs, replaced by a list holding the record resolved from the first URL.
    RecordList,
}

/// The type a field's string value is coerced into during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTypeClass {
    Integer,
    Float,
    StringList,
    Reference { target: EntityKind, shape: ReferenceShape },
}

impl fmt::Display for FieldTypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::StringList => write!(f, "string list"),
            Self::Reference { target, .. } => write!(f, "reference to {target}"),
        }
    }
}

/// A field was given two different classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTypesError {
    pub field: String,
    pub first: FieldTypeClass,
    pub second: FieldTypeClass,
}

impl fmt::Display for FieldTypesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' is classified both as {} and as {}",
            self.field, self.first, self.second
        )
    }
}

impl core::error::Error for FieldTypesError {}

/// Immutable table mapping field names to their [`FieldTypeClass`].
///
/// The classification is global: a field name has the same class in every
/// entity kind it appears in. Fields absent from the table are left untyped.
#[derive(Debug, Clone)]
pub struct FieldTypes {
    classes: HashMap<String, FieldTypeClass>,
}

impl FieldTypes {
    #[must_use]
    pub fn builder() -> FieldTypesBuilder {
        FieldTypesBuilder::default()
    }

    /// The class of `field`, or `None` for untyped fields.
    #[must_use]
    pub fn class_of(&self, field: &str) -> Option<FieldTypeClass> {
        self.classes.get(field).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for FieldTypes {
    /// The classification used for Star Wars API records.
    fn default() -> Self {
        Self::builder()
            .integer(INTEGER_FIELDS)
            .float(FLOAT_FIELDS)
            .string_list(STRING_LIST_FIELDS)
            .reference("homeworld", EntityKind::Planet, ReferenceShape::Record)
            .reference("species", EntityKind::Species, ReferenceShape::RecordList)
            .build()
            .expect("built-in field classes should not overlap")
    }
}

/// Collects field classifications and checks them for overlaps.
#[derive(Debug, Clone, Default)]
pub struct FieldTypesBuilder {
    entries: Vec<(String, FieldTypeClass)>,
}

impl FieldTypesBuilder {
    #[must_use]
    pub fn integer(self, fields: &[&str]) -> Self {
        self.classify(fields, FieldTypeClass::Integer)
    }

    #[must_use]
    pub fn float(self, fields: &[&str]) -> Self {
        self.classify(fields, FieldTypeClass::Float)
    }

    #[must_use]
    pub fn string_list(self, fields: &[&str]) -> Self {
        self.classify(fields, FieldTypeClass::StringList)
    }

    #[must_use]
    pub fn reference(self, field: &str, target: EntityKind, shape: ReferenceShape) -> Self {
        self.classify(&[field], FieldTypeClass::Reference { target, shape })
    }

    #[must_use]
    pub fn classify(mut self, fields: &[&str], class: FieldTypeClass) -> Self {
        self.entries.extend(fields.iter().map(|&field| (field.to_string(), class)));
        self
    }

    /// Builds the table.
    ///
    /// Listing a field twice under the same class is accepted. Listing it
    /// under two different classes is an error.
    pub fn build(self) -> Result<FieldTypes, FieldTypesError> {
        let mut classes = HashMap::with_capacity(self.entries.len());

        for (field, class) in self.entries {
            match classes.get(&field) {
                Some(&existing) if existing != class => {
                    return Err(FieldTypesError {
                        field,
                        first: existing,
                        second: class,
                    });
                }
                Some(_) => {}
                None => {
                    let _ = classes.insert(field, class);
                }
            }
        }

        Ok(FieldTypes { classes })
    }
}
