use super::Record;
use strum::{Display, EnumIter};

const PERSON_KEYS: &[&str] = &[
    "url",
    "name",
    "height",
    "mass",
    "hair_color",
    "skin_color",
    "eye_color",
    "birth_year",
    "gender",
    "homeworld",
    "species",
];

const PLANET_KEYS: &[&str] = &[
    "url",
    "name",
    "rotation_period",
    "orbital_period",
    "diameter",
    "climate",
    "gravity",
    "terrain",
    "surface_water",
    "population",
];

const PLANET_HOTH_KEYS: &[&str] = &[
    "url",
    "name",
    "system_position",
    "natural_satellites",
    "rotation_period",
    "orbital_period",
    "diameter",
    "climate",
    "gravity",
    "terrain",
    "surface_water",
    "population",
    "indigenous_life_forms",
];

const SPECIES_KEYS: &[&str] = &[
    "url",
    "name",
    "classification",
    "designation",
    "average_height",
    "skin_colors",
    "hair_colors",
    "eye_colors",
    "average_lifespan",
    "language",
];

const STARSHIP_KEYS: &[&str] = &[
    "url",
    "starship_class",
    "name",
    "model",
    "manufacturer",
    "length",
    "width",
    "max_atmosphering_speed",
    "hyperdrive_rating",
    "MGLT",
    "crew",
    "passengers",
    "cargo_capacity",
    "consumables",
    "armament",
];

const VEHICLE_KEYS: &[&str] = &[
    "url",
    "vehicle_class",
    "name",
    "model",
    "manufacturer",
    "length",
    "max_atmosphering_speed",
    "crew",
    "passengers",
    "cargo_capacity",
    "consumables",
    "armament",
];

/// The kinds of entity the pipeline knows a canonical shape for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Person,
    Planet,
    /// A planet carrying the extra survey fields recorded for Echo Base's host world.
    PlanetHoth,
    Species,
    Starship,
    Vehicle,
}

impl EntityKind {
    /// The canonical fields of this kind, in output order.
    #[must_use]
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Person => PERSON_KEYS,
            Self::Planet => PLANET_KEYS,
            Self::PlanetHoth => PLANET_HOTH_KEYS,
            Self::Species => SPECIES_KEYS,
            Self::Starship => STARSHIP_KEYS,
            Self::Vehicle => VEHICLE_KEYS,
        }
    }

    /// Projects `record` onto this kind's key set.
    #[must_use]
    pub fn filter(self, record: &Record) -> Record {
        filter(record, self.keys())
    }
}

/// Builds a new record holding only the fields named in `keys`, in that order.
///
/// Keys missing from `record` are skipped; the result never contains a field
/// that `record` lacks.
#[must_use]
pub fn filter(record: &Record, keys: &[&str]) -> Record {
    keys.iter()
        .filter_map(|&key| record.get(key).map(|value| (key, value.clone())))
        .collect()
}
