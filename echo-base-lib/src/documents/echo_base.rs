use crate::Result;
use crate::records::Record;
use ohno::{app_err, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use strum::{Display, EnumIter};

/// A location inside the Echo Base document that holds a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    Hoth,
    Commander,
    Freighter,
    FreighterPilot,
    SnowspeederType,
    StarfighterType,
    TransportType,
}

impl Slot {
    /// JSON pointer to the slot.
    #[must_use]
    pub const fn pointer(self) -> &'static str {
        match self {
            Self::Hoth => "/location/planet",
            Self::Commander => "/garrison/commander",
            Self::Freighter => "/visiting_starships/freighters/0",
            Self::FreighterPilot => "/visiting_starships/freighters/1/pilot",
            Self::SnowspeederType => "/vehicle_assets/snowspeeders/0/type",
            Self::StarfighterType => "/starship_assets/starfighters/0/type",
            Self::TransportType => "/starship_assets/transports/0/type",
        }
    }
}

const PERSONNEL: &str = "/garrison/personnel";
const TRANSPORTS_AVAILABLE: &str = "/starship_assets/transports/0/num_available";
const EVACUATION_PLAN: &str = "/evacuation_plan";

/// The Echo Base document.
///
/// Only the parts the assembly touches are typed; everything else is carried
/// through unchanged and in its original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EchoBase(Value);

impl EchoBase {
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            bail!("the Echo Base document must be a JSON object");
        }

        Ok(Self(value))
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// A copy of the record held in `slot`.
    pub fn record(&self, slot: Slot) -> Result<Record> {
        let value = self
            .0
            .pointer(slot.pointer())
            .ok_or_else(|| app_err!("Echo Base document has no '{}' ({slot})", slot.pointer()))?;

        Record::from_value(value.clone()).ok_or_else(|| app_err!("'{}' in the Echo Base document is not an object ({slot})", slot.pointer()))
    }

    /// Replace the record held in `slot`.
    pub fn set_record(&mut self, slot: Slot, record: Record) -> Result<()> {
        let value = self
            .0
            .pointer_mut(slot.pointer())
            .ok_or_else(|| app_err!("Echo Base document has no '{}' ({slot})", slot.pointer()))?;

        *value = record.into_value();
        Ok(())
    }

    /// Total headcount over every personnel category of the garrison.
    ///
    /// Integer counts add up to an integer; once any count is fractional the
    /// total becomes a float.
    pub fn personnel_total(&self) -> Result<Value> {
        let personnel = self
            .0
            .pointer(PERSONNEL)
            .and_then(Value::as_object)
            .ok_or_else(|| app_err!("Echo Base document has no object at '{PERSONNEL}'"))?;

        let mut total = Value::from(0);
        for (category, count) in personnel {
            total = add_counts(&total, count).ok_or_else(|| app_err!("personnel count for '{category}' is not a number: {count}"))?;
        }

        Ok(total)
    }

    /// Number of medium transports available for the evacuation.
    pub fn transports_available(&self) -> Result<i64> {
        self.0
            .pointer(TRANSPORTS_AVAILABLE)
            .and_then(Value::as_i64)
            .ok_or_else(|| app_err!("Echo Base document has no integer at '{TRANSPORTS_AVAILABLE}'"))
    }

    pub fn evacuation_plan(&self) -> Result<&Map<String, Value>> {
        self.0
            .pointer(EVACUATION_PLAN)
            .and_then(Value::as_object)
            .ok_or_else(|| app_err!("Echo Base document has no object at '{EVACUATION_PLAN}'"))
    }

    pub fn evacuation_plan_mut(&mut self) -> Result<&mut Map<String, Value>> {
        self.0
            .pointer_mut(EVACUATION_PLAN)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| app_err!("Echo Base document has no object at '{EVACUATION_PLAN}'"))
    }
}

fn add_counts(total: &Value, count: &Value) -> Option<Value> {
    if let (Some(a), Some(b)) = (total.as_i64(), count.as_i64())
        && let Some(sum) = a.checked_add(b)
    {
        return Some(Value::from(sum));
    }

    Number::from_f64(total.as_f64()? + count.as_f64()?).map(Value::Number)
}
