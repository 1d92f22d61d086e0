//! The assembly sequence that produces both output documents.

use crate::Result;
use crate::documents::{EchoBase, Slot};
use crate::fetch::{Collection, SwapiClient};
use crate::records::{EntityKind, Normalizer, Record, is_unknown, merge};
use ohno::{IntoAppError, app_err};
use serde_json::{Number, Value};

const LOG_TARGET: &str = "  assemble";

const HOTH: &str = "Hoth";
const SNOWSPEEDER: &str = "snowspeeder";
const X_WING: &str = "t-65 x-wing";
const MEDIUM_TRANSPORT: &str = "gr-75 medium transport";
const MILLENNIUM_FALCON: &str = "millennium falcon";

const HAN_SOLO: &str = "han solo";
const CHEWBACCA: &str = "chewbacca";
const LEIA_ORGANA: &str = "leia organa";
const C_3PO: &str = "c-3po";
const LUKE_SKYWALKER: &str = "luke skywalker";
const R2_D2: &str = "R2-D2";
const WEDGE_ANTILLES: &str = "wedge antilles";
const R5_D4: &str = "R5-D4";

const EVACUATION_TRANSPORT_NAME: &str = "Bright Hope";

/// Builds the output documents from the local inputs and the remote catalog.
#[derive(Debug)]
pub struct Assembler {
    normalizer: Normalizer<SwapiClient>,
}

impl Assembler {
    #[must_use]
    pub const fn new(normalizer: Normalizer<SwapiClient>) -> Self {
        Self { normalizer }
    }

    /// Select the planets whose population is unknown, filtered and normalized.
    pub async fn uninhabited_planets(&self, planets: Vec<Record>) -> Result<Vec<Record>> {
        let total = planets.len();
        let mut uninhabited = Vec::new();

        for planet in planets {
            if !planet.get("population").is_some_and(is_unknown) {
                continue;
            }

            let planet = EntityKind::Planet.filter(&planet);
            uninhabited.push(self.normalizer.clean(planet).await?);
        }

        log::info!(target: LOG_TARGET, "Selected {} of {total} planets as uninhabited", uninhabited.len());
        Ok(uninhabited)
    }

    /// Complete the Echo Base document with remote data and the evacuation plan.
    pub async fn echo_base(&self, base: &mut EchoBase) -> Result<()> {
        let _ = self.refresh(base, Slot::Hoth, Collection::Planets, HOTH, EntityKind::PlanetHoth).await?;

        self.clean_in_place(base, Slot::Commander).await?;
        self.clean_in_place(base, Slot::FreighterPilot).await?;

        let _ = self
            .refresh(base, Slot::SnowspeederType, Collection::Vehicles, SNOWSPEEDER, EntityKind::Vehicle)
            .await?;
        let x_wing = self
            .refresh(base, Slot::StarfighterType, Collection::Starships, X_WING, EntityKind::Starship)
            .await?;
        let transport = self
            .refresh(base, Slot::TransportType, Collection::Starships, MEDIUM_TRANSPORT, EntityKind::Starship)
            .await?;
        let freighter = self
            .refresh(base, Slot::Freighter, Collection::Starships, MILLENNIUM_FALCON, EntityKind::Starship)
            .await?;

        let han = self.person(HAN_SOLO).await?;
        let chewbacca = self.person(CHEWBACCA).await?;
        let freighter = crewed(&freighter, [("pilot", han), ("copilot", chewbacca)]);
        base.set_record(Slot::Freighter, freighter)?;

        record_evacuation_limits(base, &transport)?;

        let evacuation_transport = self.evacuation_transport(&transport, &x_wing).await?;
        base.evacuation_plan_mut()?
            .get_mut("transport_assignments")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| app_err!("evacuation plan has no 'transport_assignments' list"))?
            .push(evacuation_transport.into_value());

        log::info!(target: LOG_TARGET, "Echo Base document assembled");
        Ok(())
    }

    /// Merge the local record in `slot` with the first search match, filter it, normalize it and store it back.
    async fn refresh(&self, base: &mut EchoBase, slot: Slot, collection: Collection, term: &str, kind: EntityKind) -> Result<Record> {
        let local = base.record(slot)?;
        let remote = self.search(collection, term).await?;

        let record = self.normalizer.clean(kind.filter(&merge(&local, &remote))).await?;
        base.set_record(slot, record.clone())?;

        log::debug!(target: LOG_TARGET, "Refreshed {slot} from {collection} search for '{term}'");
        Ok(record)
    }

    async fn clean_in_place(&self, base: &mut EchoBase, slot: Slot) -> Result<()> {
        let record = self.normalizer.clean(base.record(slot)?).await?;
        base.set_record(slot, record)
    }

    async fn person(&self, term: &str) -> Result<Record> {
        let person = self.search(Collection::People, term).await?;
        self.normalizer.clean(EntityKind::Person.filter(&person)).await
    }

    async fn search(&self, collection: Collection, term: &str) -> Result<Record> {
        self.normalizer
            .fetcher()
            .search(collection, term)
            .await
            .into_app_err_with(|| format!("searching {collection} for '{term}'"))
    }

    async fn evacuation_transport(&self, transport: &Record, x_wing: &Record) -> Result<Record> {
        let mut evacuation_transport = transport.clone();

        let leia = self.person(LEIA_ORGANA).await?;
        let c_3po = self.person(C_3PO).await?;
        let _ = evacuation_transport.insert("passenger_manifest", vec![leia.into_value(), c_3po.into_value()]);
        let _ = evacuation_transport.insert("name", EVACUATION_TRANSPORT_NAME);

        let luke = self.person(LUKE_SKYWALKER).await?;
        let r2_d2 = self.person(R2_D2).await?;
        let luke_escort = crewed(x_wing, [("pilot", luke), ("astromech_droid", r2_d2)]);

        let wedge = self.person(WEDGE_ANTILLES).await?;
        let r5_d4 = self.person(R5_D4).await?;
        let wedge_escort = crewed(x_wing, [("pilot", wedge), ("astromech_droid", r5_d4)]);

        let _ = evacuation_transport.insert("escorts", vec![luke_escort.into_value(), wedge_escort.into_value()]);

        Ok(evacuation_transport)
    }
}

/// A copy of `craft` with each crew member assigned to its role.
fn crewed<const N: usize>(craft: &Record, crew: [(&str, Record); N]) -> Record {
    let crew: Record = crew.into_iter().map(|(role, person)| (role, person.into_value())).collect();
    merge(craft, &crew)
}

/// Fill in the personnel, transport and capacity figures of the evacuation plan.
fn record_evacuation_limits(base: &mut EchoBase, transport: &Record) -> Result<()> {
    let personnel = base.personnel_total()?;
    let transports = base.transports_available()?;

    let passengers = transport
        .get("passengers")
        .ok_or_else(|| app_err!("medium transport has no 'passengers' figure"))?;

    let plan = base.evacuation_plan_mut()?;
    let multiplier = plan
        .get("passenger_overload_multiplier")
        .ok_or_else(|| app_err!("evacuation plan has no 'passenger_overload_multiplier'"))?;

    let transports_value = Value::from(transports);
    let capacity = product(&[passengers, &transports_value, multiplier]).ok_or_else(|| {
        app_err!("cannot compute passenger overload capacity from passengers {passengers}, {transports} transports and multiplier {multiplier}")
    })?;

    log::info!(target: LOG_TARGET, "Evacuation: {personnel} personnel, {transports} transports, overload capacity {capacity}");

    let _ = plan.insert("max_base_personnel".to_string(), personnel);
    let _ = plan.insert("max_available_transports".to_string(), transports_value);
    let _ = plan.insert("max_passenger_overload_capacity".to_string(), capacity);

    Ok(())
}

/// Multiply numeric values, staying integral when every factor is an integer.
fn product(factors: &[&Value]) -> Option<Value> {
    if let Some(ints) = factors.iter().map(|v| v.as_i64()).collect::<Option<Vec<_>>>() {
        return ints.into_iter().try_fold(1_i64, i64::checked_mul).map(Value::from);
    }

    let floats = factors.iter().map(|v| v.as_f64()).collect::<Option<Vec<_>>>()?;
    Number::from_f64(floats.into_iter().product()).map(Value::Number)
}
