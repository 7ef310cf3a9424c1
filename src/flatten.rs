//! Reshaping of JSON-RPC results into [`Table`]s.
//!
//! Navigation calls (`listCompetitions`, `listEvents`, ...) return one record
//! per entity with a nested entity object and a `marketCount`; the entity's
//! fields are lifted to the top of the row. Market catalogues are wider:
//! projection sub-objects become prefixed columns, the description is merged
//! in, and each runner gets its own row.

use crate::dto::common::MarketProjection;
use crate::error::{BetfairError, Result};
use crate::request::Method;
use crate::table::{Record, Table};
use serde_json::{Map, Value};

const MARKET_COUNT: &str = "marketCount";

/// Options that shape a flattened table without reaching the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenOptions {
    /// Keep the catalogue description's `rules` text.
    pub keep_rules: bool,
    /// Projections the catalogue request asked for; anything else is left
    /// out of the table.
    pub market_projection: Vec<MarketProjection>,
}

/// How a method's records are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `{<key>: {...}, marketCount}`; the object is merged unprefixed.
    Entity(&'static str),
    /// `{<key>: "...", marketCount}`.
    Keyed(&'static str),
    Catalogue,
    /// Not tabulated.
    Nested,
}

fn shape(method: Method) -> Shape {
    match method {
        Method::Competitions => Shape::Entity("competition"),
        Method::Events => Shape::Entity("event"),
        Method::EventTypes => Shape::Entity("eventType"),
        Method::TimeRanges => Shape::Entity("timeRange"),
        Method::Countries => Shape::Keyed("countryCode"),
        Method::MarketTypes => Shape::Keyed("marketType"),
        Method::Venues => Shape::Keyed("venue"),
        Method::MarketCatalogue => Shape::Catalogue,
        Method::MarketBook => Shape::Nested,
    }
}

pub fn flatten(result: &Value, method: Method, options: &FlattenOptions) -> Result<Table> {
    let shape = shape(method);
    if shape == Shape::Nested {
        return Err(BetfairError::validation(
            "method",
            format!("{} results are not tabulated", method.api_name()),
        ));
    }

    let records = result
        .as_array()
        .ok_or_else(|| BetfairError::parse(method.api_name(), None, "result"))?;

    let mut table = Table::new();
    for (index, record) in records.iter().enumerate() {
        let record = record
            .as_object()
            .ok_or_else(|| BetfairError::parse(method.api_name(), Some(index), "record object"))?;
        let missing = |field: &str| BetfairError::parse(method.api_name(), Some(index), field);

        match shape {
            Shape::Entity(key) => {
                let entity = record
                    .get(key)
                    .and_then(Value::as_object)
                    .ok_or_else(|| missing(key))?;
                require(record, MARKET_COUNT).ok_or_else(|| missing(MARKET_COUNT))?;

                let mut row = Record::new();
                for (field, value) in record {
                    if field == key {
                        promote(&mut row, "", entity);
                    } else {
                        put(&mut row, field.clone(), value);
                    }
                }
                table.push(row);
            }
            Shape::Keyed(key) => {
                require(record, key).ok_or_else(|| missing(key))?;
                require(record, MARKET_COUNT).ok_or_else(|| missing(MARKET_COUNT))?;

                let mut row = Record::new();
                for (field, value) in record {
                    put(&mut row, field.clone(), value);
                }
                table.push(row);
            }
            Shape::Catalogue => {
                for row in catalogue_rows(record, options, &missing)? {
                    table.push(row);
                }
            }
            Shape::Nested => unreachable!("rejected above"),
        }
    }
    Ok(table)
}

fn require<'a>(record: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !v.is_null())
}

/// Which projection, if any, governs a catalogue field.
fn projection_of(field: &str) -> Option<MarketProjection> {
    match field {
        "competition" => Some(MarketProjection::Competition),
        "event" => Some(MarketProjection::Event),
        "eventType" => Some(MarketProjection::EventType),
        "marketStartTime" => Some(MarketProjection::MarketStartTime),
        "description" => Some(MarketProjection::MarketDescription),
        _ => None,
    }
}

/// Runner fields kept when only `RUNNER_METADATA` was requested.
const RUNNER_KEYS: [&str; 2] = ["selectionId", "handicap"];

fn catalogue_rows(
    record: &Map<String, Value>,
    options: &FlattenOptions,
    missing: &dyn Fn(&str) -> BetfairError,
) -> Result<Vec<Record>> {
    for field in ["marketId", "marketName"] {
        require(record, field).ok_or_else(|| missing(field))?;
    }

    let requested = |projection: MarketProjection| options.market_projection.contains(&projection);
    let with_description = requested(MarketProjection::RunnerDescription);
    let with_metadata = requested(MarketProjection::RunnerMetadata);
    let mut market = Record::new();
    let mut runners: &[Value] = &[];

    for (field, value) in record {
        if let Some(projection) = projection_of(field) {
            if !requested(projection) {
                continue;
            }
        }
        match (field.as_str(), value) {
            ("description", Value::Object(description)) => {
                for (name, value) in description {
                    if name == "rules" && !options.keep_rules {
                        continue;
                    }
                    put(&mut market, name.clone(), value);
                }
            }
            ("runners", _) if !with_description && !with_metadata => {}
            ("runners", Value::Array(list)) => runners = list.as_slice(),
            (name, other) => put(&mut market, name.to_string(), other),
        }
    }

    if runners.is_empty() {
        return Ok(vec![market]);
    }

    runners
        .iter()
        .map(|runner| {
            let runner = runner.as_object().ok_or_else(|| missing("runners"))?;
            let mut row = market.clone();
            for (field, value) in runner {
                let keep = match field.as_str() {
                    "metadata" => with_metadata,
                    name => with_description || RUNNER_KEYS.contains(&name),
                };
                if keep {
                    put(&mut row, field.clone(), value);
                }
            }
            Ok(row)
        })
        .collect()
}

/// Lifts an object's fields into `row`, prefixing with `prefix.` unless the
/// prefix is empty. Nested objects recurse with a dotted prefix.
fn promote(row: &mut Record, prefix: &str, object: &Map<String, Value>) {
    for (field, value) in object {
        let column = if prefix.is_empty() {
            field.clone()
        } else {
            format!("{prefix}.{field}")
        };
        put(row, column, value);
    }
}

fn put(row: &mut Record, column: String, value: &Value) {
    match value {
        Value::Object(object) => promote(row, &column, object),
        other => row.push((column, cell(other))),
    }
}

/// Scalars and lists of scalars pass through; lists holding objects or lists
/// are kept as their JSON text so every cell stays flat.
fn cell(value: &Value) -> Value {
    match value {
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            Value::String(value.to_string())
        }
        other => other.clone(),
    }
}
