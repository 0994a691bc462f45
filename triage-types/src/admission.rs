//! Validated insert-or-update requests.
//!
//! An [`Admission`] is the only way untyped input reaches the queue. Decoding
//! checks the three fields in a fixed order (id, priority, label) and stops at
//! the first failure, so exactly one error is reported per bad record.
//! Deserializing through serde goes through the same checks.

use crate::{Error, PatientId, Priority, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request to add a patient, or to update one already queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Admission {
    pub id: PatientId,
    pub priority: Priority,
    pub label: String,
}

impl Admission {
    /// Builds an admission from typed parts, checking the priority range.
    pub fn new(id: PatientId, priority: i64, label: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id,
            priority: Priority::new(priority)?,
            label: label.into(),
        })
    }

    /// Decodes an admission from a JSON object with `id`, `priority` and
    /// `label` fields.
    ///
    /// Numbers count as whole integers when they are JSON integers or finite
    /// floats with no fractional part (`7.0` is accepted, `7.5` is not). A
    /// missing field is rejected like a field of the wrong kind.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Some(fields) = value.as_object() else {
            return Err(Error::InvalidIdentity(format!(
                "expected an object, got {}",
                describe(Some(value))
            )));
        };

        let id = fields.get("id");
        let id = whole_integer(id).map_err(|err| {
            Error::InvalidIdentity(match err {
                IntegerError::NotWhole => format!("{} is not a whole integer", describe(id)),
                IntegerError::OutOfRange => format!("{} is outside the i64 range", describe(id)),
            })
        })?;

        let priority = fields.get("priority");
        let priority = whole_integer(priority).map_err(|err| {
            Error::InvalidPriority(match err {
                IntegerError::NotWhole => {
                    format!("{} is not a whole integer", describe(priority))
                }
                IntegerError::OutOfRange => format!(
                    "{} is outside {}..={}",
                    describe(priority),
                    Priority::MIN,
                    Priority::MAX
                ),
            })
        })?;
        let priority = Priority::new(priority)?;

        let label = match fields.get("label") {
            Some(Value::String(label)) => label.clone(),
            other => {
                return Err(Error::InvalidLabel(format!(
                    "{} is not text",
                    describe(other)
                )));
            }
        };

        Ok(Self {
            id: PatientId::from_i64(id),
            priority,
            label,
        })
    }

    /// Parses one JSON document and decodes it with [`Admission::from_json`].
    pub fn parse_line(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        Self::from_json(&value)
    }
}

impl TryFrom<Value> for Admission {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(&value)
    }
}

/// Why a JSON value could not be read as an `i64`.
enum IntegerError {
    /// Not a number, or a number with a fractional part.
    NotWhole,
    /// A whole number that does not fit in an `i64`.
    OutOfRange,
}

fn whole_integer(value: Option<&Value>) -> std::result::Result<i64, IntegerError> {
    let Some(Value::Number(number)) = value else {
        return Err(IntegerError::NotWhole);
    };
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    let Some(f) = number.as_f64() else {
        return Err(IntegerError::NotWhole);
    };
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(IntegerError::NotWhole);
    }
    // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(IntegerError::OutOfRange);
    }
    Ok(f as i64)
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "missing value".to_string(),
        Some(v) => v.to_string(),
    }
}
