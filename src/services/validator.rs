//! Row validation: the only place an untyped upload row becomes a
//! [`ValidatedRow`].

use serde_json::Value;

use crate::models::{RawRow, ValidatedRow};

/// A single field problem. Validation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate one raw row.
pub fn validate_row(row: &RawRow) -> Result<ValidatedRow, ValidationError> {
    let area = required_text(row, "area", "Area")?;
    let machine = required_text(row, "machine", "Machine")?;
    let machine_no = required_text(row, "machineNo", "Machine number")?;
    let oem = required_text(row, "oem", "OEM")?;
    let part_no = required_text(row, "partNo", "Part number")?;
    let part_detail = required_text(row, "partDetail", "Part detail")?;
    let installed_quantity = quantity(row, "installedQuantity", "Installed quantity")?;
    let available_quantity = quantity(row, "availableQuantity", "Available quantity")?;

    Ok(ValidatedRow {
        area,
        machine,
        machine_no,
        oem,
        part_no,
        part_detail,
        installed_quantity,
        available_quantity,
    })
}

/// Exact key first, then a case-insensitive match on the trimmed header.
fn lookup<'a>(row: &'a RawRow, field: &str) -> Option<&'a Value> {
    row.get(field).or_else(|| {
        row.iter()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}

fn required_text(
    row: &RawRow,
    field: &'static str,
    label: &str,
) -> Result<String, ValidationError> {
    let text = match lookup(row, field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => number_to_text(n),
        _ => String::new(),
    };

    if text.is_empty() {
        return Err(ValidationError::new(field, format!("{} is required", label)));
    }
    Ok(text)
}

/// Spreadsheets store `12345` as a float; render integral values without `.0`.
fn number_to_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn quantity(row: &RawRow, field: &'static str, label: &str) -> Result<i32, ValidationError> {
    let number = match lookup(row, field) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(n.as_f64().ok_or_else(|| {
            ValidationError::new(field, format!("{} must be a number", label))
        })?),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().parse::<f64>().map_err(|_| {
            ValidationError::new(field, format!("{} must be a number", label))
        })?),
        Some(_) => {
            return Err(ValidationError::new(
                field,
                format!("{} must be a number", label),
            ));
        }
    };

    let number =
        number.ok_or_else(|| ValidationError::new(field, format!("{} is required", label)))?;

    if !number.is_finite() {
        return Err(ValidationError::new(
            field,
            format!("{} must be a number", label),
        ));
    }
    if number < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("{} must be non-negative", label),
        ));
    }
    if number.fract() != 0.0 || number > i32::MAX as f64 {
        return Err(ValidationError::new(
            field,
            format!("{} must be a whole number", label),
        ));
    }

    Ok(number as i32)
}
