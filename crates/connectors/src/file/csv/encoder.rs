use chrono::SecondsFormat;
use model::core::value::{FieldValue, Value};

/// Renders values as CSV cells. Quoting is left to the `csv` writer.
#[derive(Debug, Clone)]
pub struct CsvValueEncoder {
    float_precision: usize,
}

impl CsvValueEncoder {
    pub fn new(float_precision: usize) -> Self {
        Self { float_precision }
    }

    pub fn encode_value(&self, value: &Value) -> String {
        match value {
            Value::Null => self.encode_null(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => format!("{:.*}", self.float_precision, v),
            Value::String(s) => s.clone(),
            Value::Boolean(v) => v.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Timestamp(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            Value::TimestampNaive(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Absent values are written as an empty field, never as a `NULL` literal.
    pub fn encode_null(&self) -> String {
        String::new()
    }

    pub fn encode_field(&self, field: &FieldValue) -> String {
        match field.present() {
            Some(value) => self.encode_value(value),
            None => self.encode_null(),
        }
    }
}

impl Default for CsvValueEncoder {
    fn default() -> Self {
        Self::new(2)
    }
}
