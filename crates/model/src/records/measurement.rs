//! Column layout of the daily aggregate measurement export.

use crate::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use chrono::NaiveDate;

pub const MEASUREMENT_ENTITY: &str = "measurements";

/// Result column name paired with the header written to the export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementColumn {
    pub name: &'static str,
    pub header: &'static str,
}

pub const MEASUREMENT_COLUMNS: [MeasurementColumn; 6] = [
    MeasurementColumn {
        name: "device_id",
        header: "Device ID",
    },
    MeasurementColumn {
        name: "unit",
        header: "Unit",
    },
    MeasurementColumn {
        name: "location",
        header: "Location",
    },
    MeasurementColumn {
        name: "height",
        header: "Height",
    },
    MeasurementColumn {
        name: "measurement_day",
        header: "Measurement Day",
    },
    MeasurementColumn {
        name: "average_value",
        header: "Average Value",
    },
];

pub fn measurement_headers() -> Vec<String> {
    MEASUREMENT_COLUMNS
        .iter()
        .map(|c| c.header.to_string())
        .collect()
}

/// Typed view of one aggregate row. Optional columns stay `None` when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub device_id: Option<i64>,
    pub unit: Option<String>,
    pub location: Option<String>,
    pub height: Option<f64>,
    pub measurement_day: NaiveDate,
    pub average_value: f64,
}

impl Measurement {
    pub fn to_row_data(&self) -> RowData {
        let fields = vec![
            FieldValue::new(
                "device_id",
                self.device_id.map(Value::Int),
                DataType::Long,
            ),
            FieldValue::new(
                "unit",
                self.unit.clone().map(Value::String),
                DataType::String,
            ),
            FieldValue::new(
                "location",
                self.location.clone().map(Value::String),
                DataType::String,
            ),
            FieldValue::new("height", self.height.map(Value::Float), DataType::Double),
            FieldValue::new(
                "measurement_day",
                Some(Value::Date(self.measurement_day)),
                DataType::Date,
            ),
            FieldValue::new(
                "average_value",
                Some(Value::Float(self.average_value)),
                DataType::Double,
            ),
        ];
        RowData::new(MEASUREMENT_ENTITY, fields)
    }
}
