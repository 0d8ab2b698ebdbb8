use crate::sql::base::error::DbError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use std::fmt;
use tokio_postgres::Row as PgRow;
use tracing::warn;

/// Decodes a Postgres result row into the driver-agnostic `RowData`.
///
/// SQL NULL is kept as `None` on the field rather than a sentinel value, so
/// that writers can tell an absent value from an empty string.
pub struct DbRow<'a> {
    row: &'a PgRow,
}

impl<'a> DbRow<'a> {
    pub fn new(row: &'a PgRow) -> Self {
        DbRow { row }
    }

    pub fn to_row_data(&self, entity: &str) -> Result<RowData, DbError> {
        let fields = self
            .row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let type_name = column.type_().name();
                let data_type = DataType::from_postgres_type(type_name).unwrap_or_else(|_| {
                    warn!("Unknown column type: {}", type_name);
                    DataType::Custom(type_name.to_string())
                });
                let value = self.get_value(&data_type, idx, column.name())?;
                Ok(FieldValue::new(column.name(), value, data_type))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(RowData::new(entity, fields))
    }

    fn get_value(
        &self,
        data_type: &DataType,
        idx: usize,
        name: &str,
    ) -> Result<Option<Value>, DbError> {
        let value = match data_type {
            DataType::Short => self.try_get::<i16>(idx)?.map(|v| Value::Int(v as i64)),
            DataType::Int => self.try_get::<i32>(idx)?.map(|v| Value::Int(v as i64)),
            DataType::Long => self.try_get::<i64>(idx)?.map(Value::Int),
            DataType::Float => self.try_get::<f32>(idx)?.map(|v| Value::Float(v as f64)),
            DataType::Double => self.try_get::<f64>(idx)?.map(Value::Float),
            DataType::Boolean => self.try_get::<bool>(idx)?.map(Value::Boolean),
            DataType::Date => self.try_get::<NaiveDate>(idx)?.map(Value::Date),
            DataType::Timestamp => self
                .try_get::<NaiveDateTime>(idx)?
                .map(Value::TimestampNaive),
            DataType::TimestampTz => self.try_get::<DateTime<Utc>>(idx)?.map(Value::Timestamp),
            DataType::String | DataType::VarChar | DataType::Char => {
                self.try_get::<String>(idx)?.map(Value::String)
            }
            DataType::Null => None,
            DataType::Decimal | DataType::Custom(_) => {
                return Err(DbError::UnsupportedType {
                    column: name.to_string(),
                    data_type: data_type.to_string(),
                });
            }
        };
        Ok(value)
    }

    fn try_get<T>(&self, idx: usize) -> Result<Option<T>, DbError>
    where
        T: for<'r> tokio_postgres::types::FromSql<'r>,
    {
        Ok(self.row.try_get::<_, Option<T>>(idx)?)
    }
}

impl fmt::Debug for DbRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.row)
    }
}
