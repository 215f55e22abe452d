use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::bind::Bind;

/// One row as ordered column name to value pairs.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    columns: IndexMap<SmolStr, Bind>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<SmolStr>>(&mut self, column: K, value: Bind) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Bind> {
        self.columns.get(column)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &Bind)> {
        self.columns
            .get_index(index)
            .map(|(column, value)| (column.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bind)> {
        self.columns
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    pub fn into_inner(self) -> IndexMap<SmolStr, Bind> {
        self.columns
    }
}

#[cfg(feature = "mysql")]
mod mysql {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use smol_str::SmolStr;
    use sqlx::{Column, Row, TypeInfo, ValueRef, mysql::MySqlRow};

    use super::Record;
    use crate::{bind::Bind, error::Error};

    impl Record {
        pub fn from_mysql_row(row: &MySqlRow) -> Result<Self, Error> {
            let mut record = Record::new();
            for (index, column) in row.columns().iter().enumerate() {
                record.insert(SmolStr::new(column.name()), column_value(row, index)?);
            }
            Ok(record)
        }
    }

    /// Decodes a single column of `row` by its server type.
    pub(crate) fn column_value(row: &MySqlRow, index: usize) -> Result<Bind, Error> {
        let name = row
            .try_column(index)
            .map_err(|err| Error::decode(index.to_string(), err.to_string()))?
            .name();
        let (is_null, type_name) = {
            let raw = row
                .try_get_raw(index)
                .map_err(|err| Error::decode(name, err.to_string()))?;
            (raw.is_null(), raw.type_info().name().to_owned())
        };
        if is_null {
            return Ok(Bind::Null);
        }
        decode_column(row, index, &type_name).map_err(|err| Error::decode(name, err.to_string()))
    }

    fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Bind, sqlx::Error> {
        let value = match type_name {
            "BOOLEAN" => Bind::Bool(row.try_get(index)?),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Bind::I64(row.try_get(index)?),
            "YEAR" => Bind::U64(u64::from(row.try_get_unchecked::<u16, _>(index)?)),
            name if name.ends_with(" UNSIGNED") => Bind::U64(row.try_get(index)?),
            "FLOAT" => Bind::F64(f64::from(row.try_get::<f32, _>(index)?)),
            "DOUBLE" => Bind::F64(row.try_get(index)?),
            // sent as text by the server
            "DECIMAL" | "JSON" => Bind::String(row.try_get_unchecked(index)?),
            "DATE" => Bind::String(date_text(row.try_get_unchecked(index)?)),
            "TIME" => Bind::String(time_text(row.try_get_unchecked(index)?)),
            // same binary layout, read both without the type check
            "DATETIME" | "TIMESTAMP" => Bind::String(datetime_text(row.try_get_unchecked(index)?)),
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                Bind::Bytes(row.try_get(index)?)
            }
            _ => match row.try_get::<String, _>(index) {
                Ok(value) => Bind::String(value),
                Err(err) => match row.try_get::<Vec<u8>, _>(index) {
                    Ok(bytes) => Bind::Bytes(bytes),
                    Err(_) => return Err(err),
                },
            },
        };
        Ok(value)
    }

    fn date_text(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    fn time_text(time: NaiveTime) -> String {
        time.format("%H:%M:%S%.f").to_string()
    }

    fn datetime_text(datetime: NaiveDateTime) -> String {
        datetime.format("%Y-%m-%d %H:%M:%S%.f").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_temporal_text_matches_server_format() {
            let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
            assert_eq!("2024-05-06", date_text(date));

            let datetime = date.and_hms_opt(7, 8, 9).unwrap();
            assert_eq!("2024-05-06 07:08:09", datetime_text(datetime));
            assert_eq!("07:08:09", time_text(datetime.time()));

            let precise = date.and_hms_micro_opt(23, 59, 1, 123_456).unwrap();
            assert_eq!("2024-05-06 23:59:01.123456", datetime_text(precise));
            assert_eq!("23:59:01.123456", time_text(precise.time()));
        }
    }
}

#[cfg(feature = "mysql")]
pub(crate) use mysql::column_value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_column_order() {
        let mut record = Record::new();
        record.insert("name", Bind::String("Bennett".into()));
        record.insert("email", Bind::Null);
        record.insert("id", Bind::I64(44));

        assert_eq!(3, record.len());
        assert_eq!(Some(&Bind::I64(44)), record.get("id"));
        assert_eq!(Some(("email", &Bind::Null)), record.get_index(1));
        let columns: Vec<&str> = record.iter().map(|(column, _)| column).collect();
        assert_eq!(vec!["name", "email", "id"], columns);
        assert_eq!(None, record.get("missing"));
    }
}
