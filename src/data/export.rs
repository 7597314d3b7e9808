use super::model::{format_float, CellValue, Table};
use crate::error::{DashboardError, DashboardResult};

/// Suggested name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "processed_data.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Serialize a table to UTF-8 CSV: header row, one record per row, no index.
pub fn to_csv_bytes(table: &Table) -> DashboardResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;
    for row in 0..table.row_count() {
        writer.write_record(table.columns().iter().map(|c| encode_cell(&c.values[row])))?;
    }

    writer
        .into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))
}

fn encode_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Float(v) => format_float(*v),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filters, init_filter_state, set_range};
    use crate::data::loader::parse_csv;

    const SAMPLE: &str = "id,category,value\n1,a,10.0\n2,b,20.0\n3,a,30.0\n";

    #[test]
    fn unfiltered_export_round_trips() {
        let input = "id,name,score,flag,note\n\
                     1,\"Lovelace, Ada\",98.5,True,\n\
                     2,Grace,,False,x\n\
                     3,Linus,70,True,\"multi\nline\"\n";
        let table = parse_csv(input.as_bytes()).unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        let reparsed = parse_csv(&bytes).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn export_reflects_active_filters() {
        let table = parse_csv(SAMPLE.as_bytes()).unwrap();
        let mut filters = init_filter_state(&table);
        set_range(&mut filters, "value", 15.0, 30.0);

        let bytes = to_csv_bytes(&apply_filters(&table, &filters)).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "id,category,value\n2,b,20.0\n3,a,30.0\n"
        );
    }

    #[test]
    fn nan_spelled_cells_round_trip_as_missing() {
        let table = parse_csv(b"id,v\n1,1.0\n2,NAN\n3,3.0\n").unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(bytes, b"id,v\n1,1.0\n2,\n3,3.0\n");
        assert_eq!(parse_csv(&bytes).unwrap(), table);
    }

    #[test]
    fn export_is_deterministic() {
        let table = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(to_csv_bytes(&table).unwrap(), to_csv_bytes(&table).unwrap());
        assert_eq!(to_csv_bytes(&table).unwrap(), SAMPLE.as_bytes());
    }

    #[test]
    fn empty_filter_result_keeps_header() {
        let table = parse_csv(SAMPLE.as_bytes()).unwrap();
        let bytes = to_csv_bytes(&table.take_rows(&[])).unwrap();
        assert_eq!(bytes, b"id,category,value\n");
    }
}
