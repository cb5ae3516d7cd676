//! CSV rendering of tables and record lists.
//!
//! Cells are quoted only when they contain a comma, a quote or a line break;
//! embedded quotes are doubled. Output is deterministic for a given input.

use crate::extract::Record;
use csv::{QuoteStyle, WriterBuilder};
use itertools::Itertools;

/// Render `rows` under `headers`. An empty `headers` writes no header line.
pub fn to_csv(headers: &[String], rows: &[Vec<String>]) -> Result<String, csv::Error> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(Vec::new());
    if !headers.is_empty() {
        wtr.write_record(headers)?;
    }
    for row in rows {
        wtr.write_record(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render records as CSV. Without explicit `headers`, the first record's keys
/// are used, in order.
pub fn records_to_csv(records: &[Record], headers: Option<&[String]>) -> Result<String, csv::Error> {
    let headers: Vec<String> = match headers {
        Some(h) => h.to_vec(),
        None => records
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default(),
    };
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| headers.iter().map(|h| r.cell(h)).collect())
        .collect();
    to_csv(&headers, &rows)
}

/// Every key used by any record, in order of first appearance.
pub fn union_keys(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.keys())
        .unique()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn quotes_only_when_needed() {
        let out = to_csv(&s(&["a", "b"]), &[s(&["plain", "He said, \"hi\""])]).unwrap();
        assert_eq!(out, "a,b\nplain,\"He said, \"\"hi\"\"\"\n");
    }

    #[test]
    fn tricky_cells_round_trip_through_a_csv_reader() {
        let cell = "He said, \"hi\"\nand left";
        let out = to_csv(&s(&["note"]), &[vec![cell.to_string()]]).unwrap();
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], cell);
    }

    #[test]
    fn headers_inferred_from_first_record() {
        let records = vec![
            Record::builder().text("home", "Atocha").text("away", "Deusto").build(),
            Record::builder().text("home", "Triana").text("score", "1-0").build(),
        ];
        let out = records_to_csv(&records, None).unwrap();
        assert_eq!(out, "home,away\nAtocha,Deusto\nTriana,\n");
    }

    #[test]
    fn union_keys_keeps_first_appearance_order() {
        let records = vec![
            Record::builder().text("home", "A").text("away", "B").build(),
            Record::builder().text("home", "C").text("score", "1-0").build(),
        ];
        assert_eq!(union_keys(&records), s(&["home", "away", "score"]));
        let out = records_to_csv(&records, Some(&union_keys(&records))).unwrap();
        assert_eq!(out, "home,away,score\nA,B,\nC,,1-0\n");
    }

    #[test]
    fn headerless_tables_write_rows_only() {
        let out = to_csv(&[], &[s(&["1", "x"])]).unwrap();
        assert_eq!(out, "1,x\n");
    }
}
