//! Line codec for the backing file.
//!
//! Format: UTF-8, one `region_key,region_name,rate` record per line, with an
//! optional header line. Commas inside fields are not escaped.

use crate::model::tax::TaxRecord;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Header written as the first line of every committed file.
pub const HEADER_LINE: &str = "region_key,region_name,rate";

/// Outcome of parsing a backing file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Parsed records keyed by region key. Later lines win on key collision.
    pub records: HashMap<String, TaxRecord>,
    /// 1-based line numbers that were dropped with a warning.
    pub skipped_lines: Vec<usize>,
}

/// Parses file content into records.
///
/// # Invariants
/// - One bad line never aborts the load.
/// - Lines with fewer than three fields and blank lines are ignored silently.
/// - Unparseable rates and blank key/name fields are skipped with a warning.
pub fn parse_records(content: &str) -> LoadReport {
    let mut report = LoadReport::default();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        if line_no == 1 && is_header(line) {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 3 {
            continue;
        }

        let region_key = fields[0].trim();
        let region_name = fields[1].trim();
        let rate_text = fields[2].trim();

        let rate = match Decimal::from_str(rate_text) {
            Ok(rate) => rate,
            Err(err) => {
                warn!(
                    "event=load_skip_line module=storage status=skipped line={} reason=invalid_rate value={:?} error={}",
                    line_no, rate_text, err
                );
                report.skipped_lines.push(line_no);
                continue;
            }
        };

        let record = TaxRecord::new(region_key, region_name, rate);
        if let Err(err) = record.validate() {
            warn!(
                "event=load_skip_line module=storage status=skipped line={} reason=invalid_record error={}",
                line_no, err
            );
            report.skipped_lines.push(line_no);
            continue;
        }

        if report.records.contains_key(region_key) {
            warn!(
                "event=load_duplicate_key module=storage status=replaced line={} key={}",
                line_no, region_key
            );
        }
        report.records.insert(record.region_key.clone(), record);
    }

    report
}

/// Serializes records into full file content, header first.
///
/// Records are emitted sorted by key so identical snapshots produce identical
/// bytes.
pub fn serialize_records<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a TaxRecord>,
{
    let mut sorted: Vec<&TaxRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| a.region_key.cmp(&b.region_key));

    let mut out = String::with_capacity(HEADER_LINE.len() + 1 + sorted.len() * 32);
    out.push_str(HEADER_LINE);
    out.push('\n');
    for record in sorted {
        out.push_str(&record.region_key);
        out.push(',');
        out.push_str(&record.region_name);
        out.push(',');
        // Decimal's Display never uses exponent notation and keeps scale.
        out.push_str(&record.rate.to_string());
        out.push('\n');
    }
    out
}

fn is_header(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(HEADER_LINE)
}

#[cfg(test)]
mod tests {
    use super::{parse_records, serialize_records, HEADER_LINE};
    use crate::model::tax::TaxRecord;
    use rust_decimal::Decimal;

    #[test]
    fn parse_skips_header_and_trims_fields() {
        let report = parse_records("region_key,region_name,rate\n CA , California , 7.25 \n");
        assert!(report.skipped_lines.is_empty());
        let ca = &report.records["CA"];
        assert_eq!(ca.region_name, "California");
        assert_eq!(ca.rate, Decimal::new(725, 2));
    }

    #[test]
    fn parse_reads_first_line_when_it_is_not_a_header() {
        let report = parse_records("TX,Texas,6.25\nWA,Washington,6.5\n");
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn parse_ignores_short_and_blank_lines_silently() {
        let report = parse_records("CA,California\n\n   \nOH,Ohio,5.75\n");
        assert_eq!(report.records.len(), 1);
        assert!(report.skipped_lines.is_empty());
    }

    #[test]
    fn parse_skips_bad_rate_and_keeps_going() {
        let report = parse_records("CA,California,seven\nNY,New York,4.00\nKY,Kentucky,N/A\n");
        assert_eq!(report.skipped_lines, vec![1, 3]);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records["NY"].rate.to_string(), "4.00");
    }

    #[test]
    fn parse_skips_blank_key_and_last_duplicate_wins() {
        let report = parse_records(" ,Nowhere,1.0\nCA,California,7.25\nCA,California,8.00\n");
        assert_eq!(report.skipped_lines, vec![1]);
        assert_eq!(report.records["CA"].rate.to_string(), "8.00");
    }

    #[test]
    fn serialize_writes_header_and_sorted_plain_decimals() {
        let records = [
            TaxRecord::new("NY", "New York", Decimal::new(400, 2)),
            TaxRecord::new("CA", "California", Decimal::new(725, 2)),
            TaxRecord::new("OR", "Oregon", Decimal::new(1, 10)),
        ];
        let content = serialize_records(records.iter());
        assert_eq!(
            content,
            format!(
                "{HEADER_LINE}\nCA,California,7.25\nNY,New York,4.00\nOR,Oregon,0.0000000001\n"
            )
        );
    }
}
