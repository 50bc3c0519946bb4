use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::constants::DATE_FORMAT;
use crate::error::{GenerateError, Result};
use crate::types::{Customer, Metadata, Product};

/// Read the `|`-delimited seed file at `path`.
///
/// Customer lines are `id|YYYY-MM-DD`; product lines are
/// `id|name|spec|price|code` with the code optional. A join date that does not
/// parse is replaced by `floor_date`. A price that does not parse aborts the load.
pub fn load_metadata(path: &Path, floor_date: NaiveDate) -> Result<Metadata> {
    let file = File::open(path).map_err(|source| GenerateError::MetadataOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = parse_metadata(BufReader::new(file), floor_date)?;
    info!(
        "Loaded {} customers and {} products",
        metadata.customers.len(),
        metadata.products.len()
    );
    Ok(metadata)
}

pub fn parse_metadata<R: BufRead>(reader: R, floor_date: NaiveDate) -> Result<Metadata> {
    let mut metadata = Metadata::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 1;

        let parts: Vec<&str> = line.split('|').collect();
        match parts.len() {
            2 => metadata.customers.push(parse_customer(&parts, floor_date, line_no)),
            n if n >= 4 => metadata.products.push(parse_product(&parts, line_no)?),
            n => warn!(line = line_no, fields = n, "Skipping unrecognized metadata line"),
        }
    }

    if metadata.customers.is_empty() {
        return Err(GenerateError::NoCustomers);
    }

    Ok(metadata)
}

fn parse_customer(parts: &[&str], floor_date: NaiveDate, line_no: usize) -> Customer {
    let join_date = match NaiveDate::parse_from_str(parts[1], DATE_FORMAT) {
        Ok(date) => date,
        Err(e) => {
            debug!(
                line = line_no,
                value = parts[1],
                "Unparseable join date ({}), using {}",
                e,
                floor_date
            );
            floor_date
        }
    };

    Customer {
        id: parts[0].to_string(),
        join_date,
    }
}

fn parse_product(parts: &[&str], line_no: usize) -> Result<Product> {
    let unit_price = parts[3]
        .trim()
        .parse::<i64>()
        .map_err(|source| GenerateError::InvalidPrice {
            line: line_no,
            value: parts[3].to_string(),
            source,
        })?;

    Ok(Product {
        id: parts[0].to_string(),
        name: parts[1].to_string(),
        specification: parts[2].to_string(),
        unit_price,
        code: parts.get(4).map(|c| c.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn floor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 1, 1).unwrap()
    }

    #[test]
    fn test_parses_customers_and_products_in_order() {
        let input = "C1|2020-01-01\nP1|Widget|SpecA|100|CODE1\n\nC2|2025-01-01\nP2|Gadget|SpecB|250\n";
        let metadata = parse_metadata(Cursor::new(input), floor()).unwrap();

        assert_eq!(metadata.customers.len(), 2);
        assert_eq!(metadata.customers[0].id, "C1");
        assert_eq!(
            metadata.customers[1].join_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );

        assert_eq!(metadata.products.len(), 2);
        assert_eq!(
            metadata.products[0],
            Product {
                id: "P1".to_string(),
                name: "Widget".to_string(),
                specification: "SpecA".to_string(),
                unit_price: 100,
                code: "CODE1".to_string(),
            }
        );
        assert_eq!(metadata.products[1].code, "");
    }

    #[test]
    fn test_bad_join_date_falls_back_to_floor() {
        let input = "C1|not-a-date\nC2|2021-13-45\n";
        let metadata = parse_metadata(Cursor::new(input), floor()).unwrap();
        assert!(metadata.customers.iter().all(|c| c.join_date == floor()));
    }

    #[test]
    fn test_early_join_date_is_kept_as_read() {
        // Clamping to the floor happens at emission time.
        let input = "C1|2001-05-05\n";
        let metadata = parse_metadata(Cursor::new(input), floor()).unwrap();
        assert_eq!(
            metadata.customers[0].join_date,
            NaiveDate::from_ymd_opt(2001, 5, 5).unwrap()
        );
    }

    #[test]
    fn test_bad_price_is_fatal() {
        let input = "C1|2020-01-01\nP1|Widget|SpecA|cheap|CODE1\n";
        match parse_metadata(Cursor::new(input), floor()) {
            Err(GenerateError::InvalidPrice { line, value, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(value, "cheap");
            }
            other => panic!("expected InvalidPrice, got {:?}", other),
        }
    }

    #[test]
    fn test_price_with_padding_is_accepted() {
        let input = "C1|2020-01-01\nP1|Widget|SpecA| 100 |CODE1\n";
        let metadata = parse_metadata(Cursor::new(input), floor()).unwrap();
        assert_eq!(metadata.products[0].unit_price, 100);
    }

    #[test]
    fn test_no_customers_is_fatal() {
        let input = "P1|Widget|SpecA|100|CODE1\n";
        let result = parse_metadata(Cursor::new(input), floor());
        assert!(matches!(result, Err(GenerateError::NoCustomers)));
    }

    #[test]
    fn test_odd_field_counts_are_skipped() {
        let input = "lonely\nA|B|C\nC1|2020-01-01\nP1|Widget|SpecA|100|CODE1|extra\n";
        let metadata = parse_metadata(Cursor::new(input), floor()).unwrap();
        assert_eq!(metadata.customers.len(), 1);
        assert_eq!(metadata.products.len(), 1);
        assert_eq!(metadata.products[0].code, "CODE1");
    }

    #[test]
    fn test_whitespace_around_lines_is_trimmed() {
        let input = "  C1|2020-01-01  \r\n\t\nP1|Widget|SpecA|100|CODE1\r\n";
        let metadata = parse_metadata(Cursor::new(input), floor()).unwrap();
        assert_eq!(metadata.customers[0].id, "C1");
        assert_eq!(metadata.products[0].code, "CODE1");
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let result = load_metadata(Path::new("/no/such/metadata.txt"), floor());
        assert!(matches!(result, Err(GenerateError::MetadataOpen { .. })));
    }
}
