use std::io::Write;

use anyhow::{Context, Result};

use super::record::{ContactRecord, new_contact_id, parse_tag_list};

const EXPORT_HEADER: [&str; 8] = [
    "First Name",
    "Last Name",
    "E-mail Address",
    "Business Phone",
    "Business Street",
    "Company",
    "Job Title",
    "Categories",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    Company,
    Title,
    Categories,
}

impl Column {
    fn for_header(header: &str) -> Option<Self> {
        let header = header.trim_start_matches('\u{feff}').trim().to_lowercase();
        match header.as_str() {
            "first name" => Some(Self::FirstName),
            "last name" => Some(Self::LastName),
            "job title" | "title" => Some(Self::Title),
            "categories" => Some(Self::Categories),
            _ if header.contains("email") || header.contains("e-mail") => Some(Self::Email),
            _ if header.contains("phone") => Some(Self::Phone),
            _ if header.contains("address") || header.contains("street") => Some(Self::Address),
            _ if header.contains("company") => Some(Self::Company),
            _ => None,
        }
    }
}

/// Rows are not validated against the header: missing cells become blank
/// fields. When several headers map to the same field the first non-empty
/// cell wins.
pub fn import_csv(text: &str) -> Vec<ContactRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = match reader.headers() {
        Ok(header) => header.iter().map(Column::for_header).collect::<Vec<_>>(),
        Err(error) => {
            tracing::warn!("unreadable CSV header: {error}");
            return Vec::new();
        }
    };

    reader
        .records()
        .filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(error) => {
                tracing::warn!("skipping malformed CSV row: {error}");
                None
            }
        })
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| record_from_row(&columns, &row))
        .collect()
}

fn record_from_row(columns: &[Option<Column>], row: &csv::StringRecord) -> ContactRecord {
    let mut record = ContactRecord {
        id: new_contact_id(),
        ..ContactRecord::default()
    };

    for (column, cell) in columns.iter().zip(row.iter()) {
        let Some(column) = column else {
            continue;
        };
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }

        let field = match column {
            Column::FirstName => &mut record.first_name,
            Column::LastName => &mut record.last_name,
            Column::Email => &mut record.email,
            Column::Phone => &mut record.phone,
            Column::Address => &mut record.address,
            Column::Company => &mut record.company,
            Column::Title => &mut record.title,
            Column::Categories => {
                if record.tags.is_empty() {
                    record.tags = parse_tag_list(cell, ';');
                }
                continue;
            }
        };
        if field.is_empty() {
            *field = cell.to_owned();
        }
    }

    record
}

pub fn write_csv<W: Write>(writer: W, records: &[ContactRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADER)
        .context("failed to write CSV header")?;

    for record in records {
        let tags = record.tags.join(";");
        wtr.write_record([
            record.first_name.as_str(),
            record.last_name.as_str(),
            record.email.as_str(),
            record.phone.as_str(),
            record.address.as_str(),
            record.company.as_str(),
            record.title.as_str(),
            tags.as_str(),
        ])
        .context("failed to write CSV row")?;
    }

    wtr.flush().context("failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imports_categories_as_tags() {
        let records = import_csv("First Name,Last Name,Categories\nJane,Roe,vip;client");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_name, "Jane");
        assert_eq!(records[0].last_name, "Roe");
        assert_eq!(records[0].tags, vec!["vip".to_owned(), "client".to_owned()]);
        assert!(!records[0].id.is_empty());
    }

    #[test]
    fn byte_order_mark_does_not_hide_first_column() {
        let records = import_csv("\u{feff}First Name,Last Name,Categories\nJane,Roe,vip;client");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_name, "Jane");
        assert_eq!(records[0].last_name, "Roe");
        assert_eq!(records[0].tags, vec!["vip".to_owned(), "client".to_owned()]);
    }

    #[test]
    fn quoted_cells_keep_commas_and_newlines() {
        let records = import_csv("First Name,Business Street\n\"Ann\",\"1 Main St,\nApt 2\"\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, "1 Main St,\nApt 2");
    }

    #[test]
    fn header_matching_is_case_insensitive_and_fuzzy() {
        let text = "first name,E-mail Address,Mobile Phone,Home Street,Company Name,JOB TITLE\r\n\
                    Ann,ann@example.com,555,1 Main St,Acme,CTO\r\n";
        let records = import_csv(text);
        assert_eq!(records.len(), 1);
        let ann = &records[0];
        assert_eq!(ann.first_name, "Ann");
        assert_eq!(ann.email, "ann@example.com");
        assert_eq!(ann.phone, "555");
        assert_eq!(ann.address, "1 Main St");
        assert_eq!(ann.company, "Acme");
        assert_eq!(ann.title, "CTO");
    }

    #[test]
    fn first_non_empty_duplicate_column_wins() {
        let records = import_csv("Business Phone,Home Phone\n,222\n111,222");
        assert_eq!(records[0].phone, "222");
        assert_eq!(records[1].phone, "111");
    }

    #[test]
    fn short_rows_leave_blank_fields() {
        let records = import_csv("First Name,Last Name,Company\nSolo\n\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].first_name, "Solo");
        assert_eq!(records[0].last_name, "");
        assert_eq!(records[0].company, "");
    }

    #[test]
    fn header_only_imports_nothing() {
        assert!(import_csv("First Name,Last Name").is_empty());
        assert!(import_csv("").is_empty());
    }

    #[test]
    fn export_uses_fixed_header_and_quotes_commas() {
        let record = ContactRecord {
            first_name: "Jane".into(),
            last_name: "Roe".into(),
            address: "1 Main St, Springfield".into(),
            tags: vec!["vip".into(), "client".into()],
            ..ContactRecord::default()
        };
        let mut out = Vec::new();
        write_csv(&mut out, &[record]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "First Name,Last Name,E-mail Address,Business Phone,Business Street,Company,Job Title,Categories"
            )
        );
        assert_eq!(
            lines.next(),
            Some("Jane,Roe,,,\"1 Main St, Springfield\",,,vip;client")
        );
    }

    #[test]
    fn exported_text_imports_back() {
        let record = ContactRecord {
            first_name: "Said \"Sam\"".into(),
            email: "sam@example.com".into(),
            company: "Foo, Inc".into(),
            tags: vec!["a".into()],
            ..ContactRecord::default()
        };
        let mut out = Vec::new();
        write_csv(&mut out, std::slice::from_ref(&record)).unwrap();
        let imported = import_csv(&String::from_utf8(out).unwrap());
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].first_name, record.first_name);
        assert_eq!(imported[0].email, record.email);
        assert_eq!(imported[0].company, record.company);
        assert_eq!(imported[0].tags, record.tags);
    }
}
