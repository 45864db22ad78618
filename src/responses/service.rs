use std::collections::HashMap;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use crate::error::ApiError;
use crate::responses::columns::{ColumnSetter, EXPORT_COLUMNS, IMPORT_COLUMNS};
use crate::responses::repo::{SurveyFields, SurveyResponse};

/// Sentinel the survey tool emits for unanswered location questions.
const LOCATION_SENTINEL: &str = "N/A";

/// Parse an uploaded semicolon-CSV export into importable answer sets.
///
/// Rows whose mapped location is empty or the `N/A` sentinel are dropped,
/// as are rows the CSV parser rejects; headers not present in the column
/// table are ignored. Only a non-CSV payload is an error.
pub fn parse_import(raw: &[u8]) -> Result<Vec<SurveyFields>, ApiError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| ApiError::InvalidFormat("File must be UTF-8 encoded".into()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ApiError::InvalidFormat(format!("Error importing CSV: {e}")))?
        .clone();

    // Resolve the fixed column table against the positions actually present
    // in this file; absent headers leave their fields empty.
    let setters: Vec<(usize, ColumnSetter)> = IMPORT_COLUMNS
        .iter()
        .filter_map(|(header, setter)| {
            headers
                .iter()
                .position(|h| h == *header)
                .map(|idx| (idx, *setter))
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            // A malformed row is skipped; everything mapped so far stands.
            Err(_) => continue,
        };
        let mut fields = SurveyFields::default();
        for (idx, setter) in &setters {
            match record.get(*idx) {
                Some(value) if !value.is_empty() => setter(&mut fields, value.to_string()),
                _ => {}
            }
        }
        if fields
            .location
            .as_deref()
            .is_some_and(|l| l != LOCATION_SENTINEL)
        {
            rows.push(fields);
        }
    }
    debug!(rows = rows.len(), "csv rows mapped");
    Ok(rows)
}

/// Serialize all records to CSV with the fixed schema column order.
pub fn export_csv(records: &[SurveyResponse]) -> Result<String, ApiError> {
    if records.is_empty() {
        return Err(ApiError::NoData);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| ApiError::Internal(e.into()))?;
    for record in records {
        writer
            .write_record(export_record(record)?)
            .map_err(|e| ApiError::Internal(e.into()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.into()))
}

/// One CSV row, cell-for-cell aligned with [`EXPORT_COLUMNS`].
fn export_record(response: &SurveyResponse) -> Result<Vec<String>, ApiError> {
    let f = &response.fields;
    let cell = |v: &Option<String>| v.clone().unwrap_or_default();

    let mut out = Vec::with_capacity(EXPORT_COLUMNS.len());
    out.push(response.id.to_string());
    out.extend([
        cell(&f.location),
        cell(&f.age_group),
        cell(&f.household_size),
        cell(&f.satisfaction),
        cell(&f.future_outlook),
        cell(&f.topics_housing),
        cell(&f.topics_security),
        cell(&f.topics_education),
        cell(&f.topics_traffic),
        cell(&f.topics_environment),
        cell(&f.topics_community),
        cell(&f.social_media_usage),
        cell(&f.facebook),
        cell(&f.instagram),
        cell(&f.tiktok),
        cell(&f.youtube),
        cell(&f.whatsapp),
        cell(&f.info_source_social),
        cell(&f.info_source_print),
        cell(&f.info_source_tv),
        cell(&f.info_source_newsletter),
        cell(&f.info_source_events),
        cell(&f.political_representation),
        cell(&f.kiezmacher_known),
        cell(&f.engagement_wish),
        cell(&f.future_wishes),
    ]);
    out.push(format_timestamp(response.created_at)?);
    out.push(response.created_by.clone());
    out.push(
        response
            .updated_at
            .map(format_timestamp)
            .transpose()?
            .unwrap_or_default(),
    );
    out.push(cell(&response.updated_by));
    out.push(cell(&response.import_source));
    Ok(out)
}

fn format_timestamp(ts: OffsetDateTime) -> Result<String, ApiError> {
    ts.format(&Rfc3339).map_err(|e| ApiError::Internal(e.into()))
}

/// Count-by-distinct-value aggregation, descending by count. Null and
/// empty values are excluded; ties order by value so output is stable.
pub fn distribution<'a, I>(values: I) -> Vec<(String, i64)>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for value in values.into_iter().flatten() {
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    let mut buckets: Vec<(String, i64)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    const LOCATION_HEADER: &str = "Q00. In welchem Kiez wohnen Sie?";
    const AGE_HEADER: &str = "Q001. Wie alt sind Sie?";

    fn sample_response(location: &str) -> SurveyResponse {
        SurveyResponse {
            id: Uuid::new_v4(),
            fields: SurveyFields {
                location: Some(location.into()),
                age_group: Some("18-29".into()),
                future_wishes: Some("mehr Grünflächen, weniger Verkehr".into()),
                ..Default::default()
            },
            created_at: datetime!(2025-06-01 12:00 UTC),
            created_by: "admin".into(),
            updated_at: None,
            updated_by: None,
            import_source: Some("csv_upload".into()),
        }
    }

    #[test]
    fn import_keeps_only_rows_with_a_real_location() {
        let csv_text = format!(
            "{LOCATION_HEADER};{AGE_HEADER}\nMitte;18-29\nN/A;30-39\n;40-49\n"
        );
        let rows = parse_import(csv_text.as_bytes()).expect("parse csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location.as_deref(), Some("Mitte"));
        assert_eq!(rows[0].age_group.as_deref(), Some("18-29"));
    }

    #[test]
    fn import_ignores_unknown_headers_and_missing_columns() {
        let csv_text = format!("Unbekannte Spalte;{LOCATION_HEADER}\nfoo;Neukölln\n");
        let rows = parse_import(csv_text.as_bytes()).expect("parse csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location.as_deref(), Some("Neukölln"));
        // No age column in the file, so the field stays empty.
        assert!(rows[0].age_group.is_none());
    }

    #[test]
    fn import_strips_a_leading_bom() {
        let csv_text = format!("\u{feff}{LOCATION_HEADER}\nKreuzberg\n");
        let rows = parse_import(csv_text.as_bytes()).expect("parse csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location.as_deref(), Some("Kreuzberg"));
    }

    #[test]
    fn import_rejects_non_utf8_payloads() {
        let err = parse_import(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidFormat(_)));
    }

    #[test]
    fn export_fails_on_empty_store() {
        let err = export_csv(&[]).unwrap_err();
        assert!(matches!(err, ApiError::NoData));
    }

    #[test]
    fn export_record_aligns_with_the_header() {
        let record = export_record(&sample_response("Mitte")).expect("render record");
        assert_eq!(record.len(), EXPORT_COLUMNS.len());
    }

    #[test]
    fn export_roundtrips_field_values() {
        let response = sample_response("Mitte");
        let csv_data = export_csv(std::slice::from_ref(&response)).expect("export csv");

        let mut reader = csv::Reader::from_reader(csv_data.as_bytes());
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_COLUMNS.to_vec());

        let row = reader
            .records()
            .next()
            .expect("one data row")
            .expect("valid row");
        let cell = |name: &str| {
            let idx = headers.iter().position(|h| h == name).expect("known column");
            row.get(idx).expect("cell")
        };
        assert_eq!(cell("id"), response.id.to_string());
        assert_eq!(cell("location"), "Mitte");
        assert_eq!(cell("age_group"), "18-29");
        assert_eq!(cell("future_wishes"), "mehr Grünflächen, weniger Verkehr");
        assert_eq!(cell("satisfaction"), "");
        assert_eq!(cell("created_by"), "admin");
        assert_eq!(cell("updated_at"), "");
        assert_eq!(cell("import_source"), "csv_upload");
        let parsed = OffsetDateTime::parse(cell("created_at"), &Rfc3339).expect("rfc3339");
        assert_eq!(parsed, response.created_at);
    }

    #[test]
    fn distribution_counts_descending() {
        let buckets = distribution(["A", "A", "B"].into_iter().map(Some));
        assert_eq!(buckets, vec![("A".to_string(), 2), ("B".to_string(), 1)]);
    }

    #[test]
    fn distribution_excludes_null_and_empty_values() {
        let values = vec![Some("Mitte"), None, Some(""), Some("Mitte"), Some("Pankow")];
        let buckets = distribution(values);
        assert_eq!(
            buckets,
            vec![("Mitte".to_string(), 2), ("Pankow".to_string(), 1)]
        );
    }

    #[test]
    fn distribution_orders_ties_by_value() {
        let buckets = distribution(["B", "A", "C", "A"].into_iter().map(Some));
        assert_eq!(
            buckets,
            vec![
                ("A".to_string(), 2),
                ("B".to_string(), 1),
                ("C".to_string(), 1)
            ]
        );
    }
}
