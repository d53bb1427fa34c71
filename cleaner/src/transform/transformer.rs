//! Record transformer
//!
//! Turns the concatenated raw records into the client, campaign and
//! economics tables. Row order is preserved and every table gets exactly
//! one row per input record.

use super::date::last_contact_date;
use super::rules::{apply_all, CleaningRules, CompiledRules};
use crate::error::TransformResult;
use crate::models::{CampaignRow, CleanedTables, ClientId, ClientRow, EconomicsRow, RawRecord};

/// Pair each record with its `client_id`: its 0-based position in the
/// concatenated input. Any identifier carried by the source is ignored.
pub fn assign_client_ids(
    records: &[RawRecord],
) -> impl Iterator<Item = (ClientId, &RawRecord)> + '_ {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| (idx as ClientId, record))
}

/// Applies a [`CleaningRules`] set to raw records.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    rules: CompiledRules,
}

impl RecordTransformer {
    /// Compile `rules`; an invalid rule fails here, before any row is seen.
    pub fn new(rules: &CleaningRules) -> TransformResult<Self> {
        Ok(Self {
            rules: rules.compile()?,
        })
    }

    /// Clean one record's client attributes.
    pub fn client_row(&self, client_id: ClientId, record: &RawRecord) -> ClientRow {
        let rules = &self.rules;
        ClientRow {
            client_id,
            age: record.age,
            job: apply_all(&rules.job, record.job.as_deref()),
            marital: apply_all(&rules.marital, record.marital.as_deref()),
            education: apply_all(&rules.education, record.education.as_deref()),
            credit_default: rules.credit_default.apply(record.credit_default.as_deref()),
            mortgage: rules.mortgage.apply(record.mortgage.as_deref()),
        }
    }

    /// Clean one record's campaign attributes.
    pub fn campaign_row(&self, client_id: ClientId, record: &RawRecord) -> TransformResult<CampaignRow> {
        let rules = &self.rules;
        Ok(CampaignRow {
            client_id,
            number_contacts: record.number_contacts,
            contact_duration: record.contact_duration,
            previous_campaign_contacts: record.previous_campaign_contacts,
            previous_outcome: rules.previous_outcome.apply(record.previous_outcome.as_deref()),
            campaign_outcome: rules.campaign_outcome.apply(record.campaign_outcome.as_deref()),
            last_contact_date: last_contact_date(
                client_id,
                rules.contact_year,
                &record.month,
                record.day,
            )?,
        })
    }

    /// Copy one record's economic indicators.
    pub fn economics_row(&self, client_id: ClientId, record: &RawRecord) -> EconomicsRow {
        EconomicsRow {
            client_id,
            cons_price_idx: record.cons_price_idx,
            euribor_three_months: record.euribor_three_months,
        }
    }

    pub fn client_table(&self, records: &[RawRecord]) -> Vec<ClientRow> {
        assign_client_ids(records)
            .map(|(id, record)| self.client_row(id, record))
            .collect()
    }

    /// Fails on the first record whose month can't be resolved.
    pub fn campaign_table(&self, records: &[RawRecord]) -> TransformResult<Vec<CampaignRow>> {
        assign_client_ids(records)
            .map(|(id, record)| self.campaign_row(id, record))
            .collect()
    }

    pub fn economics_table(&self, records: &[RawRecord]) -> Vec<EconomicsRow> {
        assign_client_ids(records)
            .map(|(id, record)| self.economics_row(id, record))
            .collect()
    }

    /// Build all three tables, or nothing if any record fails.
    pub fn transform(&self, records: &[RawRecord]) -> TransformResult<CleanedTables> {
        let mut tables = CleanedTables {
            client: Vec::with_capacity(records.len()),
            campaign: Vec::with_capacity(records.len()),
            economics: Vec::with_capacity(records.len()),
        };

        for (client_id, record) in assign_client_ids(records) {
            tables.campaign.push(self.campaign_row(client_id, record)?);
            tables.client.push(self.client_row(client_id, record));
            tables.economics.push(self.economics_row(client_id, record));
        }

        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::transform::rules::Operation;

    fn default_transformer() -> RecordTransformer {
        RecordTransformer::new(&CleaningRules::default()).unwrap()
    }

    fn record(job: &str, education: &str, month: &str, day: i64) -> RawRecord {
        RawRecord {
            age: 41,
            job: Some(job.to_string()).filter(|s| !s.is_empty()),
            marital: Some("married".to_string()),
            education: Some(education.to_string()).filter(|s| !s.is_empty()),
            credit_default: Some("no".to_string()),
            mortgage: Some("yes".to_string()),
            number_contacts: 2,
            contact_duration: 180,
            previous_campaign_contacts: 1,
            previous_outcome: Some("success".to_string()),
            campaign_outcome: Some("no".to_string()),
            month: month.to_string(),
            day,
            cons_price_idx: 93.994,
            euribor_three_months: 4.857,
        }
    }

    #[test]
    fn test_client_ids_are_contiguous() {
        let records = vec![
            record("admin.", "high.school", "may", 1),
            record("retired", "unknown", "jun", 2),
            record("services", "basic.9y", "jul", 3),
        ];
        let ids: Vec<ClientId> = assign_client_ids(&records).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_client_row_cleanup() {
        let transformer = default_transformer();
        let row = transformer.client_row(3, &record("blue-collar.worker", "high.school", "may", 7));

        assert_eq!(row.client_id, 3);
        assert_eq!(row.age, 41);
        assert_eq!(row.job.as_deref(), Some("blue_collarworker"));
        assert_eq!(row.marital.as_deref(), Some("married"));
        assert_eq!(row.education.as_deref(), Some("high_school"));
        assert_eq!(row.credit_default, 0);
        assert_eq!(row.mortgage, 1);
    }

    #[test]
    fn test_job_trailing_dot_removed() {
        let transformer = default_transformer();
        let row = transformer.client_row(0, &record("admin.", "basic.4y", "may", 7));
        assert_eq!(row.job.as_deref(), Some("admin"));
    }

    #[test]
    fn test_unknown_education_is_missing() {
        let transformer = default_transformer();
        let row = transformer.client_row(0, &record("admin.", "unknown", "may", 7));
        assert_eq!(row.education, None);
    }

    #[test]
    fn test_missing_categoricals_recode_to_zero() {
        let transformer = default_transformer();
        let mut raw = record("", "", "may", 7);
        raw.credit_default = None;
        raw.mortgage = None;
        raw.previous_outcome = None;
        raw.campaign_outcome = None;

        let client = transformer.client_row(0, &raw);
        assert_eq!(client.job, None);
        assert_eq!(client.credit_default, 0);
        assert_eq!(client.mortgage, 0);

        let campaign = transformer.campaign_row(0, &raw).unwrap();
        assert_eq!(campaign.previous_outcome, 0);
        assert_eq!(campaign.campaign_outcome, 0);
    }

    #[test]
    fn test_campaign_row() {
        let transformer = default_transformer();
        let row = transformer.campaign_row(5, &record("admin.", "basic.4y", "may", 7)).unwrap();

        assert_eq!(row.client_id, 5);
        assert_eq!(row.number_contacts, 2);
        assert_eq!(row.contact_duration, 180);
        assert_eq!(row.previous_campaign_contacts, 1);
        assert_eq!(row.previous_outcome, 1);
        assert_eq!(row.campaign_outcome, 0);
        assert_eq!(row.last_contact_date, "2022-05-07");
    }

    #[test]
    fn test_outcome_match_is_case_sensitive() {
        let transformer = default_transformer();
        let mut raw = record("admin.", "basic.4y", "may", 7);
        raw.previous_outcome = Some("Success".to_string());
        raw.campaign_outcome = Some("yes".to_string());

        let row = transformer.campaign_row(0, &raw).unwrap();
        assert_eq!(row.previous_outcome, 0);
        assert_eq!(row.campaign_outcome, 1);
    }

    #[test]
    fn test_economics_row_passthrough() {
        let transformer = default_transformer();
        let row = transformer.economics_row(9, &record("admin.", "basic.4y", "may", 7));

        assert_eq!(row.client_id, 9);
        assert_eq!(row.cons_price_idx, 93.994);
        assert_eq!(row.euribor_three_months, 4.857);
    }

    #[test]
    fn test_transform_keeps_row_counts_and_order() {
        let records = vec![
            record("admin.", "high.school", "may", 1),
            record("retired", "unknown", "dec", 31),
            record("services", "basic.9y", "aug", 15),
        ];
        let tables = default_transformer().transform(&records).unwrap();

        assert_eq!(tables.len(), 3);
        assert_eq!(tables.campaign.len(), 3);
        assert_eq!(tables.economics.len(), 3);
        for (idx, ((c, k), e)) in tables
            .client
            .iter()
            .zip(&tables.campaign)
            .zip(&tables.economics)
            .enumerate()
        {
            assert_eq!(c.client_id, idx as ClientId);
            assert_eq!(k.client_id, idx as ClientId);
            assert_eq!(e.client_id, idx as ClientId);
        }
        assert_eq!(tables.campaign[1].last_contact_date, "2022-12-31");
        assert_eq!(tables.client[2].job.as_deref(), Some("services"));
    }

    #[test]
    fn test_transform_aborts_on_unknown_month() {
        let records = vec![
            record("admin.", "high.school", "may", 1),
            record("retired", "unknown", "xyz", 1),
        ];
        let transformer = default_transformer();

        match transformer.transform(&records) {
            Err(TransformError::UnknownMonth { client_id, month }) => {
                assert_eq!(client_id, 1);
                assert_eq!(month, "xyz");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(transformer.campaign_table(&records).is_err());
    }

    #[test]
    fn test_table_builders_match_transform() {
        let records = vec![
            record("blue-collar", "professional.course", "mar", 9),
            record("technician", "university.degree", "apr", 10),
        ];
        let transformer = default_transformer();
        let tables = transformer.transform(&records).unwrap();

        assert_eq!(transformer.client_table(&records), tables.client);
        assert_eq!(transformer.campaign_table(&records).unwrap(), tables.campaign);
        assert_eq!(transformer.economics_table(&records), tables.economics);
    }

    #[test]
    fn test_custom_contact_year() {
        let mut rules = CleaningRules::default();
        rules.contact_year = 2021;
        let transformer = RecordTransformer::new(&rules).unwrap();

        let row = transformer.campaign_row(0, &record("admin.", "basic.4y", "nov", 3)).unwrap();
        assert_eq!(row.last_contact_date, "2021-11-03");
    }

    #[test]
    fn test_invalid_regex_fails_construction() {
        let mut rules = CleaningRules::default();
        rules.education.push(Operation::Replace {
            pattern: "(unclosed".to_string(),
            value: String::new(),
            regex: true,
        });

        match RecordTransformer::new(&rules) {
            Err(TransformError::InvalidRule { field, .. }) => assert_eq!(field, "education"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_regex_rule_applies_to_every_row() {
        let mut rules = CleaningRules::default();
        rules.marital = vec![Operation::Replace {
            pattern: "^(m|s)".to_string(),
            value: "X".to_string(),
            regex: true,
        }];
        let transformer = RecordTransformer::new(&rules).unwrap();

        let records = vec![
            record("admin.", "basic.4y", "may", 1),
            record("retired", "basic.4y", "jun", 2),
        ];
        let tables = transformer.transform(&records).unwrap();
        assert!(tables.client.iter().all(|c| c.marital.as_deref() == Some("Xarried")));
    }
}
