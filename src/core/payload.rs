use crate::core::normalize::{ColumnRule, PHONE_FIELD};
use crate::domain::model::{AgencyDetails, CleanRecord, UserPayload};
use crate::utils::error::{MigrateError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

const NAME_FIELD: &str = "SALESPERSON";
const ROLE_FIELD: &str = "ROLE";
const EMAIL_FIELD: &str = "EMAIL";
const SUPPLIER_FIELD: &str = "SALES CODE";
const DEBIT_FIELD: &str = "DEBIT NUMBER";
const BRANCH_FIELD: &str = "BRANCH NAME";

/// Shape of the nested agency object in the request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// `agency: { supplierNumber }`
    Supplier,
    /// `agency: { debitNumber, branchName }`
    Debit,
}

/// Maps a CleanRecord to the API request schema. Pure, configured with exactly
/// one schema variant per run; required labels resolve through the same column
/// rule the normalizer used.
pub struct PayloadBuilder {
    variant: SchemaVariant,
    rule: ColumnRule,
}

impl PayloadBuilder {
    pub fn new(variant: SchemaVariant, rule: ColumnRule) -> Self {
        Self { variant, rule }
    }

    pub fn build(&self, record: &CleanRecord, row: usize) -> Result<UserPayload> {
        let agency = match self.variant {
            SchemaVariant::Supplier => AgencyDetails::Supplier {
                supplier_number: self.required(record, SUPPLIER_FIELD, row)?,
            },
            SchemaVariant::Debit => AgencyDetails::Debit {
                debit_number: self.required(record, DEBIT_FIELD, row)?,
                branch_name: self.required(record, BRANCH_FIELD, row)?,
            },
        };

        Ok(UserPayload {
            name: self.required(record, NAME_FIELD, row)?,
            role: self.required(record, ROLE_FIELD, row)?,
            phone: self.required(record, PHONE_FIELD, row)?,
            email: self.required(record, EMAIL_FIELD, row)?,
            agency,
        })
    }

    fn required(&self, record: &CleanRecord, label: &str, row: usize) -> Result<String> {
        let key = self.rule.apply(label);
        record
            .get(&key)
            .map(str::to_string)
            .ok_or(MigrateError::MissingFieldError { field: key, row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn clean(entries: &[(&str, &str)]) -> CleanRecord {
        CleanRecord {
            data: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_supplier_variant_payload_shape() {
        let builder = PayloadBuilder::new(SchemaVariant::Supplier, ColumnRule::Underscored);
        let record = clean(&[
            ("SALESPERSON", "Jane Doe"),
            ("ROLE", "Agent"),
            ("EMAIL", "jane@x.com"),
            ("PHONE", "+254712345678"),
            ("SALES_CODE", "S1"),
        ]);

        let payload = builder.build(&record, 0).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "Jane Doe",
                "role": "Agent",
                "phone": "+254712345678",
                "email": "jane@x.com",
                "agency": { "supplierNumber": "S1" }
            })
        );
    }

    #[test]
    fn test_debit_variant_payload_shape() {
        let builder = PayloadBuilder::new(SchemaVariant::Debit, ColumnRule::Compact);
        let record = clean(&[
            ("SALESPERSON", "John Roe"),
            ("ROLE", "Agent"),
            ("EMAIL", "john@x.com"),
            ("PHONE", "+254701000000"),
            ("DEBITNUMBER", "D77"),
            ("BRANCHNAME", "Westlands"),
        ]);

        let payload = builder.build(&record, 3).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "name": "John Roe",
                "role": "Agent",
                "phone": "+254701000000",
                "email": "john@x.com",
                "agency": { "debitNumber": "D77", "branchName": "Westlands" }
            })
        );
    }

    #[test]
    fn test_missing_field_reports_key_and_row() {
        let builder = PayloadBuilder::new(SchemaVariant::Supplier, ColumnRule::Underscored);
        let record = CleanRecord {
            data: HashMap::from([("SALESPERSON".to_string(), "Jane".to_string())]),
        };

        let err = builder.build(&record, 7).unwrap_err();
        match err {
            MigrateError::MissingFieldError { field, row } => {
                assert_eq!(field, "SALES_CODE");
                assert_eq!(row, 7);
            }
            other => panic!("expected MissingFieldError, got {:?}", other),
        }
    }
}
