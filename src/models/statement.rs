use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Entry dates further than this from the posting date are treated as
/// upstream parsing artifacts
const MAX_ENTRY_DATE_SKEW_DAYS: i64 = 50;

/// One ledger entry as returned by the upstream statement source
///
/// The descriptive attributes mirror the SEPA/MT940 field set the source
/// exposes; all of them are optional and absence is never an error. The
/// record only lives for one fetch cycle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatementRecord {
    /// Posting date (as booked by the bank)
    pub date: NaiveDate,
    /// Entry date (as entered into the ledger); occasionally unreliable,
    /// see [`StatementRecord::correct_entry_date`]
    pub entry_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub funds_code: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub customer_reference: Option<String>,
    #[serde(default)]
    pub bank_reference: Option<String>,
    #[serde(default)]
    pub extra_details: Option<String>,
    #[serde(default)]
    pub transaction_code: Option<String>,
    #[serde(default)]
    pub posting_text: Option<String>,
    #[serde(default)]
    pub prima_nota: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub applicant_bin: Option<String>,
    #[serde(default)]
    pub applicant_iban: Option<String>,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub return_debit_notes: Option<String>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub additional_purpose: Option<String>,
    #[serde(default)]
    pub gvc_applicant_iban: Option<String>,
    #[serde(default)]
    pub gvc_applicant_bin: Option<String>,
    #[serde(default)]
    pub end_to_end_reference: Option<String>,
    #[serde(default)]
    pub additional_position_reference: Option<String>,
    #[serde(default)]
    pub applicant_creditor_id: Option<String>,
    #[serde(default)]
    pub purpose_code: Option<String>,
    #[serde(default)]
    pub additional_position_date: Option<NaiveDate>,
    #[serde(default)]
    pub deviate_applicant: Option<String>,
    #[serde(default)]
    pub deviate_recipient: Option<String>,
    #[serde(default)]
    pub frst_one_off_recc: Option<String>,
    #[serde(default)]
    pub old_sepa_ci: Option<String>,
    #[serde(default)]
    pub old_sepa_additional_position_reference: Option<String>,
    #[serde(default)]
    pub settlement_tag: Option<String>,
    #[serde(default)]
    pub debitor_identifier: Option<String>,
    #[serde(default)]
    pub compensation_amount: Option<Decimal>,
    #[serde(default)]
    pub original_amount: Option<Decimal>,
}

impl StatementRecord {
    /// Replace an entry date that lies implausibly far from the posting date
    ///
    /// An entry date more than 50 days away from the posting date is an
    /// upstream parsing artifact and is overwritten with the posting date.
    /// Must be applied before the future-dated filter and before persistence.
    pub fn correct_entry_date(&mut self) {
        let skew = (self.date - self.entry_date).num_days().abs();
        if skew > MAX_ENTRY_DATE_SKEW_DAYS {
            self.entry_date = self.date;
        }
    }
}
