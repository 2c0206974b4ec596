use serde::Serialize;

/// Flat document-form projection of one statement record
///
/// Serialized straight into the document sink: every record attribute plus
/// the owning user, the withdrawal timestamp and the account coordinates.
/// The amount is an exact decimal string and all dates are ISO-8601 strings,
/// so no numeric or temporal precision is lost in the schema-less store.
/// Field names are the document store's wire names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionDocument {
    #[serde(rename = "transactionOwnerId")]
    pub owner: String,
    #[serde(rename = "withdrawDate")]
    pub withdraw_date: String,
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    #[serde(rename = "accountBlz")]
    pub account_blz: String,
    pub iban: Option<String>,
    pub bic: Option<String>,
    pub status: Option<String>,
    pub funds_code: Option<String>,
    pub amount: String,
    pub id: Option<String>,
    pub customer_reference: Option<String>,
    pub bank_reference: Option<String>,
    pub extra_details: Option<String>,
    pub currency: Option<String>,
    pub date: String,
    pub entry_date: String,
    pub transaction_code: Option<String>,
    /// Empty string when the statement carries no posting text
    pub posting_text: String,
    pub prima_nota: Option<String>,
    /// Empty string when the statement carries no purpose
    pub purpose: String,
    pub applicant_bin: Option<String>,
    pub applicant_iban: Option<String>,
    pub applicant_name: Option<String>,
    pub return_debit_notes: Option<String>,
    pub recipient_name: Option<String>,
    pub additional_purpose: Option<String>,
    pub gvc_applicant_iban: Option<String>,
    pub gvc_applicant_bin: Option<String>,
    pub end_to_end_reference: Option<String>,
    pub additional_position_reference: Option<String>,
    pub applicant_creditor_id: Option<String>,
    pub purpose_code: Option<String>,
    pub additional_position_date: Option<String>,
    pub deviate_applicant: Option<String>,
    pub deviate_recipient: Option<String>,
    #[serde(rename = "FRST_ONE_OFF_RECC")]
    pub frst_one_off_recc: Option<String>,
    #[serde(rename = "old_SEPA_CI")]
    pub old_sepa_ci: Option<String>,
    #[serde(rename = "old_SEPA_additional_position_reference")]
    pub old_sepa_additional_position_reference: Option<String>,
    pub settlement_tag: Option<String>,
    pub debitor_identifier: Option<String>,
    pub compensation_amount: Option<String>,
    pub original_amount: Option<String>,
}
