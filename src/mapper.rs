use chrono::{DateTime, Utc};
use rust_decimal::RoundingStrategy;

use crate::models::{Account, AccountTransaction, StatementRecord, TransactionDocument};

/// Placeholder for absent or empty title components
const NONE_MARKER: &str = "#None#";

/// Normalize an optional field for use in the transaction title
///
/// Absent and empty both map to the `"#None#"` marker so a title always has
/// two non-empty components.
///
/// ```
/// use kontosync::mapper::sanitize;
///
/// assert_eq!(sanitize(None), "#None#");
/// assert_eq!(sanitize(Some("")), "#None#");
/// assert_eq!(sanitize(Some("SEPA-42")), "SEPA-42");
/// ```
pub fn sanitize(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NONE_MARKER.to_string(),
    }
}

/// Compose the relational title from the statement id and purpose
pub fn title(id: Option<&str>, purpose: Option<&str>) -> String {
    format!("{}/{}", sanitize(id), sanitize(purpose))
}

/// Project one corrected statement record into both persisted forms
///
/// Total for any well-formed record: absent optional fields stay absent,
/// they never fail the mapping. The document form keeps the amount as an
/// exact decimal string and dates as ISO-8601 strings; the relational form
/// rounds the amount to the store's two-decimal fixed-point scale.
pub fn map_statement(
    account: &Account,
    record: &StatementRecord,
    now: DateTime<Utc>,
) -> (TransactionDocument, AccountTransaction) {
    let document = TransactionDocument {
        owner: account.owner.clone(),
        withdraw_date: now.to_rfc3339(),
        account_number: account.number.clone(),
        account_blz: account.blz.clone(),
        iban: account.iban.clone(),
        bic: account.bic.clone(),
        status: record.status.clone(),
        funds_code: record.funds_code.clone(),
        amount: record.amount.to_string(),
        id: record.id.clone(),
        customer_reference: record.customer_reference.clone(),
        bank_reference: record.bank_reference.clone(),
        extra_details: record.extra_details.clone(),
        currency: record.currency.clone(),
        date: record.date.to_string(),
        entry_date: record.entry_date.to_string(),
        transaction_code: record.transaction_code.clone(),
        posting_text: record.posting_text.clone().unwrap_or_default(),
        prima_nota: record.prima_nota.clone(),
        purpose: record.purpose.clone().unwrap_or_default(),
        applicant_bin: record.applicant_bin.clone(),
        applicant_iban: record.applicant_iban.clone(),
        applicant_name: record.applicant_name.clone(),
        return_debit_notes: record.return_debit_notes.clone(),
        recipient_name: record.recipient_name.clone(),
        additional_purpose: record.additional_purpose.clone(),
        gvc_applicant_iban: record.gvc_applicant_iban.clone(),
        gvc_applicant_bin: record.gvc_applicant_bin.clone(),
        end_to_end_reference: record.end_to_end_reference.clone(),
        additional_position_reference: record.additional_position_reference.clone(),
        applicant_creditor_id: record.applicant_creditor_id.clone(),
        purpose_code: record.purpose_code.clone(),
        additional_position_date: record.additional_position_date.map(|d| d.to_string()),
        deviate_applicant: record.deviate_applicant.clone(),
        deviate_recipient: record.deviate_recipient.clone(),
        frst_one_off_recc: record.frst_one_off_recc.clone(),
        old_sepa_ci: record.old_sepa_ci.clone(),
        old_sepa_additional_position_reference: record
            .old_sepa_additional_position_reference
            .clone(),
        settlement_tag: record.settlement_tag.clone(),
        debitor_identifier: record.debitor_identifier.clone(),
        compensation_amount: record.compensation_amount.map(|a| a.to_string()),
        original_amount: record.original_amount.map(|a| a.to_string()),
    };

    let relational = AccountTransaction {
        account_number: account.number.clone(),
        account_blz: account.blz.clone(),
        amount: record
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        currency: record.currency.clone(),
        transaction_type: document.posting_text.clone(),
        title: title(record.id.as_deref(), record.purpose.as_deref()),
        applicant_name: record.applicant_name.clone(),
        date: record.date,
        entry_date: record.entry_date,
        withdraw_date: now,
        owner: account.owner.clone(),
    };

    (document, relational)
}
