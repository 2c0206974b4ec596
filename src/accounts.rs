//! Run selection: which accounts to synchronize and from when

use chrono::NaiveDateTime;
use sqlx::mysql::MySqlPool;
use sqlx::FromRow;

use crate::models::Account;

/// Accounts of one owner, each joined with the newest withdraw date already
/// stored for it. Accounts that never stored a transaction come back with a
/// NULL cursor and start from the epoch floor.
const SELECT_ACCOUNTS_FOR_OWNER: &str = r#"
SELECT acc.accountNumber AS account_number,
       acc.accountBlz AS account_blz,
       acc.accountOwner AS account_owner,
       last.maxWithdrawDate AS last_withdrawn_at
FROM tblaccounts AS acc
LEFT JOIN (
    SELECT accountNumber, accountBlz, MAX(withdrawDate) AS maxWithdrawDate
    FROM tblacctransactions
    GROUP BY accountNumber, accountBlz
) AS last
  ON acc.accountNumber = last.accountNumber
 AND acc.accountBlz = last.accountBlz
WHERE acc.accountOwner = ?
"#;

#[derive(Debug, FromRow)]
struct AccountRow {
    account_number: String,
    account_blz: String,
    account_owner: String,
    last_withdrawn_at: Option<NaiveDateTime>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            number: self.account_number,
            blz: self.account_blz,
            iban: None,
            bic: None,
            owner: self.account_owner,
            // withdrawDate is stored in UTC
            last_withdrawn_at: self.last_withdrawn_at.map(|dt| dt.and_utc()),
        }
    }
}

/// Load the accounts registered for an owner, with their incremental cursors
pub async fn for_owner(pool: &MySqlPool, owner: &str) -> Result<Vec<Account>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AccountRow>(SELECT_ACCOUNTS_FOR_OWNER)
        .bind(owner)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(AccountRow::into_account).collect())
}
