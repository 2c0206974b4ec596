use async_trait::async_trait;
use log::debug;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::error::SinkError;
use crate::models::AccountTransaction;

use super::RelationalSink;

const CREATE_BANKS: &str = r#"
CREATE TABLE IF NOT EXISTS tblbanks (
    bankId INT NOT NULL,
    bankName VARCHAR(100),
    bankUrl VARCHAR(2000),
    PRIMARY KEY (bankId)
)
"#;

const CREATE_ACCOUNTS: &str = r#"
CREATE TABLE IF NOT EXISTS tblaccounts (
    accountNumber VARCHAR(100) NOT NULL,
    accountBlz VARCHAR(100) NOT NULL,
    accountLogin VARCHAR(100),
    accountOwner VARCHAR(100),
    bankId INT,
    PRIMARY KEY (accountNumber, accountBlz),
    FOREIGN KEY (bankId) REFERENCES tblbanks (bankId)
)
"#;

const CREATE_TRANSACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS tblacctransactions (
    accountNumber VARCHAR(100) NOT NULL,
    accountBlz VARCHAR(100) NOT NULL,
    transactionAmt DECIMAL(17, 2) NOT NULL,
    transactionCur VARCHAR(3),
    transactionType VARCHAR(100),
    transactionTitle VARCHAR(250) NOT NULL,
    transactionApplicantName VARCHAR(250),
    transactionDate DATE NOT NULL,
    transactionEntryDate DATE,
    withdrawDate DATETIME,
    transactionOwnerId VARCHAR(100),
    PRIMARY KEY (accountNumber, accountBlz, transactionAmt, transactionTitle, transactionDate)
)
"#;

const INSERT_TRANSACTION: &str = r#"
INSERT INTO tblacctransactions (
    accountNumber, accountBlz, transactionAmt, transactionCur,
    transactionType, transactionTitle, transactionApplicantName,
    transactionDate, transactionEntryDate, withdrawDate, transactionOwnerId
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Relational sink backed by MySQL
///
/// Holds a single pooled connection for the life of a run. Every insert runs
/// in its own short transaction; the composite primary key on the
/// transactions table rejects re-fetched duplicates.
pub struct MySqlRelationalSink {
    pool: MySqlPool,
}

impl MySqlRelationalSink {
    /// Connect with one pooled connection (a run holds one session)
    pub async fn connect(url: &str) -> Result<Self, SinkError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the bank, account and transaction tables when missing
    pub async fn ensure_schema(&self) -> Result<(), SinkError> {
        debug!("ensuring relational schema");
        sqlx::query(CREATE_BANKS).execute(&self.pool).await?;
        sqlx::query(CREATE_ACCOUNTS).execute(&self.pool).await?;
        sqlx::query(CREATE_TRANSACTIONS).execute(&self.pool).await?;
        Ok(())
    }

    /// The shared pool, for account metadata queries over the same session
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl RelationalSink for MySqlRelationalSink {
    async fn insert(&self, record: &AccountTransaction) -> Result<(), SinkError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(INSERT_TRANSACTION)
            .bind(&record.account_number)
            .bind(&record.account_blz)
            .bind(record.amount)
            .bind(&record.currency)
            .bind(&record.transaction_type)
            .bind(&record.title)
            .bind(&record.applicant_name)
            .bind(record.date)
            .bind(record.entry_date)
            .bind(record.withdraw_date.naive_utc())
            .bind(&record.owner)
            .execute(&mut *tx)
            .await;

        match inserted {
            Ok(_) => {
                tx.commit().await?;
                Ok(())
            }
            // Dropping the transaction rolls it back
            Err(e) => Err(classify_sql_error(e)),
        }
    }
}

/// Map driver errors onto the sink taxonomy; unique-key violations (MySQL
/// error 1062 family) become the benign duplicate signal
fn classify_sql_error(e: sqlx::Error) -> SinkError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => SinkError::Duplicate,
        other => SinkError::Sql(other),
    }
}
