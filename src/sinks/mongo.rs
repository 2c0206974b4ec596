use async_trait::async_trait;
use log::debug;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};

use crate::error::SinkError;
use crate::models::TransactionDocument;

use super::DocumentSink;

const COLLECTION: &str = "transactions";

/// MongoDB server code for a duplicate-key write error
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Document sink backed by MongoDB
///
/// One client for the life of a run. A unique compound index over the
/// transaction natural key makes re-fetched records fail with a duplicate-key
/// write error, which is classified as benign.
pub struct MongoDocumentSink {
    client: Client,
    transactions: Collection<TransactionDocument>,
}

impl MongoDocumentSink {
    /// Connect and make sure the uniqueness index exists
    pub async fn connect(url: &str, database: &str) -> Result<Self, SinkError> {
        let client = Client::with_uri_str(url).await?;
        let transactions = client
            .database(database)
            .collection::<TransactionDocument>(COLLECTION);

        let sink = Self {
            client,
            transactions,
        };
        sink.ensure_index().await?;

        Ok(sink)
    }

    async fn ensure_index(&self) -> Result<(), SinkError> {
        debug!("ensuring unique transaction index on {}", COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! {
                "accountNumber": 1,
                "accountBlz": 1,
                "amount": 1,
                "date": 1,
                "id": 1,
                "purpose": 1,
            })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.transactions.create_index(index).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentSink for MongoDocumentSink {
    async fn insert(&self, document: &TransactionDocument) -> Result<(), SinkError> {
        self.transactions
            .insert_one(document)
            .await
            .map(|_| ())
            .map_err(classify_mongo_error)
    }

    async fn close(&self) -> Result<(), SinkError> {
        // shutdown() consumes a handle; clones share the same inner client
        self.client.clone().shutdown().await;
        Ok(())
    }
}

/// Map driver errors onto the sink taxonomy; duplicate-key write errors
/// become the benign duplicate signal
fn classify_mongo_error(e: mongodb::error::Error) -> SinkError {
    if let ErrorKind::Write(WriteFailure::WriteError(ref write_err)) = *e.kind {
        if write_err.code == DUPLICATE_KEY_CODE {
            return SinkError::Duplicate;
        }
    }
    SinkError::Mongo(e)
}
