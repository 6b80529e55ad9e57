#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{op}: {source}")]
    Query {
        op: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("no open transaction")]
    NoTransaction,
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn query(op: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Query {
            op: op.into(),
            source,
        }
    }
}
