use jsonbind::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("integer {0} does not fit in i64")]
    IntegerOutOfRange(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
