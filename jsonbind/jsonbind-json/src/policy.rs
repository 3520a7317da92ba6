/// How JSON integers outside the `i64` range are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Convert them to `Value::Float`, losing precision (default).
    #[default]
    Float,
    /// Fail with [`JsonError::IntegerOutOfRange`](crate::JsonError::IntegerOutOfRange).
    Reject,
}
