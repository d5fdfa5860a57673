/// Errors raised by field accessors
///
/// These never unwind the tick: accessors log them and fall back to a
/// default value (getters) or a no-op (setters).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field index {index} (+{width} words) out of bounds, values count {count}")]
    IndexOutOfBounds { index: u16, width: u16, count: u16 },
    #[error("dynamic field index {index} out of bounds, dynamic values count {count}")]
    DynamicIndexOutOfBounds { index: u16, count: u16 },
    #[error("dynamic field index {index} has no free offset left")]
    DynamicArrayFull { index: u16 },
    #[error("byte offset {offset} out of range at field {index} (max 3)")]
    ByteOffset { index: u16, offset: u8 },
    #[error("u16 offset {offset} out of range at field {index} (max 1)")]
    U16Offset { index: u16, offset: u8 },
}
