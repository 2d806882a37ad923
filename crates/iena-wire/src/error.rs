/// Errors that can occur during IENA packet encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum IenaError {
    /// A required header field was never assigned before encoding.
    #[error("required header field `{field}` is not set")]
    MissingField { field: &'static str },

    /// The buffer is shorter than a fixed-size region requires.
    #[error("buffer truncated ({got} bytes, need {needed})")]
    TruncatedBuffer { needed: usize, got: usize },

    /// A record declares more content than the buffer actually holds.
    #[error(
        "corrupt record at payload offset {offset} ({needed} bytes declared, {remaining} remaining)"
    )]
    CorruptRecord {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// The trailing end field is not the `0xDEAD` marker.
    #[error("invalid end field 0x{found:04X} (expected 0xDEAD)")]
    InvalidEndField { found: u16 },

    /// The payload exceeds what the 16-bit size field can describe.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A parameter dataset exceeds its 16-bit length field.
    #[error("dataset in record #{index} too large ({size} bytes, max 65535)")]
    DatasetTooLarge { index: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, IenaError>;
