//! Error types for the frame codec.
//!
//! Two layers:
//! - [`ErrorCode`] / [`EngineError`]: failures reported by liblz4's frame
//!   API, with the engine's own symbolic names and numeric codes.
//! - [`Error`]: everything a public operation can fail with: invalid
//!   parameters, empty input, engine failures, truncated frames and
//!   allocation failures.

use core::fmt;
use std::io;

// ─────────────────────────────────────────────────────────────────────────────
// Engine error registry (lz4frame.h LZ4F_LIST_ERRORS, liblz4 1.10)
// ─────────────────────────────────────────────────────────────────────────────

/// Error codes of liblz4's frame API, in registry order.
///
/// The discriminant is the engine's numeric code: a failing `LZ4F_*` call
/// returns `(size_t)-code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    OkNoError = 0,
    Generic = 1,
    MaxBlockSizeInvalid = 2,
    BlockModeInvalid = 3,
    ParameterInvalid = 4,
    CompressionLevelInvalid = 5,
    HeaderVersionWrong = 6,
    BlockChecksumInvalid = 7,
    ReservedFlagSet = 8,
    AllocationFailed = 9,
    SrcSizeTooLarge = 10,
    DstMaxSizeTooSmall = 11,
    FrameHeaderIncomplete = 12,
    FrameTypeUnknown = 13,
    FrameSizeWrong = 14,
    SrcPtrWrong = 15,
    DecompressionFailed = 16,
    HeaderChecksumInvalid = 17,
    ContentChecksumInvalid = 18,
    FrameDecodingAlreadyStarted = 19,
    CompressionStateUninitialized = 20,
    ParameterNull = 21,
    IoWrite = 22,
    IoRead = 23,
}

impl ErrorCode {
    /// Largest numeric code in the registry (`LZ4F_ERROR_maxCode - 1`).
    pub const MAX: u32 = 23;

    /// Every registry entry, in numeric order.
    pub const ALL: [ErrorCode; 24] = [
        ErrorCode::OkNoError,
        ErrorCode::Generic,
        ErrorCode::MaxBlockSizeInvalid,
        ErrorCode::BlockModeInvalid,
        ErrorCode::ParameterInvalid,
        ErrorCode::CompressionLevelInvalid,
        ErrorCode::HeaderVersionWrong,
        ErrorCode::BlockChecksumInvalid,
        ErrorCode::ReservedFlagSet,
        ErrorCode::AllocationFailed,
        ErrorCode::SrcSizeTooLarge,
        ErrorCode::DstMaxSizeTooSmall,
        ErrorCode::FrameHeaderIncomplete,
        ErrorCode::FrameTypeUnknown,
        ErrorCode::FrameSizeWrong,
        ErrorCode::SrcPtrWrong,
        ErrorCode::DecompressionFailed,
        ErrorCode::HeaderChecksumInvalid,
        ErrorCode::ContentChecksumInvalid,
        ErrorCode::FrameDecodingAlreadyStarted,
        ErrorCode::CompressionStateUninitialized,
        ErrorCode::ParameterNull,
        ErrorCode::IoWrite,
        ErrorCode::IoRead,
    ];

    /// Symbolic name, identical to what `LZ4F_getErrorName` reports.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::OkNoError => "OK_NoError",
            ErrorCode::Generic => "ERROR_GENERIC",
            ErrorCode::MaxBlockSizeInvalid => "ERROR_maxBlockSize_invalid",
            ErrorCode::BlockModeInvalid => "ERROR_blockMode_invalid",
            ErrorCode::ParameterInvalid => "ERROR_parameter_invalid",
            ErrorCode::CompressionLevelInvalid => "ERROR_compressionLevel_invalid",
            ErrorCode::HeaderVersionWrong => "ERROR_headerVersion_wrong",
            ErrorCode::BlockChecksumInvalid => "ERROR_blockChecksum_invalid",
            ErrorCode::ReservedFlagSet => "ERROR_reservedFlag_set",
            ErrorCode::AllocationFailed => "ERROR_allocation_failed",
            ErrorCode::SrcSizeTooLarge => "ERROR_srcSize_tooLarge",
            ErrorCode::DstMaxSizeTooSmall => "ERROR_dstMaxSize_tooSmall",
            ErrorCode::FrameHeaderIncomplete => "ERROR_frameHeader_incomplete",
            ErrorCode::FrameTypeUnknown => "ERROR_frameType_unknown",
            ErrorCode::FrameSizeWrong => "ERROR_frameSize_wrong",
            ErrorCode::SrcPtrWrong => "ERROR_srcPtr_wrong",
            ErrorCode::DecompressionFailed => "ERROR_decompressionFailed",
            ErrorCode::HeaderChecksumInvalid => "ERROR_headerChecksum_invalid",
            ErrorCode::ContentChecksumInvalid => "ERROR_contentChecksum_invalid",
            ErrorCode::FrameDecodingAlreadyStarted => "ERROR_frameDecoding_alreadyStarted",
            ErrorCode::CompressionStateUninitialized => "ERROR_compressionState_uninitialized",
            ErrorCode::ParameterNull => "ERROR_parameter_null",
            ErrorCode::IoWrite => "ERROR_io_write",
            ErrorCode::IoRead => "ERROR_io_read",
        }
    }

    /// Numeric code as exposed to callers.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Look up a registry entry by numeric code.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Decode a raw `size_t` returned by an `LZ4F_*` function.
    ///
    /// Returns `None` for successful results. Codes beyond the registry
    /// (a newer engine) collapse to `Generic`.
    pub fn from_raw(ret: usize) -> Option<Self> {
        if !is_error(ret) {
            return None;
        }
        let code = ret.wrapping_neg();
        u32::try_from(code)
            .ok()
            .and_then(Self::from_code)
            .or(Some(ErrorCode::Generic))
    }
}

/// `LZ4F_isError` equivalent: the top `LZ4F_ERROR_maxCode` values of `size_t`
/// are error codes.
#[inline]
pub fn is_error(ret: usize) -> bool {
    ret > usize::MAX - ErrorCode::MAX as usize
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure reported by the frame engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineError {
    kind: ErrorCode,
    name: &'static str,
}

impl EngineError {
    /// Error raised on the engine's behalf, named from the registry table.
    pub fn new(kind: ErrorCode) -> Self {
        EngineError { kind, name: kind.name() }
    }

    /// Error carrying the name the engine itself reported.
    pub(crate) fn with_name(kind: ErrorCode, name: &'static str) -> Self {
        EngineError { kind, name }
    }

    pub fn kind(&self) -> ErrorCode {
        self.kind
    }

    /// Numeric engine code.
    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    /// Symbolic engine name, e.g. `ERROR_frameHeader_incomplete`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.name)
    }
}

impl std::error::Error for EngineError {}

// ─────────────────────────────────────────────────────────────────────────────
// Public error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by every public operation of this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value was out of range. Raised before any engine call.
    #[error("{name} ({value}) invalid")]
    Parameter { name: &'static str, value: i64 },

    /// A data-consuming call received zero bytes.
    #[error("no data supplied")]
    EmptyInput,

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Input ran out while the engine still expected more of the frame.
    #[error("frame incomplete")]
    IncompleteFrame,

    #[error("failed to allocate {requested} bytes")]
    Allocation { requested: usize },
}

impl Error {
    pub(crate) fn parameter(name: &'static str, value: impl TryInto<i64>) -> Self {
        Error::Parameter { name, value: value.try_into().unwrap_or(i64::MAX) }
    }

    /// The engine error carried by this error, if any.
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            Error::Engine(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        let kind = match e {
            Error::Parameter { .. } => io::ErrorKind::InvalidInput,
            Error::EmptyInput | Error::IncompleteFrame => io::ErrorKind::UnexpectedEof,
            Error::Allocation { .. } => io::ErrorKind::OutOfMemory,
            Error::Engine(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}
