use soroban_sdk::contracterror;

/// Broad classes of wallet failures. Codes are grouped by class so callers
/// can classify an error from its number alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Lifecycle,
    Authorization,
    StateConflict,
    InvariantViolation,
    DownstreamCall,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MultisigError {
    NotInitialized = 1,
    AlreadyInitialized = 2,

    NotOwner = 10,

    UnknownTransaction = 20,
    AlreadyExecuted = 21,
    AlreadyConfirmed = 22,
    NotConfirmed = 23,
    BelowThreshold = 24,

    InvalidThreshold = 30,
    EmptyOwnersList = 31,
    DuplicateOwner = 32,
    OwnerNotFound = 33,
    ThresholdExceedsOwners = 34,
    TooManyOwners = 35,
    InvalidValue = 36,
    ValueAssetNotSet = 37,

    TargetCallFailed = 40,
}

impl MultisigError {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            0..=9 => ErrorKind::Lifecycle,
            10..=19 => ErrorKind::Authorization,
            20..=29 => ErrorKind::StateConflict,
            30..=39 => ErrorKind::InvariantViolation,
            _ => ErrorKind::DownstreamCall,
        }
    }
}
