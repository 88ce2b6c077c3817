use soroban_sdk::contracterror;

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
pub enum TimelockError {
    NotInitialized = 1,
    AlreadyInitialized = 2,

    NotProposer = 10,
    NotExecutor = 11,
    NotAdmin = 12,

    AlreadyScheduled = 20,
    NotReady = 21,
    PredecessorNotDone = 22,
    OperationNotWaiting = 23,

    DelayTooShort = 30,
    InvalidValue = 31,
    ValueAssetNotSet = 32,
    InvalidOperationLength = 33,

    TargetCallFailed = 40,
}

impl TimelockError {
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
