use crate::error::{Error, ErrorCategory};
use crate::model::MemberId;

/// Who is performing a request. The identity is established upstream
/// and trusted as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Member(MemberId),
}

impl Actor {
    #[must_use]
    pub fn member_id(&self) -> Option<MemberId> {
        match self {
            Self::Anonymous => None,
            Self::Member(id) => Some(*id),
        }
    }

    pub fn require(&self) -> Result<MemberId, Error> {
        self.member_id()
            .ok_or_else(|| Error::new(ErrorCategory::Unauthorized))
    }
}

impl From<MemberId> for Actor {
    fn from(value: MemberId) -> Self {
        Self::Member(value)
    }
}
