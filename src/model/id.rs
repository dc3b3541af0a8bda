use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($( $(#[$meta:meta])* $name:ident ),* $(,)?) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    )*};
}

define_id! {
    MemberId,
    PropertyId,
    EquipmentId,
    ArticleId,
    CommentId,
    NoticeId,
    NotificationId,
    /// Identifies a row of the like ledger.
    LikeId,
    /// Identifies a row of the view ledger.
    ViewId,
    FollowId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_transparent_on_the_wire() {
        serde_test::assert_tokens(&MemberId(42), &[serde_test::Token::I64(42)]);
        assert_eq!(PropertyId::from(7).to_string(), "7");
    }
}
