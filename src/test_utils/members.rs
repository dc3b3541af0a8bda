use crate::model::member::{InsertMember, MemberKind};
use crate::model::{Member, MemberId};
use crate::{Actor, App};

#[tracing::instrument(skip(app), name = "test_utils.members.register")]
pub async fn register(app: &App, nick: &str) -> Member {
    register_as(app, nick, MemberKind::User).await
}

#[tracing::instrument(skip(app), name = "test_utils.members.register_as")]
pub async fn register_as(app: &App, nick: &str, kind: MemberKind) -> Member {
    app.data
        .insert_member(&InsertMember::new(nick, kind))
        .await
        .unwrap()
}

/// Reloads a member to look at its counters.
pub async fn reload(app: &App, id: MemberId) -> Member {
    app.data.find_member(id).await.unwrap().unwrap()
}

pub fn actor(member: &Member) -> Actor {
    Actor::Member(member.id)
}
