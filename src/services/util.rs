use chrono::{NaiveDateTime, Utc};

use crate::error::{Error, ErrorCategory, Result};
use crate::model::member::MemberKind;
use crate::model::{Member, MemberId, PageRequest};
use crate::util::validation;
use crate::{Actor, App};

/// Loads a member that must exist.
pub async fn find_member(app: &App, id: MemberId) -> Result<Member> {
    app.data
        .find_member(id)
        .await?
        .ok_or_else(|| Error::new(ErrorCategory::NotFound))
}

/// Resolves the acting member. Only active members may act.
pub async fn require_active_member(app: &App, actor: &Actor) -> Result<Member> {
    let id = actor.require()?;
    let member = find_member(app, id)
        .await
        .map_err(|e| e.change_category(ErrorCategory::Unauthorized))?;

    if member.is_active() {
        Ok(member)
    } else {
        Err(Error::new(ErrorCategory::NotAllowed))
    }
}

/// Like [`require_active_member`] but also restricts the member kind.
pub async fn require_member_kind(
    app: &App,
    actor: &Actor,
    kinds: &[MemberKind],
) -> Result<Member> {
    let member = require_active_member(app, actor).await?;
    if kinds.contains(&member.kind) {
        Ok(member)
    } else {
        Err(Error::new(ErrorCategory::NotAllowed))
    }
}

pub async fn require_admin(app: &App, actor: &Actor) -> Result<Member> {
    require_member_kind(app, actor, &[MemberKind::Admin]).await
}

pub fn check_page(page: &PageRequest) -> Result<()> {
    if page.is_valid() {
        Ok(())
    } else {
        Err(Error::new(ErrorCategory::InvalidRequest).with_message(format!(
            "page must be at least 1 and limit between 1 and {}",
            PageRequest::MAX_LIMIT
        )))
    }
}

pub fn check_title(title: &str) -> Result<()> {
    if validation::is_valid_title(title) {
        Ok(())
    } else {
        Err(Error::new(ErrorCategory::InvalidRequest).with_message("Invalid title"))
    }
}

/// Timestamps are stored in UTC without a zone.
#[must_use]
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
