use crate::error::{Error, ErrorCategory, Result};
use crate::model::member::{InsertMember, MemberFilter, MemberKind, MemberStatus, UpdateMember};
use crate::model::{Member, MemberId, MemberStat, MemberView, PageRequest, Paginated, Target};
use crate::services::notifications::{notify_on_like, Liked};
use crate::services::{follows, likes, stats, util, views};
use crate::util::validation;
use crate::{Actor, App};

fn check_profile(nick: Option<&str>, phone: Option<&str>) -> Result<()> {
    if nick.is_some_and(|v| !validation::is_valid_nick(v)) {
        return Err(Error::new(ErrorCategory::InvalidRequest)
            .with_message("Nick must be 3 to 30 letters, digits, dots, dashes or underscores"));
    }
    if phone.is_some_and(|v| !validation::is_valid_phone(v)) {
        return Err(Error::new(ErrorCategory::InvalidRequest).with_message("Invalid phone number"));
    }
    Ok(())
}

/// Attaches what the viewer thinks of `member`.
pub async fn view_of(app: &App, actor: &Actor, member: Member) -> Result<MemberView> {
    let me_liked = likes::liked_by(app, actor, Target::member(member.id)).await?;
    let me_followed = follows::followed_by(app, actor, member.id).await?;
    Ok(MemberView {
        member,
        me_liked,
        me_followed,
    })
}

/// Provisions a member. Only admins may provision other admins.
#[derive(Debug)]
pub struct CreateMember {
    pub form: InsertMember,
}

impl CreateMember {
    #[tracing::instrument(skip_all, name = "services.members.create", fields(nick = %self.form.nick))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Member> {
        check_profile(Some(&self.form.nick), self.form.phone.as_deref())?;
        if self.form.kind == MemberKind::Admin {
            util::require_admin(app, actor).await?;
        }

        app.data
            .insert_member(&self.form)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))
    }
}

#[derive(Debug)]
pub struct GetMember {
    pub target: MemberId,
}

impl GetMember {
    #[tracing::instrument(name = "services.members.get")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<MemberView> {
        let member = util::find_member(app, self.target).await?;
        if !member.is_visible() {
            return Err(Error::new(ErrorCategory::NotFound));
        }

        let member = match actor.member_id() {
            Some(viewer) => {
                let target = Target::member(member.id);
                if views::record_first_view(app, viewer, target).await?.is_some() {
                    stats::adjust_member(app, member.id, MemberStat::Views, 1).await?
                } else {
                    member
                }
            }
            None => member,
        };

        view_of(app, actor, member).await
    }
}

/// Updates the actor's own profile.
#[derive(Debug)]
pub struct UpdateMemberProfile {
    pub form: UpdateMember,
}

impl UpdateMemberProfile {
    #[tracing::instrument(skip_all, name = "services.members.update")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Member> {
        let id = actor.require()?;
        check_profile(self.form.nick.as_deref(), self.form.phone.as_deref())?;

        let form = UpdateMember {
            kind: None,
            status: None,
            ..self.form
        };

        app.data
            .update_member(id, &form, true)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::UpdateFailed, report))?
            .ok_or_else(|| Error::new(ErrorCategory::UpdateFailed))
    }
}

/// Active agents, optionally searched by nick.
#[derive(Debug, Default)]
pub struct GetAgents {
    pub text: Option<String>,
    pub page: PageRequest,
}

impl GetAgents {
    #[tracing::instrument(name = "services.members.agents")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<MemberView>> {
        util::check_page(&self.page)?;
        let filter = MemberFilter {
            kind: Some(MemberKind::Agent),
            status: Some(MemberStatus::Active),
            text: self.text,
        };

        let agents = app.data.list_members(&filter, &self.page).await?;
        let mut list = Vec::with_capacity(agents.list.len());
        for agent in agents.list {
            list.push(view_of(app, actor, agent).await?);
        }

        Ok(Paginated {
            list,
            total: agents.total,
        })
    }
}

#[derive(Debug)]
pub struct LikeMember {
    pub target: MemberId,
}

impl LikeMember {
    #[tracing::instrument(name = "services.members.like")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Member> {
        let liker = util::require_active_member(app, actor).await?;
        let target = util::find_member(app, self.target).await?;
        if !target.is_active() {
            return Err(Error::new(ErrorCategory::NotFound));
        }

        let modifier = likes::toggle(app, liker.id, Target::member(target.id)).await?;
        let target = stats::adjust_member(app, target.id, MemberStat::Likes, modifier).await?;

        notify_on_like(app, &liker, Liked::Member(&target), modifier).await;
        Ok(target)
    }
}

#[derive(Debug, Default)]
pub struct GetAllMembersByAdmin {
    pub filter: MemberFilter,
    pub page: PageRequest,
}

impl GetAllMembersByAdmin {
    #[tracing::instrument(name = "services.members.admin.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<Member>> {
        util::require_admin(app, actor).await?;
        util::check_page(&self.page)?;
        Ok(app.data.list_members(&self.filter, &self.page).await?)
    }
}

/// Admins may change anything, including kind and status.
#[derive(Debug)]
pub struct UpdateMemberByAdmin {
    pub target: MemberId,
    pub form: UpdateMember,
}

impl UpdateMemberByAdmin {
    #[tracing::instrument(skip_all, name = "services.members.admin.update", fields(target = %self.target))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Member> {
        util::require_admin(app, actor).await?;
        check_profile(self.form.nick.as_deref(), self.form.phone.as_deref())?;

        app.data
            .update_member(self.target, &self.form, false)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::UpdateFailed, report))?
            .ok_or_else(|| Error::new(ErrorCategory::UpdateFailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationKind;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_count_first_view_only() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;
        let actor = test_utils::members::actor(&bob);

        for _ in 0..3 {
            GetMember { target: alice.id }
                .perform(&app, &actor)
                .await
                .unwrap();
        }

        let view = GetMember { target: alice.id }
            .perform(&app, &Actor::Anonymous)
            .await
            .unwrap();
        assert_eq!(view.member.views, 1);
        assert!(!view.me_liked);
        assert!(!view.me_followed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_hide_deleted_members() {
        let app = test_utils::build_test_app();
        let admin = test_utils::members::register_as(&app, "admin", MemberKind::Admin).await;
        let alice = test_utils::members::register(&app, "alice").await;

        UpdateMemberByAdmin {
            target: alice.id,
            form: UpdateMember {
                status: Some(MemberStatus::Delete),
                ..Default::default()
            },
        }
        .perform(&app, &test_utils::members::actor(&admin))
        .await
        .unwrap();

        let category = GetMember { target: alice.id }
            .perform(&app, &Actor::Anonymous)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_toggle_member_likes() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;
        let actor = test_utils::members::actor(&alice);

        let liked = LikeMember { target: bob.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(liked.likes, 1);

        let unliked = LikeMember { target: bob.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(unliked.likes, 0);

        // only the like notifies
        let notifications = app.data.list_notifications(bob.id, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Like);
        assert_eq!(notifications[0].title, "alice liked you!");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_liking_blocked_member() {
        let app = test_utils::build_test_app();
        let admin = test_utils::members::register_as(&app, "admin", MemberKind::Admin).await;
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;

        UpdateMemberByAdmin {
            target: bob.id,
            form: UpdateMember {
                status: Some(MemberStatus::Block),
                ..Default::default()
            },
        }
        .perform(&app, &test_utils::members::actor(&admin))
        .await
        .unwrap();

        let category = LikeMember { target: bob.id }
            .perform(&app, &test_utils::members::actor(&alice))
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);

        let bob = test_utils::members::reload(&app, bob.id).await;
        assert_eq!(bob.likes, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_let_members_change_their_kind() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let member = UpdateMemberProfile {
            form: UpdateMember {
                full_name: Some("Alice Doe".into()),
                kind: Some(MemberKind::Admin),
                ..Default::default()
            },
        }
        .perform(&app, &test_utils::members::actor(&alice))
        .await
        .unwrap();

        assert_eq!(member.full_name.as_deref(), Some("Alice Doe"));
        assert_eq!(member.kind, MemberKind::User);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_duplicate_and_invalid_nicks() {
        let app = test_utils::build_test_app();
        test_utils::members::register(&app, "alice").await;

        let category = CreateMember {
            form: InsertMember::new("alice", MemberKind::User),
        }
        .perform(&app, &Actor::Anonymous)
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::CreateFailed);

        let category = CreateMember {
            form: InsertMember::new("a", MemberKind::User),
        }
        .perform(&app, &Actor::Anonymous)
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::InvalidRequest);

        let category = CreateMember {
            form: InsertMember::new("root", MemberKind::Admin),
        }
        .perform(&app, &Actor::Anonymous)
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::Unauthorized);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_list_active_agents_only() {
        let app = test_utils::build_test_app();
        test_utils::members::register_as(&app, "agent_one", MemberKind::Agent).await;
        test_utils::members::register_as(&app, "agent_two", MemberKind::Agent).await;
        test_utils::members::register(&app, "plain_user").await;

        let page = GetAgents {
            text: Some("ONE".into()),
            page: PageRequest::new(1, 10),
        }
        .perform(&app, &Actor::Anonymous)
        .await
        .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].member.nick, "agent_one");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_require_admin_for_admin_listing() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let category = GetAllMembersByAdmin::default()
            .perform(&app, &test_utils::members::actor(&alice))
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotAllowed);
    }
}
