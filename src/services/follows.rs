//! Follow graph. Subscribing moves two counters and notifies the
//! followed member. These steps run one after another and are not
//! rolled back together.
use crate::error::{Error, ErrorCategory, Result};
use crate::model::{
    Follow, FollowSide, FollowView, MemberId, MemberStat, PageRequest, Paginated, Target,
};
use crate::services::notifications::notify_on_follow;
use crate::services::{likes, stats, util};
use crate::{Actor, App};

/// Whether the viewer follows `member`. Anonymous viewers follow no one.
pub async fn followed_by(app: &App, actor: &Actor, member: MemberId) -> Result<bool> {
    match actor.member_id() {
        Some(viewer) => Ok(app.data.find_follow(viewer, member).await?.is_some()),
        None => Ok(false),
    }
}

#[derive(Debug)]
pub struct Subscribe {
    pub target: MemberId,
}

impl Subscribe {
    #[tracing::instrument(name = "services.follows.subscribe")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Follow> {
        let follower = util::require_active_member(app, actor).await?;
        if follower.id == self.target {
            return Err(Error::new(ErrorCategory::SelfSubscriptionDenied));
        }

        let target = util::find_member(app, self.target).await?;
        let follow = app
            .data
            .insert_follow(follower.id, target.id)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))?;

        stats::adjust_member(app, follower.id, MemberStat::Followings, 1).await?;
        stats::adjust_member(app, target.id, MemberStat::Followers, 1).await?;

        notify_on_follow(app, &follower, target.id).await;
        Ok(follow)
    }
}

#[derive(Debug)]
pub struct Unsubscribe {
    pub target: MemberId,
}

impl Unsubscribe {
    #[tracing::instrument(name = "services.follows.unsubscribe")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Follow> {
        let follower = util::require_active_member(app, actor).await?;
        let target = util::find_member(app, self.target).await?;

        let Some(follow) = app.data.delete_follow(follower.id, target.id).await? else {
            return Err(Error::new(ErrorCategory::NotFound));
        };

        stats::adjust_member(app, follower.id, MemberStat::Followings, -1).await?;
        stats::adjust_member(app, target.id, MemberStat::Followers, -1).await?;

        Ok(follow)
    }
}

async fn list(
    app: &App,
    actor: &Actor,
    side: FollowSide,
    member: MemberId,
    page: &PageRequest,
) -> Result<Paginated<FollowView>> {
    util::check_page(page)?;
    let edges = app.data.list_follows(side, member, page).await?;

    let mut list = Vec::with_capacity(edges.list.len());
    for follow in edges.list {
        let counterpart = side.counterpart(&follow);
        list.push(FollowView {
            member: app.data.find_member(counterpart).await?,
            me_liked: likes::liked_by(app, actor, Target::member(counterpart)).await?,
            me_followed: followed_by(app, actor, counterpart).await?,
            follow,
        });
    }

    Ok(Paginated {
        list,
        total: edges.total,
    })
}

/// Members following `member`, newest edge first.
#[derive(Debug)]
pub struct GetFollowers {
    pub member: MemberId,
    pub page: PageRequest,
}

impl GetFollowers {
    #[tracing::instrument(name = "services.follows.followers")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<FollowView>> {
        list(app, actor, FollowSide::Followers, self.member, &self.page).await
    }
}

/// Members `member` follows, newest edge first.
#[derive(Debug)]
pub struct GetFollowings {
    pub member: MemberId,
    pub page: PageRequest,
}

impl GetFollowings {
    #[tracing::instrument(name = "services.follows.followings")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<FollowView>> {
        list(app, actor, FollowSide::Followings, self.member, &self.page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NotificationKind, NotificationStatus};
    use crate::test_utils::{self, TestResultExt};

    use assert_json_diff::assert_json_include;
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_follow_themselves() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let error = Subscribe { target: alice.id }
            .perform(&app, &test_utils::members::actor(&alice))
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "type": "self_subscription_denied",
                "message": "You can not subscribe yourself!",
            })
        );

        let alice = test_utils::members::reload(&app, alice.id).await;
        assert_eq!((alice.followers, alice.followings), (0, 0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_if_target_not_found() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let category = Subscribe {
            target: MemberId(2_000_000),
        }
        .perform(&app, &test_utils::members::actor(&alice))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_follow_then_unfollow() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;
        let actor = test_utils::members::actor(&alice);

        Subscribe { target: bob.id }.perform(&app, &actor).await.unwrap();

        let alice_now = test_utils::members::reload(&app, alice.id).await;
        let bob_now = test_utils::members::reload(&app, bob.id).await;
        assert_eq!(alice_now.followings, 1);
        assert_eq!(bob_now.followers, 1);

        let notifications = app.data.list_notifications(bob.id, None).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Follow);
        assert_eq!(notifications[0].status, NotificationStatus::Wait);
        assert_eq!(notifications[0].title, "alice started following you");

        Unsubscribe { target: bob.id }.perform(&app, &actor).await.unwrap();

        let alice_now = test_utils::members::reload(&app, alice.id).await;
        let bob_now = test_utils::members::reload(&app, bob.id).await;
        assert_eq!(alice_now.followings, 0);
        assert_eq!(bob_now.followers, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_duplicate_subscription() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;
        let actor = test_utils::members::actor(&alice);

        Subscribe { target: bob.id }.perform(&app, &actor).await.unwrap();
        let category = Subscribe { target: bob.id }
            .perform(&app, &actor)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::CreateFailed);

        // counters moved once
        let bob_now = test_utils::members::reload(&app, bob.id).await;
        assert_eq!(bob_now.followers, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_unsubscribe_without_edge() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;

        let category = Unsubscribe { target: bob.id }
            .perform(&app, &test_utils::members::actor(&alice))
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_enrich_listing_for_viewer() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;
        let carol = test_utils::members::register(&app, "carol").await;

        // bob and carol follow alice, carol follows bob and likes him
        Subscribe { target: alice.id }
            .perform(&app, &test_utils::members::actor(&bob))
            .await
            .unwrap();
        Subscribe { target: alice.id }
            .perform(&app, &test_utils::members::actor(&carol))
            .await
            .unwrap();
        Subscribe { target: bob.id }
            .perform(&app, &test_utils::members::actor(&carol))
            .await
            .unwrap();
        likes::toggle(&app, carol.id, Target::member(bob.id))
            .await
            .unwrap();

        let request = GetFollowers {
            member: alice.id,
            page: PageRequest::new(1, 10),
        };
        let page = request
            .perform(&app, &test_utils::members::actor(&carol))
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        // newest edge first
        let nicks = page
            .list
            .iter()
            .map(|v| v.member.as_ref().unwrap().nick.as_str())
            .collect::<Vec<_>>();
        assert_eq!(nicks, vec!["carol", "bob"]);

        let bob_entry = &page.list[1];
        assert!(bob_entry.me_liked);
        assert!(bob_entry.me_followed);

        let request = GetFollowers {
            member: alice.id,
            page: PageRequest::new(1, 10),
        };
        let page = request.perform(&app, &Actor::Anonymous).await.unwrap();
        assert!(page.list.iter().all(|v| !v.me_liked && !v.me_followed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_invalid_page() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let category = GetFollowings {
            member: alice.id,
            page: PageRequest::new(0, 10),
        }
        .perform(&app, &Actor::Anonymous)
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::InvalidRequest);
    }
}
