//! Like ledger. A like is the presence of a record, so toggling flips
//! between creating and deleting it.
use crate::error::{Error, ErrorCategory, Result};
use crate::model::{MemberId, Target};
use crate::{Actor, App};

/// Removes the like and returns `-1` if it exists, otherwise records
/// it and returns `+1`. Repeated calls alternate.
///
/// The returned modifier always matches a row that this call deleted
/// or inserted, so it can be applied to the counter as is.
#[tracing::instrument(skip(app), name = "services.likes.toggle")]
pub async fn toggle(app: &App, member: MemberId, target: Target) -> Result<i64> {
    if app.data.delete_like(member, target).await?.is_some() {
        return Ok(-1);
    }

    match app.data.insert_like(member, target).await {
        Ok(..) => Ok(1),
        Err(report) => Err(Error::from_report(ErrorCategory::CreateFailed, report)),
    }
}

pub async fn exists(app: &App, member: MemberId, target: Target) -> Result<bool> {
    Ok(app.data.find_like(member, target).await?.is_some())
}

/// Anonymous viewers never like anything.
pub async fn liked_by(app: &App, actor: &Actor, target: Target) -> Result<bool> {
    match actor.member_id() {
        Some(member) => exists(app, member, target).await,
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TargetGroup;
    use crate::test_utils;

    #[tokio::test]
    async fn toggle_alternates_and_leaves_no_record() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let target = Target::new(TargetGroup::Property, 77);

        assert_eq!(toggle(&app, alice.id, target).await.unwrap(), 1);
        assert!(exists(&app, alice.id, target).await.unwrap());

        assert_eq!(toggle(&app, alice.id, target).await.unwrap(), -1);
        assert!(!exists(&app, alice.id, target).await.unwrap());
    }

    #[tokio::test]
    async fn same_id_in_another_group_is_a_different_target() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        toggle(&app, alice.id, Target::new(TargetGroup::Article, 1))
            .await
            .unwrap();

        let other = Target::new(TargetGroup::Equipment, 1);
        assert!(!exists(&app, alice.id, other).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_add_up_to_the_ledger() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let target = Target::new(TargetGroup::Property, 5);

        for _ in 0..20 {
            let liked_before = i64::from(exists(&app, alice.id, target).await.unwrap());
            let toggles = (0..2).map(|_| toggle(&app, alice.id, target));
            let modifiers = futures::future::join_all(toggles).await;

            // a toggle that lost the race fails without touching the ledger
            let applied: i64 = modifiers.into_iter().map(|v| v.unwrap_or(0)).sum();
            let liked_after = i64::from(exists(&app, alice.id, target).await.unwrap());
            assert_eq!(liked_before + applied, liked_after);
        }
    }

    #[tokio::test]
    async fn unlike_of_a_missing_row_never_decrements() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let target = Target::new(TargetGroup::Article, 8);

        app.data.insert_like(alice.id, target).await.unwrap();
        app.data.delete_like(alice.id, target).await.unwrap();

        assert_eq!(toggle(&app, alice.id, target).await.unwrap(), 1);
        assert!(exists(&app, alice.id, target).await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_never_likes() {
        let app = test_utils::build_test_app();
        let target = Target::new(TargetGroup::Member, 1);
        assert!(!liked_by(&app, &Actor::Anonymous, target).await.unwrap());
    }
}
