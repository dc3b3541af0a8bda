//! View ledger. Recording a view and counting it are separate steps so
//! the counter only moves when a view is seen for the first time.
use crate::error::Result;
use crate::model::{MemberId, Target, View};
use crate::App;

/// Returns the new record, or `None` if the member has already seen
/// the target.
#[tracing::instrument(skip(app), name = "services.views.record_first")]
pub async fn record_first_view(
    app: &App,
    member: MemberId,
    target: Target,
) -> Result<Option<View>> {
    Ok(app.data.insert_view(member, target).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TargetGroup;
    use crate::test_utils;

    #[tokio::test]
    async fn second_view_is_a_no_op() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let target = Target::new(TargetGroup::Article, 3);

        let first = record_first_view(&app, alice.id, target).await.unwrap();
        assert_eq!(first.map(|v| v.target()), Some(target));

        let second = record_first_view(&app, alice.id, target).await.unwrap();
        assert!(second.is_none());
    }
}
