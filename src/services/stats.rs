//! Counter store. Counters are only ever moved by a signed delta in a
//! single store operation, never read, changed and written back.
use crate::error::{Error, ErrorCategory, Result};
use crate::model::{
    Article, ArticleId, ArticleStat, Equipment, EquipmentId, EquipmentStat, Member, MemberId,
    MemberStat, Property, PropertyId, PropertyStat,
};
use crate::App;

fn not_found() -> Error {
    Error::new(ErrorCategory::NotFound)
}

#[tracing::instrument(skip(app), name = "services.stats.member")]
pub async fn adjust_member(
    app: &App,
    id: MemberId,
    stat: MemberStat,
    delta: i64,
) -> Result<Member> {
    app.data
        .adjust_member_stat(id, stat, delta)
        .await?
        .ok_or_else(not_found)
}

#[tracing::instrument(skip(app), name = "services.stats.property")]
pub async fn adjust_property(
    app: &App,
    id: PropertyId,
    stat: PropertyStat,
    delta: i64,
) -> Result<Property> {
    app.data
        .adjust_property_stat(id, stat, delta)
        .await?
        .ok_or_else(not_found)
}

#[tracing::instrument(skip(app), name = "services.stats.equipment")]
pub async fn adjust_equipment(
    app: &App,
    id: EquipmentId,
    stat: EquipmentStat,
    delta: i64,
) -> Result<Equipment> {
    app.data
        .adjust_equipment_stat(id, stat, delta)
        .await?
        .ok_or_else(not_found)
}

#[tracing::instrument(skip(app), name = "services.stats.article")]
pub async fn adjust_article(
    app: &App,
    id: ArticleId,
    stat: ArticleStat,
    delta: i64,
) -> Result<Article> {
    app.data
        .adjust_article_stat(id, stat, delta)
        .await?
        .ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test]
    async fn adjusts_by_signed_delta() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let member = adjust_member(&app, alice.id, MemberStat::Points, 5).await.unwrap();
        assert_eq!(member.points, 5);

        let member = adjust_member(&app, alice.id, MemberStat::Points, -2).await.unwrap();
        assert_eq!(member.points, 3);
    }

    #[tokio::test]
    async fn missing_entity_is_not_found() {
        let app = test_utils::build_test_app();
        let category = adjust_property(&app, PropertyId(404), PropertyStat::Likes, 1)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let tasks = (0..50)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move {
                    adjust_member(&app, alice.id, MemberStat::Views, 1).await.unwrap();
                })
            })
            .collect::<Vec<_>>();

        for task in futures::future::join_all(tasks).await {
            task.unwrap();
        }

        let member = app.data.find_member(alice.id).await.unwrap().unwrap();
        assert_eq!(member.views, 50);
    }
}
