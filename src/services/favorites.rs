//! What a member liked or looked at, across properties and equipment.
use serde::Serialize;

use crate::error::Result;
use crate::model::{EquipmentView, MemberId, PageRequest, Paginated, PropertyView, TargetGroup};
use crate::services::{equipment, properties, util};
use crate::{Actor, App};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Favorite {
    Property(PropertyView),
    Equipment(EquipmentView),
}

#[derive(Debug, Clone, Copy)]
enum Ledger {
    Likes,
    Views,
}

/// Loads a page of ledger records per group and resolves them. Entities
/// that are gone by now are skipped.
async fn collect(
    app: &App,
    actor: &Actor,
    member: MemberId,
    ledger: Ledger,
    page: &PageRequest,
) -> Result<Paginated<Favorite>> {
    util::check_page(page)?;

    let mut list = Vec::new();
    let mut total = 0;
    for group in [TargetGroup::Property, TargetGroup::Equipment] {
        let (ids, count) = match ledger {
            Ledger::Likes => {
                let records = app.data.list_likes(member, group, page).await?;
                let ids = records.list.iter().map(|v| v.ref_id).collect::<Vec<_>>();
                (ids, records.total)
            }
            Ledger::Views => {
                let records = app.data.list_views(member, group, page).await?;
                let ids = records.list.iter().map(|v| v.ref_id).collect::<Vec<_>>();
                (ids, records.total)
            }
        };
        total += count;

        for id in ids {
            let favorite = match group {
                TargetGroup::Property => match app.data.find_property(id.into()).await? {
                    Some(v) => Favorite::Property(properties::view_of(app, actor, v).await?),
                    None => continue,
                },
                TargetGroup::Equipment => match app.data.find_equipment(id.into()).await? {
                    Some(v) => Favorite::Equipment(equipment::view_of(app, actor, v).await?),
                    None => continue,
                },
                TargetGroup::Member | TargetGroup::Article => continue,
            };
            list.push(favorite);
        }
    }

    Ok(Paginated { list, total })
}

/// Properties and equipment the actor liked, newest like first.
#[derive(Debug, Default)]
pub struct GetFavorites {
    pub page: PageRequest,
}

impl GetFavorites {
    #[tracing::instrument(name = "services.favorites.liked")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<Favorite>> {
        let member = actor.require()?;
        collect(app, actor, member, Ledger::Likes, &self.page).await
    }
}

/// Properties and equipment the actor has looked at.
#[derive(Debug, Default)]
pub struct GetVisited {
    pub page: PageRequest,
}

impl GetVisited {
    #[tracing::instrument(name = "services.favorites.visited")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<Favorite>> {
        let member = actor.require()?;
        collect(app, actor, member, Ledger::Views, &self.page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::member::MemberKind;
    use crate::services::equipment::{GetEquipment, LikeEquipment};
    use crate::services::properties::{GetProperty, LikeProperty};
    use crate::test_utils::{self, forms};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_collect_both_groups() {
        let app = test_utils::build_test_app();
        let agent = test_utils::members::register_as(&app, "agent", MemberKind::Agent).await;
        let alice = test_utils::members::register(&app, "alice").await;
        let actor = test_utils::members::actor(&alice);

        let property = app
            .data
            .insert_property(agent.id, &forms::property("Hall"))
            .await
            .unwrap();
        let equipment = app
            .data
            .insert_equipment(agent.id, &forms::equipment("Speakers"))
            .await
            .unwrap();

        LikeProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        LikeEquipment { id: equipment.id }.perform(&app, &actor).await.unwrap();
        GetProperty { id: property.id }.perform(&app, &actor).await.unwrap();

        let liked = GetFavorites::default().perform(&app, &actor).await.unwrap();
        assert_eq!(liked.total, 2);
        assert!(matches!(liked.list[0], Favorite::Property(ref v) if v.me_liked));
        assert!(matches!(liked.list[1], Favorite::Equipment(..)));

        let visited = GetVisited::default().perform(&app, &actor).await.unwrap();
        assert_eq!(visited.total, 1);

        GetEquipment { id: equipment.id }.perform(&app, &actor).await.unwrap();
        let visited = GetVisited::default().perform(&app, &actor).await.unwrap();
        assert_eq!(visited.total, 2);
    }
}
