use crate::database::UpdateScope;
use crate::error::{Error, ErrorCategory, Result};
use crate::model::member::MemberKind;
use crate::model::property::{InsertProperty, PropertyFilter, PropertyStatus, UpdateProperty};
use crate::model::{
    MemberId, MemberStat, PageRequest, Paginated, Property, PropertyId, PropertyStat,
    PropertyView, Target, TargetGroup,
};
use crate::services::notifications::{notify_followers_of_create, notify_on_like, Created, Liked};
use crate::services::{likes, stats, util, views};
use crate::{Actor, App};

fn target(id: PropertyId) -> Target {
    Target::new(TargetGroup::Property, id.0)
}

pub(crate) async fn view_of(
    app: &App,
    actor: &Actor,
    property: Property,
) -> Result<PropertyView> {
    Ok(PropertyView {
        me_liked: likes::liked_by(app, actor, target(property.id)).await?,
        member: app.data.find_member(property.member_id).await?,
        property,
    })
}

async fn views_of(
    app: &App,
    actor: &Actor,
    page: Paginated<Property>,
) -> Result<Paginated<PropertyView>> {
    let mut list = Vec::with_capacity(page.list.len());
    for property in page.list {
        list.push(view_of(app, actor, property).await?);
    }
    Ok(Paginated {
        list,
        total: page.total,
    })
}

/// Stamps the status change and updates the property. Leaving the
/// market, by renting or deleting, takes one off the owner's count.
async fn apply_update(
    app: &App,
    id: PropertyId,
    mut form: UpdateProperty,
    scope: UpdateScope,
) -> Result<Property> {
    match form.status {
        Some(PropertyStatus::Rent) => form.rented_at = Some(util::now()),
        Some(PropertyStatus::Delete) => form.deleted_at = Some(util::now()),
        _ => {}
    }
    if let Some(title) = &form.title {
        util::check_title(title)?;
    }

    let property = app
        .data
        .update_property(id, &form, scope)
        .await?
        .ok_or_else(|| Error::new(ErrorCategory::UpdateFailed))?;

    if matches!(
        form.status,
        Some(PropertyStatus::Rent | PropertyStatus::Delete)
    ) {
        stats::adjust_member(app, property.member_id, MemberStat::Properties, -1).await?;
    }

    Ok(property)
}

#[derive(Debug)]
pub struct CreateProperty {
    pub form: InsertProperty,
}

impl CreateProperty {
    #[tracing::instrument(skip_all, name = "services.properties.create")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Property> {
        let agent = util::require_member_kind(app, actor, &[MemberKind::Agent]).await?;
        util::check_title(&self.form.title)?;

        let property = app
            .data
            .insert_property(agent.id, &self.form)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))?;

        stats::adjust_member(app, agent.id, MemberStat::Properties, 1).await?;
        notify_followers_of_create(app, &agent, Created::Property(&property)).await;

        Ok(property)
    }
}

#[derive(Debug)]
pub struct GetProperty {
    pub id: PropertyId,
}

impl GetProperty {
    #[tracing::instrument(name = "services.properties.get")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<PropertyView> {
        let property = app
            .data
            .find_property(self.id)
            .await?
            .filter(|v| v.status != PropertyStatus::Delete)
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))?;

        let first_view = match actor.member_id() {
            Some(viewer) => views::record_first_view(app, viewer, target(property.id))
                .await?
                .is_some(),
            None => false,
        };

        let property = if first_view {
            stats::adjust_property(app, property.id, PropertyStat::Views, 1).await?
        } else {
            property
        };
        view_of(app, actor, property).await
    }
}

/// Updates a property of the acting agent.
#[derive(Debug)]
pub struct UpdatePropertyListing {
    pub id: PropertyId,
    pub form: UpdateProperty,
}

impl UpdatePropertyListing {
    #[tracing::instrument(skip_all, name = "services.properties.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Property> {
        let agent = util::require_member_kind(app, actor, &[MemberKind::Agent]).await?;
        apply_update(app, self.id, self.form, UpdateScope::Owner(agent.id)).await
    }
}

/// Public listing. Rented properties stay listed, deleted ones never are.
#[derive(Debug, Default)]
pub struct GetProperties {
    pub filter: PropertyFilter,
    pub page: PageRequest,
}

impl GetProperties {
    #[tracing::instrument(name = "services.properties.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<PropertyView>> {
        util::check_page(&self.page)?;
        let filter = PropertyFilter {
            status: self.filter.status.filter(|v| *v != PropertyStatus::Delete),
            ..self.filter
        };

        let page = app.data.list_properties(&filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

/// The acting agent's own properties.
#[derive(Debug, Default)]
pub struct GetAgentProperties {
    pub status: Option<PropertyStatus>,
    pub page: PageRequest,
}

impl GetAgentProperties {
    #[tracing::instrument(name = "services.properties.agent")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<PropertyView>> {
        let agent = util::require_member_kind(app, actor, &[MemberKind::Agent]).await?;
        if self.status == Some(PropertyStatus::Delete) {
            return Err(Error::new(ErrorCategory::NotAllowed));
        }
        util::check_page(&self.page)?;

        let filter = PropertyFilter {
            member_id: Some(agent.id),
            status: self.status,
            ..Default::default()
        };

        let page = app.data.list_properties(&filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug)]
pub struct LikeProperty {
    pub id: PropertyId,
}

impl LikeProperty {
    #[tracing::instrument(name = "services.properties.like")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Property> {
        let liker = util::require_active_member(app, actor).await?;
        let property = app
            .data
            .find_property(self.id)
            .await?
            .filter(|v| v.status != PropertyStatus::Delete)
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))?;

        let modifier = likes::toggle(app, liker.id, target(property.id)).await?;
        let property =
            stats::adjust_property(app, property.id, PropertyStat::Likes, modifier).await?;

        notify_on_like(app, &liker, Liked::Property(&property), modifier).await;
        Ok(property)
    }
}

#[derive(Debug, Default)]
pub struct GetAllPropertiesByAdmin {
    pub filter: PropertyFilter,
    pub page: PageRequest,
}

impl GetAllPropertiesByAdmin {
    #[tracing::instrument(name = "services.properties.admin.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<PropertyView>> {
        util::require_admin(app, actor).await?;
        util::check_page(&self.page)?;

        let page = app.data.list_properties(&self.filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug)]
pub struct UpdatePropertyByAdmin {
    pub id: PropertyId,
    pub form: UpdateProperty,
}

impl UpdatePropertyByAdmin {
    #[tracing::instrument(skip_all, name = "services.properties.admin.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Property> {
        util::require_admin(app, actor).await?;
        apply_update(app, self.id, self.form, UpdateScope::Admin).await
    }
}

/// Removes a property for good. It has to be marked as deleted first.
#[derive(Debug)]
pub struct RemovePropertyByAdmin {
    pub id: PropertyId,
}

impl RemovePropertyByAdmin {
    #[tracing::instrument(name = "services.properties.admin.remove")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Property> {
        util::require_admin(app, actor).await?;
        app.data
            .remove_property(self.id)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::RemoveFailed))
    }
}

/// Owner of a property, if it exists.
pub(crate) async fn owner_of(app: &App, id: PropertyId) -> Result<Option<MemberId>> {
    Ok(app.data.find_property(id).await?.map(|v| v.member_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NotificationGroup, NotificationKind};
    use crate::services::follows::Subscribe;
    use crate::test_utils::{self, forms, TestResultExt};

    async fn setup() -> (App, crate::model::Member) {
        let app = test_utils::build_test_app();
        let agent = test_utils::members::register_as(&app, "agent", MemberKind::Agent).await;
        (app, agent)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_fan_out_creation_to_each_follower() {
        let (app, agent) = setup().await;
        let mut followers = Vec::new();
        for nick in ["anna", "ben", "cara"] {
            let member = test_utils::members::register(&app, nick).await;
            Subscribe { target: agent.id }
                .perform(&app, &test_utils::members::actor(&member))
                .await
                .unwrap();
            followers.push(member);
        }
        let loner = test_utils::members::register(&app, "loner").await;

        let property = CreateProperty {
            form: forms::property("Riverside Hall"),
        }
        .perform(&app, &test_utils::members::actor(&agent))
        .await
        .unwrap();

        for follower in &followers {
            let list = app.data.list_notifications(follower.id, None).await.unwrap();
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].kind, NotificationKind::Create);
            assert_eq!(list[0].group, NotificationGroup::Property);
            assert_eq!(list[0].property_id, Some(property.id));
            assert_eq!(list[0].title, "agent created a new property: Riverside Hall");
            assert_eq!(list[0].description.as_deref(), Some("Check out the new property."));
        }
        let list = app.data.list_notifications(loner.id, None).await.unwrap();
        assert!(list.is_empty());

        let agent = test_utils::members::reload(&app, agent.id).await;
        assert_eq!(agent.properties, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_only_let_agents_create() {
        let (app, _) = setup().await;
        let alice = test_utils::members::register(&app, "alice").await;

        let category = CreateProperty {
            form: forms::property("Nope"),
        }
        .perform(&app, &test_utils::members::actor(&alice))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::NotAllowed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_count_views_once_per_member() {
        let (app, agent) = setup().await;
        let alice = test_utils::members::register(&app, "alice").await;
        let property = app
            .data
            .insert_property(agent.id, &forms::property("Garden"))
            .await
            .unwrap();

        let actor = test_utils::members::actor(&alice);
        for _ in 0..3 {
            GetProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        }
        GetProperty { id: property.id }
            .perform(&app, &Actor::Anonymous)
            .await
            .unwrap();

        let view = GetProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(view.property.views, 1);
        assert_eq!(view.member.map(|v| v.id), Some(agent.id));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_keep_likes_in_step_with_ledger() {
        let (app, agent) = setup().await;
        let alice = test_utils::members::register(&app, "alice").await;
        let property = app
            .data
            .insert_property(agent.id, &forms::property("Loft"))
            .await
            .unwrap();
        let actor = test_utils::members::actor(&alice);

        let liked = LikeProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(liked.likes, 1);
        let view = GetProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        assert!(view.me_liked);

        let unliked = LikeProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(unliked.likes, 0);
        let view = GetProperty { id: property.id }.perform(&app, &actor).await.unwrap();
        assert!(!view.me_liked);

        let list = app.data.list_notifications(agent.id, None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "alice liked your Loft property!");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_stamp_rent_and_decrement_owner_count() {
        let (app, agent) = setup().await;
        let actor = test_utils::members::actor(&agent);
        let property = CreateProperty {
            form: forms::property("Barn"),
        }
        .perform(&app, &actor)
        .await
        .unwrap();

        let updated = UpdatePropertyListing {
            id: property.id,
            form: UpdateProperty {
                status: Some(PropertyStatus::Rent),
                ..Default::default()
            },
        }
        .perform(&app, &actor)
        .await
        .unwrap();

        assert_eq!(updated.status, PropertyStatus::Rent);
        assert!(updated.rented_at.is_some());
        assert!(updated.deleted_at.is_none());

        let agent = test_utils::members::reload(&app, agent.id).await;
        assert_eq!(agent.properties, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_update_someone_elses_property() {
        let (app, agent) = setup().await;
        let other = test_utils::members::register_as(&app, "other", MemberKind::Agent).await;
        let property = app
            .data
            .insert_property(agent.id, &forms::property("Hall"))
            .await
            .unwrap();

        let category = UpdatePropertyListing {
            id: property.id,
            form: UpdateProperty {
                title: Some("Mine now".into()),
                ..Default::default()
            },
        }
        .perform(&app, &test_utils::members::actor(&other))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::UpdateFailed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_deleted_status_in_agent_listing() {
        let (app, agent) = setup().await;
        let category = GetAgentProperties {
            status: Some(PropertyStatus::Delete),
            page: PageRequest::default(),
        }
        .perform(&app, &test_utils::members::actor(&agent))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::NotAllowed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_only_remove_deleted_properties() {
        let (app, agent) = setup().await;
        let admin = test_utils::members::register_as(&app, "admin", MemberKind::Admin).await;
        let admin = test_utils::members::actor(&admin);
        let property = app
            .data
            .insert_property(agent.id, &forms::property("Hall"))
            .await
            .unwrap();

        let category = RemovePropertyByAdmin { id: property.id }
            .perform(&app, &admin)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::RemoveFailed);

        UpdatePropertyByAdmin {
            id: property.id,
            form: UpdateProperty {
                status: Some(PropertyStatus::Delete),
                ..Default::default()
            },
        }
        .perform(&app, &admin)
        .await
        .unwrap();

        RemovePropertyByAdmin { id: property.id }
            .perform(&app, &admin)
            .await
            .unwrap();
        assert!(app.data.find_property(property.id).await.unwrap().is_none());
    }

    async fn set_status(app: &App, actor: &Actor, id: PropertyId, status: PropertyStatus) {
        UpdatePropertyListing {
            id,
            form: UpdateProperty {
                status: Some(status),
                ..Default::default()
            },
        }
        .perform(app, actor)
        .await
        .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_list_rented_but_not_deleted_properties() {
        let (app, agent) = setup().await;
        let actor = test_utils::members::actor(&agent);
        let mut ids = Vec::new();
        for title in ["One", "Two", "Three", "Four"] {
            let property = CreateProperty {
                form: forms::property(title),
            }
            .perform(&app, &actor)
            .await
            .unwrap();
            ids.push(property.id);
        }
        set_status(&app, &actor, ids[2], PropertyStatus::Rent).await;
        set_status(&app, &actor, ids[3], PropertyStatus::Delete).await;

        let page = GetProperties::default()
            .perform(&app, &Actor::Anonymous)
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        // newest first
        assert_eq!(page.list[0].property.title, "Three");
        assert_eq!(page.list[0].property.status, PropertyStatus::Rent);

        let page = GetProperties {
            filter: PropertyFilter {
                status: Some(PropertyStatus::Delete),
                ..Default::default()
            },
            page: PageRequest::default(),
        }
        .perform(&app, &Actor::Anonymous)
        .await
        .unwrap();
        assert_eq!(page.total, 3);
        assert!(page
            .list
            .iter()
            .all(|v| v.property.status != PropertyStatus::Delete));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_like_rented_but_not_deleted_properties() {
        let (app, agent) = setup().await;
        let owner = test_utils::members::actor(&agent);
        let alice = test_utils::members::register(&app, "alice").await;
        let actor = test_utils::members::actor(&alice);

        let rented = CreateProperty {
            form: forms::property("Rented"),
        }
        .perform(&app, &owner)
        .await
        .unwrap();
        set_status(&app, &owner, rented.id, PropertyStatus::Rent).await;

        let liked = LikeProperty { id: rented.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(liked.likes, 1);
        assert_eq!(liked.status, PropertyStatus::Rent);

        let deleted = CreateProperty {
            form: forms::property("Gone"),
        }
        .perform(&app, &owner)
        .await
        .unwrap();
        set_status(&app, &owner, deleted.id, PropertyStatus::Delete).await;

        let category = LikeProperty { id: deleted.id }
            .perform(&app, &actor)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }
}
