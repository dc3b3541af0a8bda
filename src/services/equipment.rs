use crate::database::UpdateScope;
use crate::error::{Error, ErrorCategory, Result};
use crate::model::equipment::{EquipmentFilter, EquipmentStatus, InsertEquipment, UpdateEquipment};
use crate::model::member::MemberKind;
use crate::model::{
    Equipment, EquipmentId, EquipmentStat, EquipmentView, MemberId, MemberStat, PageRequest,
    Paginated, Target, TargetGroup,
};
use crate::services::notifications::{notify_followers_of_create, notify_on_like, Created, Liked};
use crate::services::{likes, stats, util, views};
use crate::{Actor, App};

fn target(id: EquipmentId) -> Target {
    Target::new(TargetGroup::Equipment, id.0)
}

pub(crate) async fn view_of(
    app: &App,
    actor: &Actor,
    equipment: Equipment,
) -> Result<EquipmentView> {
    Ok(EquipmentView {
        me_liked: likes::liked_by(app, actor, target(equipment.id)).await?,
        member: app.data.find_member(equipment.member_id).await?,
        equipment,
    })
}

async fn views_of(
    app: &App,
    actor: &Actor,
    page: Paginated<Equipment>,
) -> Result<Paginated<EquipmentView>> {
    let mut list = Vec::with_capacity(page.list.len());
    for equipment in page.list {
        list.push(view_of(app, actor, equipment).await?);
    }
    Ok(Paginated {
        list,
        total: page.total,
    })
}

async fn apply_update(
    app: &App,
    id: EquipmentId,
    mut form: UpdateEquipment,
    scope: UpdateScope,
) -> Result<Equipment> {
    let now = util::now();
    match form.status {
        Some(EquipmentStatus::Rent) => form.rented_at = Some(now),
        Some(EquipmentStatus::Retired) => form.retired_at = Some(now),
        Some(EquipmentStatus::Maintenance) => form.maintained_at = Some(now),
        _ => {}
    }
    if let Some(title) = &form.title {
        util::check_title(title)?;
    }

    let equipment = app
        .data
        .update_equipment(id, &form, scope)
        .await?
        .ok_or_else(|| Error::new(ErrorCategory::UpdateFailed))?;

    // anything but active takes it off the owner's count
    if form.status.is_some_and(|v| v != EquipmentStatus::Active) {
        stats::adjust_member(app, equipment.member_id, MemberStat::Equipments, -1).await?;
    }

    Ok(equipment)
}

#[derive(Debug)]
pub struct CreateEquipment {
    pub form: InsertEquipment,
}

impl CreateEquipment {
    #[tracing::instrument(skip_all, name = "services.equipment.create")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Equipment> {
        let agent = util::require_member_kind(app, actor, &[MemberKind::Agent]).await?;
        util::check_title(&self.form.title)?;

        let equipment = app
            .data
            .insert_equipment(agent.id, &self.form)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))?;

        stats::adjust_member(app, agent.id, MemberStat::Equipments, 1).await?;
        notify_followers_of_create(app, &agent, Created::Equipment(&equipment)).await;

        Ok(equipment)
    }
}

#[derive(Debug)]
pub struct GetEquipment {
    pub id: EquipmentId,
}

impl GetEquipment {
    #[tracing::instrument(name = "services.equipment.get")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<EquipmentView> {
        let equipment = app
            .data
            .find_equipment(self.id)
            .await?
            .filter(|v| v.status == EquipmentStatus::Active)
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))?;

        let first_view = match actor.member_id() {
            Some(viewer) => views::record_first_view(app, viewer, target(equipment.id))
                .await?
                .is_some(),
            None => false,
        };

        let equipment = if first_view {
            stats::adjust_equipment(app, equipment.id, EquipmentStat::Views, 1).await?
        } else {
            equipment
        };
        view_of(app, actor, equipment).await
    }
}

#[derive(Debug)]
pub struct UpdateEquipmentListing {
    pub id: EquipmentId,
    pub form: UpdateEquipment,
}

impl UpdateEquipmentListing {
    #[tracing::instrument(skip_all, name = "services.equipment.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Equipment> {
        let agent = util::require_member_kind(app, actor, &[MemberKind::Agent]).await?;
        apply_update(app, self.id, self.form, UpdateScope::Owner(agent.id)).await
    }
}

#[derive(Debug, Default)]
pub struct GetEquipments {
    pub filter: EquipmentFilter,
    pub page: PageRequest,
}

impl GetEquipments {
    #[tracing::instrument(name = "services.equipment.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<EquipmentView>> {
        util::check_page(&self.page)?;
        let filter = EquipmentFilter {
            status: Some(EquipmentStatus::Active),
            ..self.filter
        };

        let page = app.data.list_equipment(&filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug, Default)]
pub struct GetAgentEquipments {
    pub status: Option<EquipmentStatus>,
    pub page: PageRequest,
}

impl GetAgentEquipments {
    #[tracing::instrument(name = "services.equipment.agent")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<EquipmentView>> {
        let agent = util::require_member_kind(app, actor, &[MemberKind::Agent]).await?;
        if self.status == Some(EquipmentStatus::Retired) {
            return Err(Error::new(ErrorCategory::NotAllowed));
        }
        util::check_page(&self.page)?;

        let filter = EquipmentFilter {
            member_id: Some(agent.id),
            status: self.status,
            ..Default::default()
        };

        let page = app.data.list_equipment(&filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug)]
pub struct LikeEquipment {
    pub id: EquipmentId,
}

impl LikeEquipment {
    #[tracing::instrument(name = "services.equipment.like")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Equipment> {
        let liker = util::require_active_member(app, actor).await?;
        let equipment = app
            .data
            .find_equipment(self.id)
            .await?
            .filter(|v| v.status == EquipmentStatus::Active)
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))?;

        let modifier = likes::toggle(app, liker.id, target(equipment.id)).await?;
        let equipment =
            stats::adjust_equipment(app, equipment.id, EquipmentStat::Likes, modifier).await?;

        notify_on_like(app, &liker, Liked::Equipment(&equipment), modifier).await;
        Ok(equipment)
    }
}

#[derive(Debug, Default)]
pub struct GetAllEquipmentsByAdmin {
    pub filter: EquipmentFilter,
    pub page: PageRequest,
}

impl GetAllEquipmentsByAdmin {
    #[tracing::instrument(name = "services.equipment.admin.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<EquipmentView>> {
        util::require_admin(app, actor).await?;
        util::check_page(&self.page)?;

        let page = app.data.list_equipment(&self.filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug)]
pub struct UpdateEquipmentByAdmin {
    pub id: EquipmentId,
    pub form: UpdateEquipment,
}

impl UpdateEquipmentByAdmin {
    #[tracing::instrument(skip_all, name = "services.equipment.admin.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Equipment> {
        util::require_admin(app, actor).await?;
        apply_update(app, self.id, self.form, UpdateScope::Admin).await
    }
}

/// Removes equipment for good. It has to be retired first.
#[derive(Debug)]
pub struct RemoveEquipmentByAdmin {
    pub id: EquipmentId,
}

impl RemoveEquipmentByAdmin {
    #[tracing::instrument(name = "services.equipment.admin.remove")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Equipment> {
        util::require_admin(app, actor).await?;
        app.data
            .remove_equipment(self.id)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::RemoveFailed))
    }
}

pub(crate) async fn owner_of(app: &App, id: EquipmentId) -> Result<Option<MemberId>> {
    Ok(app.data.find_equipment(id).await?.map(|v| v.member_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, NotificationGroup};
    use crate::services::follows::Subscribe;
    use crate::test_utils::{self, forms, TestResultExt};

    async fn setup() -> (App, Member) {
        let app = test_utils::build_test_app();
        let agent = test_utils::members::register_as(&app, "agent", MemberKind::Agent).await;
        (app, agent)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_notify_followers_with_equipment_id() {
        let (app, agent) = setup().await;
        let alice = test_utils::members::register(&app, "alice").await;
        Subscribe { target: agent.id }
            .perform(&app, &test_utils::members::actor(&alice))
            .await
            .unwrap();

        let equipment = CreateEquipment {
            form: forms::equipment("Line array"),
        }
        .perform(&app, &test_utils::members::actor(&agent))
        .await
        .unwrap();

        let list = app.data.list_notifications(alice.id, None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].group, NotificationGroup::Equipment);
        assert_eq!(list[0].equipment_id, Some(equipment.id));
        assert_eq!(list[0].title, "agent created a new equipment: Line array");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_stamp_maintenance_and_lock_owner_out() {
        let (app, agent) = setup().await;
        let actor = test_utils::members::actor(&agent);
        let equipment = CreateEquipment {
            form: forms::equipment("Projector"),
        }
        .perform(&app, &actor)
        .await
        .unwrap();

        let updated = UpdateEquipmentListing {
            id: equipment.id,
            form: UpdateEquipment {
                status: Some(EquipmentStatus::Maintenance),
                ..Default::default()
            },
        }
        .perform(&app, &actor)
        .await
        .unwrap();
        assert!(updated.maintained_at.is_some());
        assert_eq!(test_utils::members::reload(&app, agent.id).await.equipments, 0);

        // no longer active, so only admins may touch it
        let category = UpdateEquipmentListing {
            id: equipment.id,
            form: UpdateEquipment {
                title: Some("Projector v2".into()),
                ..Default::default()
            },
        }
        .perform(&app, &actor)
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::UpdateFailed);

        let category = GetEquipment { id: equipment.id }
            .perform(&app, &Actor::Anonymous)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_toggle_equipment_likes() {
        let (app, agent) = setup().await;
        let alice = test_utils::members::register(&app, "alice").await;
        let equipment = app
            .data
            .insert_equipment(agent.id, &forms::equipment("Tent"))
            .await
            .unwrap();
        let actor = test_utils::members::actor(&alice);

        let liked = LikeEquipment { id: equipment.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(liked.likes, 1);
        let unliked = LikeEquipment { id: equipment.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(unliked.likes, 0);

        let list = app.data.list_notifications(agent.id, None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "alice liked your Tent equipment!");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_only_remove_retired_equipment() {
        let (app, agent) = setup().await;
        let admin = test_utils::members::register_as(&app, "admin", MemberKind::Admin).await;
        let admin = test_utils::members::actor(&admin);
        let equipment = app
            .data
            .insert_equipment(agent.id, &forms::equipment("Stage"))
            .await
            .unwrap();

        let category = RemoveEquipmentByAdmin { id: equipment.id }
            .perform(&app, &admin)
            .await
            .expect_error_category();
        assert_eq!(category, ErrorCategory::RemoveFailed);

        let retired = UpdateEquipmentByAdmin {
            id: equipment.id,
            form: UpdateEquipment {
                status: Some(EquipmentStatus::Retired),
                ..Default::default()
            },
        }
        .perform(&app, &admin)
        .await
        .unwrap();
        assert!(retired.retired_at.is_some());

        RemoveEquipmentByAdmin { id: equipment.id }
            .perform(&app, &admin)
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_count_views_once() {
        let (app, agent) = setup().await;
        let alice = test_utils::members::register(&app, "alice").await;
        let equipment = app
            .data
            .insert_equipment(agent.id, &forms::equipment("Mixer"))
            .await
            .unwrap();
        let actor = test_utils::members::actor(&alice);

        GetEquipment { id: equipment.id }.perform(&app, &actor).await.unwrap();
        let view = GetEquipment { id: equipment.id }.perform(&app, &actor).await.unwrap();
        assert_eq!(view.equipment.views, 1);
    }
}
