use crate::error::{Error, ErrorCategory, Result};
use crate::model::comment::{InsertComment, UpdateComment};
use crate::model::{
    ArticleStat, Comment, CommentId, CommentView, EquipmentStat, MemberId, MemberStat,
    PageRequest, Paginated, PropertyStat, Target, TargetGroup,
};
use crate::services::notifications::notify_on_comment;
use crate::services::{articles, equipment, properties, stats, util};
use crate::{Actor, App};

const CONTENT_MAX: usize = 1000;

fn check_content(content: &str) -> Result<()> {
    let content = content.trim();
    if content.is_empty() || content.chars().count() > CONTENT_MAX {
        return Err(Error::new(ErrorCategory::InvalidRequest)
            .with_message("Comment must be between 1 and 1000 characters"));
    }
    Ok(())
}

/// The member who gets notified about comments on `target`.
async fn owner_of(app: &App, target: Target) -> Result<Option<MemberId>> {
    match target.group {
        TargetGroup::Member => Ok(app.data.find_member(MemberId(target.id)).await?.map(|v| v.id)),
        TargetGroup::Property => properties::owner_of(app, target.id.into()).await,
        TargetGroup::Equipment => equipment::owner_of(app, target.id.into()).await,
        TargetGroup::Article => articles::owner_of(app, target.id.into()).await,
    }
}

async fn count_comment(app: &App, target: Target) -> Result<()> {
    match target.group {
        TargetGroup::Member => {
            stats::adjust_member(app, MemberId(target.id), MemberStat::Comments, 1).await?;
        }
        TargetGroup::Property => {
            stats::adjust_property(app, target.id.into(), PropertyStat::Comments, 1).await?;
        }
        TargetGroup::Equipment => {
            stats::adjust_equipment(app, target.id.into(), EquipmentStat::Comments, 1).await?;
        }
        TargetGroup::Article => {
            stats::adjust_article(app, target.id.into(), ArticleStat::Comments, 1).await?;
        }
    }
    Ok(())
}

#[derive(Debug)]
pub struct CreateComment {
    pub form: InsertComment,
}

impl CreateComment {
    #[tracing::instrument(skip_all, name = "services.comments.create", fields(
        group = ?self.form.group,
        ref_id = self.form.ref_id,
    ))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Comment> {
        let author = util::require_active_member(app, actor).await?;
        check_content(&self.form.content)?;

        let target = Target::new(self.form.group, self.form.ref_id);
        let Some(owner) = owner_of(app, target).await? else {
            return Err(Error::new(ErrorCategory::NotFound));
        };

        let comment = app
            .data
            .insert_comment(author.id, &self.form)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))?;

        count_comment(app, target).await?;
        notify_on_comment(app, &author, &comment, owner).await;

        Ok(comment)
    }
}

/// Edits a comment of the actor while it is still active.
#[derive(Debug)]
pub struct UpdateCommentContent {
    pub id: CommentId,
    pub form: UpdateComment,
}

impl UpdateCommentContent {
    #[tracing::instrument(skip_all, name = "services.comments.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Comment> {
        let author = util::require_active_member(app, actor).await?;
        if let Some(content) = &self.form.content {
            check_content(content)?;
        }

        app.data
            .update_comment(self.id, author.id, &self.form)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::UpdateFailed))
    }
}

/// Active comments of an entity with their authors.
#[derive(Debug)]
pub struct GetComments {
    pub target: Target,
    pub page: PageRequest,
}

impl GetComments {
    #[tracing::instrument(name = "services.comments.list")]
    pub async fn perform(self, app: &App) -> Result<Paginated<CommentView>> {
        util::check_page(&self.page)?;
        let page = app.data.list_comments(self.target, &self.page).await?;

        let mut list = Vec::with_capacity(page.list.len());
        for comment in page.list {
            list.push(CommentView {
                member: app.data.find_member(comment.member_id).await?,
                comment,
            });
        }

        Ok(Paginated {
            list,
            total: page.total,
        })
    }
}

#[derive(Debug)]
pub struct RemoveCommentByAdmin {
    pub id: CommentId,
}

impl RemoveCommentByAdmin {
    #[tracing::instrument(name = "services.comments.admin.remove")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Comment> {
        util::require_admin(app, actor).await?;
        app.data
            .remove_comment(self.id)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::RemoveFailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::comment::CommentStatus;
    use crate::model::member::MemberKind;
    use crate::model::{NotificationGroup, NotificationKind};
    use crate::test_utils::{self, forms, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_count_and_notify_property_owner() {
        let app = test_utils::build_test_app();
        let agent = test_utils::members::register_as(&app, "agent", MemberKind::Agent).await;
        let alice = test_utils::members::register(&app, "alice").await;
        let property = app
            .data
            .insert_property(agent.id, &forms::property("Hall"))
            .await
            .unwrap();

        CreateComment {
            form: InsertComment {
                group: TargetGroup::Property,
                ref_id: property.id.0,
                content: "Lovely place".into(),
            },
        }
        .perform(&app, &test_utils::members::actor(&alice))
        .await
        .unwrap();

        let property = app.data.find_property(property.id).await.unwrap().unwrap();
        assert_eq!(property.comments, 1);

        let list = app.data.list_notifications(agent.id, None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].kind, NotificationKind::Comment);
        assert_eq!(list[0].group, NotificationGroup::Comment);
        assert_eq!(list[0].property_id, Some(property.id));
        assert_eq!(list[0].title, "alice commented: Lovely place!");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_notify_once_per_comment() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;

        for _ in 0..2 {
            CreateComment {
                form: InsertComment {
                    group: TargetGroup::Member,
                    ref_id: bob.id.0,
                    content: "hi".into(),
                },
            }
            .perform(&app, &test_utils::members::actor(&alice))
            .await
            .unwrap();
        }

        assert_eq!(test_utils::members::reload(&app, bob.id).await.comments, 2);
        let list = app.data.list_notifications(bob.id, None).await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_missing_target() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let category = CreateComment {
            form: InsertComment {
                group: TargetGroup::Article,
                ref_id: 404,
                content: "hello?".into(),
            },
        }
        .perform(&app, &test_utils::members::actor(&alice))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_hide_deleted_comments_and_block_edits() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;
        let bob = test_utils::members::register(&app, "bob").await;
        let article = app
            .data
            .insert_article(bob.id, &forms::article("Ask me"))
            .await
            .unwrap();
        let actor = test_utils::members::actor(&alice);

        let comment = CreateComment {
            form: InsertComment {
                group: TargetGroup::Article,
                ref_id: article.id.0,
                content: "first".into(),
            },
        }
        .perform(&app, &actor)
        .await
        .unwrap();

        // bob cannot edit alice's comment
        let category = UpdateCommentContent {
            id: comment.id,
            form: UpdateComment {
                content: Some("hijacked".into()),
                status: None,
            },
        }
        .perform(&app, &test_utils::members::actor(&bob))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::UpdateFailed);

        UpdateCommentContent {
            id: comment.id,
            form: UpdateComment {
                content: None,
                status: Some(CommentStatus::Delete),
            },
        }
        .perform(&app, &actor)
        .await
        .unwrap();

        let page = GetComments {
            target: Target::new(TargetGroup::Article, article.id.0),
            page: PageRequest::default(),
        }
        .perform(&app)
        .await
        .unwrap();
        assert_eq!(page.total, 0);
    }
}
