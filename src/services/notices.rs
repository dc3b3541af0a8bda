use crate::error::{Error, ErrorCategory, Result};
use crate::model::notice::{InsertNotice, NoticeFilter};
use crate::model::{Notice, PageRequest, Paginated};
use crate::services::util;
use crate::{Actor, App};

#[derive(Debug)]
pub struct CreateNotice {
    pub form: InsertNotice,
}

impl CreateNotice {
    #[tracing::instrument(skip_all, name = "services.notices.create")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Notice> {
        let admin = util::require_admin(app, actor).await?;
        util::check_title(&self.form.title)?;

        app.data
            .insert_notice(admin.id, &self.form)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))
    }
}

#[derive(Debug, Default)]
pub struct GetNotices {
    pub filter: NoticeFilter,
    pub page: PageRequest,
}

impl GetNotices {
    #[tracing::instrument(name = "services.notices.list")]
    pub async fn perform(self, app: &App) -> Result<Paginated<Notice>> {
        util::check_page(&self.page)?;
        Ok(app.data.list_notices(&self.filter, &self.page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::member::MemberKind;
    use crate::model::notice::{NoticeCategory, NoticeStatus, NoticeTopic};
    use crate::test_utils::{self, TestResultExt};

    fn faq(title: &str) -> InsertNotice {
        InsertNotice {
            category: NoticeCategory::Faq,
            status: NoticeStatus::Active,
            topic: NoticeTopic::Payment,
            title: title.into(),
            content: "Cards and bank transfers.".into(),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_only_let_admins_post() {
        let app = test_utils::build_test_app();
        let alice = test_utils::members::register(&app, "alice").await;

        let category = CreateNotice {
            form: faq("How do I pay?"),
        }
        .perform(&app, &test_utils::members::actor(&alice))
        .await
        .expect_error_category();
        assert_eq!(category, ErrorCategory::NotAllowed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_filter_notices() {
        let app = test_utils::build_test_app();
        let admin = test_utils::members::register_as(&app, "admin", MemberKind::Admin).await;
        let actor = test_utils::members::actor(&admin);

        CreateNotice {
            form: faq("How do I pay?"),
        }
        .perform(&app, &actor)
        .await
        .unwrap();

        let mut terms = faq("Terms of use");
        terms.category = NoticeCategory::Terms;
        CreateNotice { form: terms }.perform(&app, &actor).await.unwrap();

        let page = GetNotices {
            filter: NoticeFilter {
                category: Some(NoticeCategory::Terms),
                ..Default::default()
            },
            page: PageRequest::default(),
        }
        .perform(&app)
        .await
        .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.list[0].title, "Terms of use");
    }
}
