use crate::database::UpdateScope;
use crate::error::{Error, ErrorCategory, Result};
use crate::model::article::{ArticleFilter, ArticleStatus, InsertArticle, UpdateArticle};
use crate::model::{
    Article, ArticleId, ArticleStat, ArticleView, MemberId, MemberStat, PageRequest, Paginated,
    Target, TargetGroup,
};
use crate::services::notifications::{notify_followers_of_create, notify_on_like, Created, Liked};
use crate::services::{likes, stats, util, views};
use crate::{Actor, App};

fn target(id: ArticleId) -> Target {
    Target::new(TargetGroup::Article, id.0)
}

async fn view_of(app: &App, actor: &Actor, article: Article) -> Result<ArticleView> {
    Ok(ArticleView {
        me_liked: likes::liked_by(app, actor, target(article.id)).await?,
        member: app.data.find_member(article.member_id).await?,
        article,
    })
}

async fn views_of(
    app: &App,
    actor: &Actor,
    page: Paginated<Article>,
) -> Result<Paginated<ArticleView>> {
    let mut list = Vec::with_capacity(page.list.len());
    for article in page.list {
        list.push(view_of(app, actor, article).await?);
    }
    Ok(Paginated {
        list,
        total: page.total,
    })
}

async fn apply_update(
    app: &App,
    id: ArticleId,
    form: UpdateArticle,
    scope: UpdateScope,
) -> Result<Article> {
    if let Some(title) = &form.title {
        util::check_title(title)?;
    }

    let article = app
        .data
        .update_article(id, &form, scope)
        .await?
        .ok_or_else(|| Error::new(ErrorCategory::UpdateFailed))?;

    if form.status == Some(ArticleStatus::Delete) {
        stats::adjust_member(app, article.member_id, MemberStat::Articles, -1).await?;
    }
    Ok(article)
}

/// Any active member may write on the board.
#[derive(Debug)]
pub struct CreateArticle {
    pub form: InsertArticle,
}

impl CreateArticle {
    #[tracing::instrument(skip_all, name = "services.articles.create")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Article> {
        let author = util::require_active_member(app, actor).await?;
        util::check_title(&self.form.title)?;

        let article = app
            .data
            .insert_article(author.id, &self.form)
            .await
            .map_err(|report| Error::from_report(ErrorCategory::CreateFailed, report))?;

        stats::adjust_member(app, author.id, MemberStat::Articles, 1).await?;
        notify_followers_of_create(app, &author, Created::Article(&article)).await;

        Ok(article)
    }
}

#[derive(Debug)]
pub struct GetArticle {
    pub id: ArticleId,
}

impl GetArticle {
    #[tracing::instrument(name = "services.articles.get")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<ArticleView> {
        let article = app
            .data
            .find_article(self.id)
            .await?
            .filter(|v| v.status == ArticleStatus::Active)
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))?;

        let first_view = match actor.member_id() {
            Some(viewer) => views::record_first_view(app, viewer, target(article.id))
                .await?
                .is_some(),
            None => false,
        };

        let article = if first_view {
            stats::adjust_article(app, article.id, ArticleStat::Views, 1).await?
        } else {
            article
        };
        view_of(app, actor, article).await
    }
}

#[derive(Debug)]
pub struct UpdateBoardArticle {
    pub id: ArticleId,
    pub form: UpdateArticle,
}

impl UpdateBoardArticle {
    #[tracing::instrument(skip_all, name = "services.articles.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Article> {
        let author = util::require_active_member(app, actor).await?;
        apply_update(app, self.id, self.form, UpdateScope::Owner(author.id)).await
    }
}

/// Public listing of active articles.
#[derive(Debug, Default)]
pub struct GetArticles {
    pub filter: ArticleFilter,
    pub page: PageRequest,
}

impl GetArticles {
    #[tracing::instrument(name = "services.articles.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<ArticleView>> {
        util::check_page(&self.page)?;
        let filter = ArticleFilter {
            status: Some(ArticleStatus::Active),
            ..self.filter
        };

        let page = app.data.list_articles(&filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug)]
pub struct LikeArticle {
    pub id: ArticleId,
}

impl LikeArticle {
    #[tracing::instrument(name = "services.articles.like")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Article> {
        let liker = util::require_active_member(app, actor).await?;
        let article = app
            .data
            .find_article(self.id)
            .await?
            .filter(|v| v.status == ArticleStatus::Active)
            .ok_or_else(|| Error::new(ErrorCategory::NotFound))?;

        let modifier = likes::toggle(app, liker.id, target(article.id)).await?;
        let article = stats::adjust_article(app, article.id, ArticleStat::Likes, modifier).await?;

        notify_on_like(app, &liker, Liked::Article(&article), modifier).await;
        Ok(article)
    }
}

#[derive(Debug, Default)]
pub struct GetAllArticlesByAdmin {
    pub filter: ArticleFilter,
    pub page: PageRequest,
}

impl GetAllArticlesByAdmin {
    #[tracing::instrument(name = "services.articles.admin.list")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Paginated<ArticleView>> {
        util::require_admin(app, actor).await?;
        util::check_page(&self.page)?;

        let page = app.data.list_articles(&self.filter, &self.page).await?;
        views_of(app, actor, page).await
    }
}

#[derive(Debug)]
pub struct UpdateArticleByAdmin {
    pub id: ArticleId,
    pub form: UpdateArticle,
}

impl UpdateArticleByAdmin {
    #[tracing::instrument(skip_all, name = "services.articles.admin.update", fields(id = %self.id))]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Article> {
        util::require_admin(app, actor).await?;
        apply_update(app, self.id, self.form, UpdateScope::Admin).await
    }
}

#[derive(Debug)]
pub struct RemoveArticleByAdmin {
    pub id: ArticleId,
}

impl RemoveArticleByAdmin {
    #[tracing::instrument(name = "services.articles.admin.remove")]
    pub async fn perform(self, app: &App, actor: &Actor) -> Result<Article> {
        util::require_admin(app, actor).await?;
        app.data
            .remove_article(self.id)
            .await?
            .ok_or_else(|| Error::new(ErrorCategory::RemoveFailed))
    }
}

pub(crate) async fn owner_of(app: &App, id: ArticleId) -> Result<Option<MemberId>> {
    Ok(app.data.find_article(id).await?.map(|v| v.member_id))
}
