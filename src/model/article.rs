use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::contains_ignore_case;
use super::id::{ArticleId, MemberId};
use super::member::Member;
use super::page::{Sort, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "article_category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleCategory {
    Free,
    Recommend,
    News,
    Humor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "article_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleStatus {
    Active,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Article {
    pub id: ArticleId,
    pub member_id: MemberId,
    pub category: ArticleCategory,
    pub status: ArticleStatus,
    pub title: String,
    pub content: String,
    pub image: Option<String>,

    pub views: i64,
    pub likes: i64,
    pub comments: i64,

    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

impl Article {
    pub(crate) fn sort_key(&self, sort: Sort) -> SortKey {
        let value = match sort {
            Sort::Views => self.views,
            Sort::Likes => self.likes,
            Sort::Updated => return (0, self.updated, self.id.0),
            Sort::Created | Sort::Rank | Sort::RentPrice => 0,
        };
        (value, self.created, self.id.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStat {
    Views,
    Likes,
    Comments,
}

impl ArticleStat {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
            Self::Comments => "comments",
        }
    }

    pub(crate) fn slot(self, article: &mut Article) -> &mut i64 {
        match self {
            Self::Views => &mut article.views,
            Self::Likes => &mut article.likes,
            Self::Comments => &mut article.comments,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertArticle {
    pub category: ArticleCategory,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticle {
    pub status: Option<ArticleStatus>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl UpdateArticle {
    pub(crate) fn apply(&self, article: &mut Article) {
        if let Some(status) = self.status {
            article.status = status;
        }
        if let Some(title) = &self.title {
            article.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            article.content.clone_from(content);
        }
        if let Some(image) = &self.image {
            article.image = Some(image.clone());
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFilter {
    pub member_id: Option<MemberId>,
    pub category: Option<ArticleCategory>,
    /// Exact status; when absent, only active articles match.
    pub status: Option<ArticleStatus>,
    pub text: Option<String>,
}

impl ArticleFilter {
    pub(crate) fn matches(&self, article: &Article) -> bool {
        article.status == self.status.unwrap_or(ArticleStatus::Active)
            && self.member_id.map_or(true, |v| article.member_id == v)
            && self.category.map_or(true, |v| article.category == v)
            && self
                .text
                .as_deref()
                .map_or(true, |text| contains_ignore_case(&article.title, text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    pub me_liked: bool,
    pub member: Option<Member>,
}
