use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::{EquipmentId, MemberId};
use super::member::Member;
use super::page::{Sort, SortKey};
use super::{contains_ignore_case, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "equipment_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentKind {
    SoundSystem,
    Lighting,
    Stage,
    AudioVisual,
    Projector,
    Microphone,
    DjSetup,
    VideoCamera,
    Furniture,
    Decoration,
    Generator,
    Tent,
    HeatingSystem,
    CoolingSystem,
    FoodServing,
    DanceFloor,
    PhotoBooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "equipment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Active,
    Rent,
    Maintenance,
    Retired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "equipment_condition", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCondition {
    New,
    Good,
    Fair,
    Damaged,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Equipment {
    pub id: EquipmentId,
    pub member_id: MemberId,
    pub kind: EquipmentKind,
    pub status: EquipmentStatus,
    pub condition: EquipmentCondition,
    pub title: String,
    pub rent_price: i64,
    pub description: Option<String>,

    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub rank: i64,

    pub rented_at: Option<NaiveDateTime>,
    pub retired_at: Option<NaiveDateTime>,
    pub maintained_at: Option<NaiveDateTime>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

impl Equipment {
    pub(crate) fn sort_key(&self, sort: Sort) -> SortKey {
        let value = match sort {
            Sort::Views => self.views,
            Sort::Likes => self.likes,
            Sort::Rank => self.rank,
            Sort::RentPrice => self.rent_price,
            Sort::Updated => return (0, self.updated, self.id.0),
            Sort::Created => 0,
        };
        (value, self.created, self.id.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentStat {
    Views,
    Likes,
    Comments,
    Rank,
}

impl EquipmentStat {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
            Self::Comments => "comments",
            Self::Rank => "rank",
        }
    }

    pub(crate) fn slot(self, equipment: &mut Equipment) -> &mut i64 {
        match self {
            Self::Views => &mut equipment.views,
            Self::Likes => &mut equipment.likes,
            Self::Comments => &mut equipment.comments,
            Self::Rank => &mut equipment.rank,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertEquipment {
    pub kind: EquipmentKind,
    pub condition: EquipmentCondition,
    pub title: String,
    pub rent_price: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipment {
    pub kind: Option<EquipmentKind>,
    pub status: Option<EquipmentStatus>,
    pub condition: Option<EquipmentCondition>,
    pub title: Option<String>,
    pub rent_price: Option<i64>,
    pub description: Option<String>,

    #[serde(skip)]
    pub rented_at: Option<NaiveDateTime>,
    #[serde(skip)]
    pub retired_at: Option<NaiveDateTime>,
    #[serde(skip)]
    pub maintained_at: Option<NaiveDateTime>,
}

impl UpdateEquipment {
    pub(crate) fn apply(&self, equipment: &mut Equipment) {
        if let Some(kind) = self.kind {
            equipment.kind = kind;
        }
        if let Some(status) = self.status {
            equipment.status = status;
        }
        if let Some(condition) = self.condition {
            equipment.condition = condition;
        }
        if let Some(title) = &self.title {
            equipment.title.clone_from(title);
        }
        if let Some(rent_price) = self.rent_price {
            equipment.rent_price = rent_price;
        }
        if let Some(description) = &self.description {
            equipment.description = Some(description.clone());
        }
        if self.rented_at.is_some() {
            equipment.rented_at = self.rented_at;
        }
        if self.retired_at.is_some() {
            equipment.retired_at = self.retired_at;
        }
        if self.maintained_at.is_some() {
            equipment.maintained_at = self.maintained_at;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentFilter {
    pub member_id: Option<MemberId>,
    /// Exact status; when absent, retired equipment is excluded.
    pub status: Option<EquipmentStatus>,
    #[serde(default)]
    pub kinds: Vec<EquipmentKind>,
    pub prices: Option<Range<i64>>,
    pub period: Option<Range<NaiveDateTime>>,
    pub text: Option<String>,
}

impl EquipmentFilter {
    pub(crate) fn matches(&self, equipment: &Equipment) -> bool {
        let status = match self.status {
            Some(status) => equipment.status == status,
            None => equipment.status != EquipmentStatus::Retired,
        };

        status
            && self.member_id.map_or(true, |v| equipment.member_id == v)
            && (self.kinds.is_empty() || self.kinds.contains(&equipment.kind))
            && self
                .prices
                .as_ref()
                .map_or(true, |r| r.contains(&equipment.rent_price))
            && self
                .period
                .as_ref()
                .map_or(true, |r| r.contains(&equipment.created))
            && self
                .text
                .as_deref()
                .map_or(true, |text| contains_ignore_case(&equipment.title, text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentView {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub me_liked: bool,
    pub member: Option<Member>,
}
