use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::{MemberId, PropertyId};
use super::member::Member;
use super::page::{Sort, SortKey};
use super::{contains_ignore_case, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "property_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    WeddingVenue,
    ConferenceHall,
    BanquetHall,
    OutdoorGarden,
    ExhibitionSpace,
    ConcertHall,
    Theater,
    ResortVenue,
    SeminarRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "property_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Active,
    Rent,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "property_location", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyLocation {
    London,
    NorthEast,
    NorthWest,
    Yorkshire,
    EastMidlands,
    WestMidlands,
    SouthEast,
    EastOfEngland,
    SouthWest,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, FromRow)]
pub struct Property {
    pub id: PropertyId,
    pub member_id: MemberId,
    pub kind: PropertyKind,
    pub status: PropertyStatus,
    pub location: PropertyLocation,
    pub address: String,
    pub title: String,
    pub rent_price: i64,
    pub square: i64,
    pub description: Option<String>,

    pub views: i64,
    pub likes: i64,
    pub comments: i64,
    pub rank: i64,

    pub rented_at: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

impl Property {
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
pub enum PropertyStat {
    Views,
    Likes,
    Comments,
    Rank,
}

impl PropertyStat {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
            Self::Comments => "comments",
            Self::Rank => "rank",
        }
    }

    pub(crate) fn slot(self, property: &mut Property) -> &mut i64 {
        match self {
            Self::Views => &mut property.views,
            Self::Likes => &mut property.likes,
            Self::Comments => &mut property.comments,
            Self::Rank => &mut property.rank,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertProperty {
    pub kind: PropertyKind,
    pub location: PropertyLocation,
    pub address: String,
    pub title: String,
    pub rent_price: i64,
    pub square: i64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProperty {
    pub kind: Option<PropertyKind>,
    pub status: Option<PropertyStatus>,
    pub location: Option<PropertyLocation>,
    pub address: Option<String>,
    pub title: Option<String>,
    pub rent_price: Option<i64>,
    pub square: Option<i64>,
    pub description: Option<String>,

    /// Filled by the service when the status moves to `RENT`.
    #[serde(skip)]
    pub rented_at: Option<NaiveDateTime>,
    /// Filled by the service when the status moves to `DELETE`.
    #[serde(skip)]
    pub deleted_at: Option<NaiveDateTime>,
}

impl UpdateProperty {
    pub(crate) fn apply(&self, property: &mut Property) {
        if let Some(kind) = self.kind {
            property.kind = kind;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        if let Some(location) = self.location {
            property.location = location;
        }
        if let Some(address) = &self.address {
            property.address.clone_from(address);
        }
        if let Some(title) = &self.title {
            property.title.clone_from(title);
        }
        if let Some(rent_price) = self.rent_price {
            property.rent_price = rent_price;
        }
        if let Some(square) = self.square {
            property.square = square;
        }
        if let Some(description) = &self.description {
            property.description = Some(description.clone());
        }
        if self.rented_at.is_some() {
            property.rented_at = self.rented_at;
        }
        if self.deleted_at.is_some() {
            property.deleted_at = self.deleted_at;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilter {
    pub member_id: Option<MemberId>,
    /// Exact status; when absent, deleted properties are excluded.
    pub status: Option<PropertyStatus>,
    #[serde(default)]
    pub locations: Vec<PropertyLocation>,
    #[serde(default)]
    pub kinds: Vec<PropertyKind>,
    pub prices: Option<Range<i64>>,
    pub squares: Option<Range<i64>>,
    pub period: Option<Range<NaiveDateTime>>,
    pub text: Option<String>,
}

impl PropertyFilter {
    pub(crate) fn matches(&self, property: &Property) -> bool {
        let status = match self.status {
            Some(status) => property.status == status,
            None => property.status != PropertyStatus::Delete,
        };

        status
            && self.member_id.map_or(true, |v| property.member_id == v)
            && (self.locations.is_empty() || self.locations.contains(&property.location))
            && (self.kinds.is_empty() || self.kinds.contains(&property.kind))
            && self
                .prices
                .as_ref()
                .map_or(true, |r| r.contains(&property.rent_price))
            && self
                .squares
                .as_ref()
                .map_or(true, |r| r.contains(&property.square))
            && self
                .period
                .as_ref()
                .map_or(true, |r| r.contains(&property.created))
            && self
                .text
                .as_deref()
                .map_or(true, |text| contains_ignore_case(&property.title, text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub me_liked: bool,
    pub member: Option<Member>,
}
