use crate::model::article::{ArticleCategory, InsertArticle};
use crate::model::equipment::{EquipmentCondition, EquipmentKind, InsertEquipment};
use crate::model::property::{InsertProperty, PropertyKind, PropertyLocation};

pub fn property(title: &str) -> InsertProperty {
    InsertProperty {
        kind: PropertyKind::ConferenceHall,
        location: PropertyLocation::London,
        address: "1 Bishopsgate".into(),
        title: title.into(),
        rent_price: 1200,
        square: 300,
        description: None,
    }
}

pub fn equipment(title: &str) -> InsertEquipment {
    InsertEquipment {
        kind: EquipmentKind::SoundSystem,
        condition: EquipmentCondition::Good,
        title: title.into(),
        rent_price: 150,
        description: None,
    }
}

pub fn article(title: &str) -> InsertArticle {
    InsertArticle {
        category: ArticleCategory::Free,
        title: title.into(),
        content: "Hello there".into(),
        image: None,
    }
}
