//! Builders shared by the unit tests.

use crate::models::{Lead, NewLead, PropertyType};

pub(crate) fn new_lead(owner: &str, category: &str, area: &str) -> NewLead {
    NewLead {
        category: category.into(),
        property_type: PropertyType::Sale,
        project_name: String::new(),
        address: "12 Main Road".into(),
        area: area.into(),
        phone_number: "9876543210".into(),
        owner_name: owner.into(),
        price: "5000000".into(),
        cheque: String::new(),
        size: "250 sq yd".into(),
        comments: "first visit".into(),
    }
}

pub(crate) fn lead(id: i64, owner: &str, category: &str, area: &str) -> Lead {
    let NewLead {
        category,
        property_type,
        project_name,
        address,
        area,
        phone_number,
        owner_name,
        price,
        cheque,
        size,
        comments,
    } = new_lead(owner, category, area);
    Lead {
        id,
        category,
        property_type,
        project_name,
        address,
        area,
        phone_number,
        owner_name,
        price,
        cheque,
        size,
        comments,
    }
}
