use std::str::FromStr;

use tracing::warn;

use crate::storage::models::{Inquiry, NewViewEvent, Property, PropertyRef, PropertyStatus};
use migration::entities::{inquiry, listing_view, property};

/// 将 Sea-ORM Model 转换为 Property
///
/// 未知状态值按 active 处理并记录警告。
pub fn model_to_property(model: property::Model) -> Property {
    let status = PropertyStatus::from_str(&model.status).unwrap_or_else(|_| {
        warn!(
            "Property {} has unknown status '{}', treating as active",
            model.id, model.status
        );
        PropertyStatus::Active
    });

    Property {
        id: model.id,
        agent_id: model.agent_id,
        title: model.title,
        price: model.price,
        address: model.address,
        bedrooms: model.bedrooms,
        bathrooms: model.bathrooms,
        description: model.description,
        status,
        image_url: model.image_url,
        date_listed: model.date_listed,
        sqft: model.sqft,
        property_type: model.property_type,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 Property 转换为 ActiveModel（用于插入）
pub fn property_to_active_model(p: &Property) -> property::ActiveModel {
    use sea_orm::ActiveValue::Set;

    property::ActiveModel {
        id: Set(p.id.clone()),
        agent_id: Set(p.agent_id.clone()),
        title: Set(p.title.clone()),
        price: Set(p.price),
        address: Set(p.address.clone()),
        bedrooms: Set(p.bedrooms),
        bathrooms: Set(p.bathrooms),
        description: Set(p.description.clone()),
        status: Set(p.status.as_ref().to_string()),
        image_url: Set(p.image_url.clone()),
        date_listed: Set(p.date_listed),
        sqft: Set(p.sqft),
        property_type: Set(p.property_type.clone()),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    }
}

pub fn model_to_property_ref(model: &property::Model) -> PropertyRef {
    PropertyRef {
        id: model.id.clone(),
        title: model.title.clone(),
        address: model.address.clone(),
        price: model.price,
        agent_id: model.agent_id.clone(),
    }
}

pub fn model_to_inquiry(model: inquiry::Model) -> Inquiry {
    Inquiry {
        id: model.id,
        property_id: model.property_id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        message: model.message,
        is_read: model.is_read,
        date_submitted: model.date_submitted,
    }
}

pub fn inquiry_to_active_model(i: &Inquiry) -> inquiry::ActiveModel {
    use sea_orm::ActiveValue::Set;

    inquiry::ActiveModel {
        id: Set(i.id.clone()),
        property_id: Set(i.property_id.clone()),
        name: Set(i.name.clone()),
        email: Set(i.email.clone()),
        phone: Set(i.phone.clone()),
        message: Set(i.message.clone()),
        is_read: Set(i.is_read),
        date_submitted: Set(i.date_submitted),
    }
}

/// 浏览事件 → ActiveModel，view_day 取 viewed_at 的 UTC 日期
pub fn view_to_active_model(event: &NewViewEvent) -> listing_view::ActiveModel {
    use sea_orm::ActiveValue::{NotSet, Set};

    listing_view::ActiveModel {
        id: NotSet,
        property_id: Set(event.property_id.clone()),
        session_id: Set(event.session_id.clone()),
        user_agent: Set(event.user_agent.clone()),
        ip_address: Set(event.ip_address.clone()),
        referrer: Set(event.referrer.clone()),
        viewed_at: Set(event.viewed_at),
        view_day: Set(event.viewed_at.date_naive()),
    }
}
