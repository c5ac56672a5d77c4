pub mod global_daily_analytics;
pub mod inquiry;
pub mod listing_view;
pub mod property;
pub mod property_daily_analytics;

pub use global_daily_analytics::Entity as GlobalDailyAnalyticsEntity;
pub use inquiry::Entity as InquiryEntity;
pub use listing_view::Entity as ListingViewEntity;
pub use property::Entity as PropertyEntity;
pub use property_daily_analytics::Entity as PropertyDailyAnalyticsEntity;
