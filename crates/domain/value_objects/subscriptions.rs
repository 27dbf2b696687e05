use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
};
use crate::domain::value_objects::month_year::{self, MonthYear};

/// Subscription as it travels over HTTP, in both directions.
///
/// `id` is assigned by the store: it is ignored when creating or updating and
/// left out of the output while still unassigned (zero).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    #[serde(default, skip_serializing_if = "is_unassigned")]
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: MonthYear,
    #[serde(
        default,
        deserialize_with = "month_year::optional::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<MonthYear>,
}

fn is_unassigned(id: &i32) -> bool {
    *id == 0
}

impl SubscriptionModel {
    pub fn to_insert_entity(&self) -> InsertSubscriptionEntity {
        InsertSubscriptionEntity {
            service_name: self.service_name.clone(),
            price: self.price,
            user_id: self.user_id,
            started_at: self.start_date.into(),
            ended_at: self.end_date.map(Into::into),
        }
    }

    pub fn to_update_entity(&self, updated_at: DateTime<Utc>) -> UpdateSubscriptionEntity {
        UpdateSubscriptionEntity {
            service_name: self.service_name.clone(),
            price: self.price,
            user_id: self.user_id,
            started_at: self.start_date.into(),
            ended_at: self.end_date.map(Into::into),
            updated_at,
        }
    }
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            service_name: value.service_name,
            price: value.price,
            user_id: value.user_id,
            start_date: MonthYear::from(value.started_at),
            end_date: value.ended_at.map(MonthYear::from),
        }
    }
}

/// `?user_id=` filter shared by the collection routes. Kept as raw text so a
/// malformed value can be reported through the error envelope.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubscriptionsQuery {
    pub user_id: Option<String>,
}

impl From<Vec<(String, String)>> for SubscriptionsQuery {
    /// A repeated `user_id` keeps its first value.
    fn from(pairs: Vec<(String, String)>) -> Self {
        let user_id = pairs
            .into_iter()
            .find(|(key, _)| key == "user_id")
            .map(|(_, value)| value);

        Self { user_id }
    }
}
