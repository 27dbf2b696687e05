use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::subscriptions::{
    InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
};

/// Every operation runs as a single statement. A missing row is reported as
/// an error, the same as any other store failure.
#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn list_all(&self) -> Result<Vec<SubscriptionEntity>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>>;

    async fn find_by_id(&self, subscription_id: i32) -> Result<SubscriptionEntity>;

    async fn insert(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<i32>;

    async fn update(
        &self,
        subscription_id: i32,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> Result<i32>;

    async fn delete(&self, subscription_id: i32) -> Result<i32>;

    async fn delete_all_by_user(&self, user_id: Uuid) -> Result<Vec<i32>>;
}
