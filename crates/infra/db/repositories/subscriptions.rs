use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{
            InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
        },
        repositories::subscriptions::SubscriptionRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn list_all(&self) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .order(subscriptions::id.asc())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order(subscriptions::id.asc())
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, subscription_id: i32) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .find(subscription_id)
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .with_context(|| format!("subscription {subscription_id} could not be loaded"))?;

        Ok(result)
    }

    async fn insert(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(subscriptions::id)
            .get_result::<i32>(&mut conn)?;

        debug!(subscription_id = result, "subscriptions: row inserted");
        Ok(result)
    }

    async fn update(
        &self,
        subscription_id: i32,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(subscriptions::table.find(subscription_id))
            .set(&update_subscription_entity)
            .returning(subscriptions::id)
            .get_result::<i32>(&mut conn)
            .with_context(|| format!("subscription {subscription_id} could not be updated"))?;

        Ok(result)
    }

    async fn delete(&self, subscription_id: i32) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = delete(subscriptions::table.find(subscription_id))
            .returning(subscriptions::id)
            .get_result::<i32>(&mut conn)
            .with_context(|| format!("subscription {subscription_id} could not be deleted"))?;

        Ok(result)
    }

    async fn delete_all_by_user(&self, user_id: Uuid) -> Result<Vec<i32>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = delete(subscriptions::table.filter(subscriptions::user_id.eq(user_id)))
            .returning(subscriptions::id)
            .get_results::<i32>(&mut conn)?;

        debug!(%user_id, deleted = results.len(), "subscriptions: rows deleted for user");
        Ok(results)
    }
}
