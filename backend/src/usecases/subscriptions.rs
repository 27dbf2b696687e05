use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};
use usersubs_core::domain::{
    repositories::subscriptions::SubscriptionRepository,
    value_objects::subscriptions::SubscriptionModel,
};
use uuid::Uuid;

pub struct SubscriptionUseCase<T>
where
    T: SubscriptionRepository + Send + Sync,
{
    subscription_repository: Arc<T>,
}

impl<T> SubscriptionUseCase<T>
where
    T: SubscriptionRepository + Send + Sync,
{
    pub fn new(subscription_repository: Arc<T>) -> Self {
        Self {
            subscription_repository,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<SubscriptionModel>> {
        let subscriptions = self
            .subscription_repository
            .list_all()
            .await
            .inspect_err(|err| {
                error!(db_error = ?err, "subscriptions: failed to list subscriptions");
            })?;

        info!(
            count = subscriptions.len(),
            "subscriptions: all subscriptions loaded"
        );
        Ok(subscriptions
            .into_iter()
            .map(SubscriptionModel::from)
            .collect())
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SubscriptionModel>> {
        let subscriptions = self
            .subscription_repository
            .list_by_user(user_id)
            .await
            .inspect_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to list user subscriptions");
            })?;

        info!(
            %user_id,
            count = subscriptions.len(),
            "subscriptions: user subscriptions loaded"
        );
        Ok(subscriptions
            .into_iter()
            .map(SubscriptionModel::from)
            .collect())
    }

    pub async fn get(&self, subscription_id: i32) -> Result<SubscriptionModel> {
        let subscription = self
            .subscription_repository
            .find_by_id(subscription_id)
            .await
            .inspect_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to load subscription");
            })?;

        Ok(SubscriptionModel::from(subscription))
    }

    /// Stores `subscription` and echoes it back with the id assigned by the store.
    pub async fn create(&self, mut subscription: SubscriptionModel) -> Result<SubscriptionModel> {
        let id = self
            .subscription_repository
            .insert(subscription.to_insert_entity())
            .await
            .inspect_err(|err| {
                error!(
                    user_id = %subscription.user_id,
                    db_error = ?err,
                    "subscriptions: failed to insert subscription"
                );
            })?;

        info!(subscription_id = id, user_id = %subscription.user_id, "subscriptions: created");
        subscription.id = id;
        Ok(subscription)
    }

    /// Overwrites every field of the row and refreshes its `updated_at`.
    pub async fn update(
        &self,
        subscription_id: i32,
        mut subscription: SubscriptionModel,
    ) -> Result<SubscriptionModel> {
        let id = self
            .subscription_repository
            .update(subscription_id, subscription.to_update_entity(Utc::now()))
            .await
            .inspect_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to update subscription");
            })?;

        info!(subscription_id = id, "subscriptions: updated");
        subscription.id = id;
        Ok(subscription)
    }

    pub async fn delete(&self, subscription_id: i32) -> Result<i32> {
        let id = self
            .subscription_repository
            .delete(subscription_id)
            .await
            .inspect_err(|err| {
                error!(subscription_id, db_error = ?err, "subscriptions: failed to delete subscription");
            })?;

        info!(subscription_id = id, "subscriptions: deleted");
        Ok(id)
    }

    pub async fn delete_all_by_user(&self, user_id: Uuid) -> Result<Vec<i32>> {
        let ids = self
            .subscription_repository
            .delete_all_by_user(user_id)
            .await
            .inspect_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to delete user subscriptions");
            })?;

        info!(%user_id, count = ids.len(), "subscriptions: user subscriptions deleted");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::{Duration, NaiveDate};
    use mockall::predicate::eq;
    use usersubs_core::domain::{
        entities::subscriptions::SubscriptionEntity,
        repositories::subscriptions::MockSubscriptionRepository,
        value_objects::month_year::MonthYear,
    };

    fn sample_entity(id: i32, user_id: Uuid) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id,
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id,
            started_at: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_model(user_id: Uuid) -> SubscriptionModel {
        SubscriptionModel {
            id: 0,
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id,
            start_date: MonthYear::new(2025, 7).unwrap(),
            end_date: MonthYear::new(2026, 1),
        }
    }

    #[tokio::test]
    async fn list_by_user_maps_rows_to_models() {
        let user_id = Uuid::new_v4();
        let mut repository = MockSubscriptionRepository::new();

        let rows = vec![sample_entity(1, user_id), sample_entity(2, user_id)];
        repository
            .expect_list_by_user()
            .with(eq(user_id))
            .returning(move |_| {
                let rows = rows.clone();
                Box::pin(async move { Ok(rows) })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(repository));
        let subscriptions = usecase.list_by_user(user_id).await.unwrap();

        assert_eq!(subscriptions.len(), 2);
        assert!(subscriptions.iter().all(|sub| sub.user_id == user_id));
        assert_eq!(subscriptions[0].start_date.to_string(), "07-2025");
        assert_eq!(subscriptions[1].id, 2);
    }

    #[tokio::test]
    async fn list_all_returns_empty_vec_when_store_is_empty() {
        let mut repository = MockSubscriptionRepository::new();
        repository
            .expect_list_all()
            .returning(|| Box::pin(async { Ok(Vec::new()) }));

        let usecase = SubscriptionUseCase::new(Arc::new(repository));

        assert!(usecase.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_returns_model_with_assigned_id() {
        let user_id = Uuid::new_v4();
        let mut repository = MockSubscriptionRepository::new();

        repository
            .expect_insert()
            .withf(move |entity| {
                entity.user_id == user_id
                    && entity.started_at == NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
                    && entity.ended_at == NaiveDate::from_ymd_opt(2026, 1, 1)
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok(42) }));

        let usecase = SubscriptionUseCase::new(Arc::new(repository));
        let created = usecase.create(sample_model(user_id)).await.unwrap();

        assert_eq!(created.id, 42);
        assert_eq!(created.service_name, "Yandex Plus");
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_and_uses_returned_id() {
        let user_id = Uuid::new_v4();
        let mut repository = MockSubscriptionRepository::new();
        let before = Utc::now();

        repository
            .expect_update()
            .withf(move |subscription_id, entity| {
                *subscription_id == 5
                    && entity.updated_at >= before
                    && entity.updated_at <= Utc::now() + Duration::seconds(1)
            })
            .times(1)
            .returning(|subscription_id, _| Box::pin(async move { Ok(subscription_id) }));

        let usecase = SubscriptionUseCase::new(Arc::new(repository));
        let updated = usecase.update(5, sample_model(user_id)).await.unwrap();

        assert_eq!(updated.id, 5);
        assert_eq!(updated.end_date, MonthYear::new(2026, 1));
    }

    #[tokio::test]
    async fn update_of_missing_row_surfaces_store_error() {
        let mut repository = MockSubscriptionRepository::new();
        repository
            .expect_update()
            .returning(|_, _| Box::pin(async { Err(anyhow!("Record not found")) }));

        let usecase = SubscriptionUseCase::new(Arc::new(repository));
        let err = usecase
            .update(999, sample_model(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Record not found"));
    }

    #[tokio::test]
    async fn delete_all_by_user_returns_deleted_ids() {
        let user_id = Uuid::new_v4();
        let mut repository = MockSubscriptionRepository::new();
        repository
            .expect_delete_all_by_user()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(vec![3, 4, 9]) }));

        let usecase = SubscriptionUseCase::new(Arc::new(repository));

        assert_eq!(usecase.delete_all_by_user(user_id).await.unwrap(), vec![3, 4, 9]);
    }

    #[tokio::test]
    async fn get_maps_single_row() {
        let user_id = Uuid::new_v4();
        let mut repository = MockSubscriptionRepository::new();
        let row = sample_entity(11, user_id);
        repository
            .expect_find_by_id()
            .with(eq(11))
            .returning(move |_| {
                let row = row.clone();
                Box::pin(async move { Ok(row) })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(repository));
        let subscription = usecase.get(11).await.unwrap();

        assert_eq!(subscription.id, 11);
        assert_eq!(subscription.end_date, None);
    }
}
