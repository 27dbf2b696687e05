use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{BytesRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use tracing::info;
use usersubs_core::{
    domain::{
        repositories::subscriptions::SubscriptionRepository,
        value_objects::subscriptions::{SubscriptionModel, SubscriptionsQuery},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::subscriptions::SubscriptionPostgres,
    },
};
use uuid::Uuid;

use crate::{
    axum_http::{envelope, error_responses::AppError},
    usecases::subscriptions::SubscriptionUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscriptions_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let subscriptions_usecase = SubscriptionUseCase::new(Arc::new(subscriptions_repository));

    routes_with_usecase(Arc::new(subscriptions_usecase))
}

pub fn routes_with_usecase<T>(subscriptions_usecase: Arc<SubscriptionUseCase<T>>) -> Router
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/subs", get(list::<T>).delete(delete_by_user::<T>))
        .route("/sub", post(create::<T>))
        .route(
            "/sub/:id",
            get(get_one::<T>).put(update::<T>).delete(delete_one::<T>),
        )
        .with_state(subscriptions_usecase)
}

pub async fn list<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let query = decode_query(query)?;
    info!(user_id = ?query.user_id, "GET /api/subs - Receive request");

    let subscriptions = match parse_user_id(query.user_id.as_deref())? {
        Some(user_id) => subscriptions_usecase.list_by_user(user_id).await,
        None => subscriptions_usecase.list_all().await,
    }
    .map_err(AppError::Query)?;

    envelope::send_success(&subscriptions, StatusCode::OK).map_err(AppError::Encode)
}

pub async fn get_one<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let Path(raw_id) = path.map_err(AppError::InvalidPath)?;
    info!(id = %raw_id, "GET /api/sub/{{id}} - Receive request");
    let subscription_id = parse_path_id(&raw_id)?;

    let subscription = subscriptions_usecase
        .get(subscription_id)
        .await
        .map_err(AppError::Query)?;

    envelope::send_success(&subscription, StatusCode::OK).map_err(AppError::Encode)
}

pub async fn create<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    info!("POST /api/sub - Receive request");
    let subscription = decode_body(body)?;

    let created = subscriptions_usecase
        .create(subscription)
        .await
        .map_err(AppError::Query)?;

    envelope::send_success(&created, StatusCode::OK).map_err(AppError::Encode)
}

pub async fn update<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let Path(raw_id) = path.map_err(AppError::InvalidPath)?;
    info!(id = %raw_id, "PUT /api/sub/{{id}} - Receive request");
    let subscription_id = parse_path_id(&raw_id)?;
    let subscription = decode_body(body)?;

    let updated = subscriptions_usecase
        .update(subscription_id, subscription)
        .await
        .map_err(AppError::Query)?;

    envelope::send_success(&updated, StatusCode::OK).map_err(AppError::Encode)
}

pub async fn delete_one<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let Path(raw_id) = path.map_err(AppError::InvalidPath)?;
    info!(id = %raw_id, "DELETE /api/sub/{{id}} - Receive request");
    let subscription_id = parse_path_id(&raw_id)?;

    let deleted_id = subscriptions_usecase
        .delete(subscription_id)
        .await
        .map_err(AppError::Query)?;

    envelope::send_success(deleted_id, StatusCode::OK).map_err(AppError::Encode)
}

pub async fn delete_by_user<T>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<T>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, AppError>
where
    T: SubscriptionRepository + Send + Sync + 'static,
{
    let query = decode_query(query)?;
    info!(user_id = ?query.user_id, "DELETE /api/subs - Receive request");
    let user_id = parse_user_id(query.user_id.as_deref())?.ok_or(AppError::MissingUserId)?;

    let deleted_ids = subscriptions_usecase
        .delete_all_by_user(user_id)
        .await
        .map_err(AppError::Query)?;

    envelope::send_success(&deleted_ids, StatusCode::OK).map_err(AppError::Encode)
}

/// An empty `user_id` counts as absent.
fn parse_user_id(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    raw.filter(|raw| !raw.is_empty())
        .map(Uuid::parse_str)
        .transpose()
        .map_err(AppError::InvalidUserId)
}

fn parse_path_id(raw: &str) -> Result<i32, AppError> {
    raw.parse().map_err(AppError::InvalidPathId)
}

fn decode_query(
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<SubscriptionsQuery, AppError> {
    let Query(pairs) = query.map_err(AppError::InvalidQuery)?;
    Ok(SubscriptionsQuery::from(pairs))
}

fn decode_body(body: Result<Bytes, BytesRejection>) -> Result<SubscriptionModel, AppError> {
    let body = body.map_err(AppError::UnreadableBody)?;
    serde_json::from_slice(&body).map_err(AppError::InvalidBody)
}
