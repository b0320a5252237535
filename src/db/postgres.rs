use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    types::Json,
    Executor, Pool, Postgres, Row, Transaction,
};
use uuid::Uuid;

use super::{RideMutation, Store};
use crate::entities::{Member, Ride, Status};
use crate::error::Error;

type Database = Postgres;

/// Rides and members kept as JSONB documents next to the columns they are queried by.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: Pool<Database>) -> Result<Self, Error> {
        pool.execute(
            "CREATE TABLE IF NOT EXISTS rides (
                id UUID PRIMARY KEY,
                status VARCHAR NOT NULL,
                requester_id UUID NOT NULL,
                driver_id UUID,
                pickup_location VARCHAR NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                data JSONB NOT NULL
            )",
        )
        .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS rides_requester_idx ON rides (requester_id)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS rides_driver_status_idx ON rides (driver_id, status)")
            .await?;
        pool.execute(
            "CREATE INDEX IF NOT EXISTS rides_pending_idx ON rides (pickup_location) WHERE status = 'requested'",
        )
        .await?;

        pool.execute(
            "CREATE TABLE IF NOT EXISTS members (
                id UUID PRIMARY KEY,
                email VARCHAR NOT NULL UNIQUE,
                role VARCHAR NOT NULL,
                data JSONB NOT NULL
            )",
        )
        .await?;

        tracing::info!("ride store schema ready");

        Ok(Self { pool })
    }
}

fn decode_rides(rows: Vec<PgRow>) -> Result<Vec<Ride>, Error> {
    rows.iter()
        .map(|row| -> Result<Ride, Error> {
            let Json(ride): Json<Ride> = row.try_get("data")?;
            Ok(ride)
        })
        .collect()
}

#[tracing::instrument(skip(tx))]
async fn fetch_ride_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Ride, Error> {
    let Json(ride): Json<Ride> = sqlx::query("SELECT data FROM rides WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::not_found_error(format!("no ride found with id {}", id)))?
        .try_get("data")?;

    Ok(ride)
}

#[tracing::instrument(skip(tx, ride), fields(ride_id = %ride.id))]
async fn write_ride(tx: &mut Transaction<'_, Database>, ride: &Ride) -> Result<(), Error> {
    sqlx::query("UPDATE rides SET status = $2, driver_id = $3, data = $4 WHERE id = $1")
        .bind(&ride.id)
        .bind(ride.status.name())
        .bind(&ride.driver_id)
        .bind(Json(ride))
        .execute(&mut *tx)
        .await?;

    Ok(())
}

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(skip(self, ride), fields(ride_id = %ride.id))]
    async fn insert_ride(&self, ride: &Ride) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute(
            sqlx::query(
                "INSERT INTO rides (id, status, requester_id, driver_id, pickup_location, created_at, data)
                VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&ride.id)
            .bind(ride.status.name())
            .bind(&ride.requester_id)
            .bind(&ride.driver_id)
            .bind(&ride.pickup_location)
            .bind(&ride.created_at)
            .bind(Json(ride)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, id: Uuid) -> Result<Option<Ride>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM rides WHERE id = $1").bind(&id))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(ride): Json<Ride> = result.try_get("data")?;
                Ok(Some(ride))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_rides_by_requester(&self, requester_id: Uuid) -> Result<Vec<Ride>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM rides WHERE requester_id = $1 ORDER BY created_at DESC",
                )
                .bind(&requester_id),
            )
            .await?;

        decode_rides(results)
    }

    #[tracing::instrument(skip(self))]
    async fn find_rides_by_driver(
        &self,
        driver_id: Uuid,
        status: Status,
    ) -> Result<Vec<Ride>, Error> {
        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM rides WHERE driver_id = $1 AND status = $2 ORDER BY created_at DESC",
                )
                .bind(&driver_id)
                .bind(status.name()),
            )
            .await?;

        decode_rides(results)
    }

    #[tracing::instrument(skip(self))]
    async fn find_pending_rides(
        &self,
        areas: &[String],
        driver_id: Uuid,
    ) -> Result<Vec<Ride>, Error> {
        let query = "
            SELECT
                data
            FROM
                rides
            WHERE
                status = 'requested'
                AND pickup_location = ANY($1)
                AND NOT (data->'rejectedBy' ? $2)
            ORDER BY
                created_at DESC
        ";

        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(
                sqlx::query(query)
                    .bind(areas.to_vec())
                    .bind(driver_id.to_string()),
            )
            .await?;

        decode_rides(results)
    }

    #[tracing::instrument(skip(self, mutation))]
    async fn update_ride(&self, id: Uuid, mutation: RideMutation) -> Result<Ride, Error> {
        let mut tx = self.pool.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        // dropping the transaction on error rolls it back
        mutation(&mut ride)?;

        write_ride(&mut tx, &ride).await?;

        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self, member), fields(member_id = %member.id))]
    async fn insert_member(&self, member: &Member) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(
                sqlx::query(
                    "INSERT INTO members (id, email, role, data) VALUES ($1, $2, $3, $4) ON CONFLICT DO NOTHING",
                )
                .bind(&member.id)
                .bind(&member.email)
                .bind(member.role.name())
                .bind(Json(member)),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::invalid_state_error(
                "member already exists or email is already registered",
            ));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_member(&self, id: Uuid) -> Result<Option<Member>, Error> {
        let mut conn = self.pool.acquire().await?;

        let maybe_result = conn
            .fetch_optional(sqlx::query("SELECT data FROM members WHERE id = $1").bind(&id))
            .await?;

        match maybe_result {
            Some(result) => {
                let Json(member): Json<Member> = result.try_get("data")?;
                Ok(Some(member))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_members(&self, ids: &[Uuid]) -> Result<Vec<Member>, Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.pool.acquire().await?;

        let results = conn
            .fetch_all(sqlx::query("SELECT data FROM members WHERE id = ANY($1)").bind(ids.to_vec()))
            .await?;

        results
            .iter()
            .map(|row| -> Result<Member, Error> {
                let Json(member): Json<Member> = row.try_get("data")?;
                Ok(member)
            })
            .collect()
    }
}
