//! PostgreSQL database implementation
//!
//! Production backend for multi-instance deployments, implementing the same
//! interface as the SQLite version. Booking admission takes a
//! transaction-scoped advisory lock keyed on `(trainer_id, booking_date)` so
//! concurrent creators for the same trainer and date serialize; enrollment is
//! a single conditional `UPDATE`, atomic per row.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{BookingInsert, DatabaseProvider, EnrollOutcome};
use crate::models::{
    AvailabilitySlot, Booking, BookingFilter, BookingStatus, GroupSession, SessionStatus,
};
use crate::pagination::PageParams;

/// PostgreSQL database implementation
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    fn filter_binds(filter: &BookingFilter) -> (Option<Uuid>, Option<Uuid>) {
        match filter {
            BookingFilter::ByClient(id) => (Some(*id), None),
            BookingFilter::ByTrainer(id) => (None, Some(*id)),
            BookingFilter::All => (None, None),
        }
    }
}

fn row_to_availability(row: &PgRow) -> Result<AvailabilitySlot> {
    Ok(AvailabilitySlot {
        id: row.try_get("id")?,
        trainer_id: row.try_get("trainer_id")?,
        gym_id: row.try_get("gym_id")?,
        day_of_week: i16::try_from(row.try_get::<i32, _>("day_of_week")?)?,
        start_time: row.try_get::<NaiveTime, _>("start_time")?,
        end_time: row.try_get::<NaiveTime, _>("end_time")?,
        is_recurring: row.try_get("is_recurring")?,
        specific_date: row.try_get::<Option<NaiveDate>, _>("specific_date")?,
        max_slots: row.try_get("max_slots")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn row_to_booking(row: &PgRow) -> Result<Booking> {
    Ok(Booking {
        id: row.try_get("id")?,
        booking_type: row.try_get::<String, _>("booking_type")?.parse()?,
        trainer_id: row.try_get("trainer_id")?,
        client_id: row.try_get("client_id")?,
        gym_id: row.try_get("gym_id")?,
        booking_date: row.try_get::<NaiveDate, _>("booking_date")?,
        start_time: row.try_get::<NaiveTime, _>("start_time")?,
        end_time: row.try_get::<NaiveTime, _>("end_time")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        notes: row.try_get("notes")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        cancelled_at: row.try_get::<Option<DateTime<Utc>>, _>("cancelled_at")?,
        cancellation_reason: row.try_get("cancellation_reason")?,
    })
}

fn row_to_session(row: &PgRow) -> Result<GroupSession> {
    Ok(GroupSession {
        id: row.try_get("id")?,
        trainer_id: row.try_get("trainer_id")?,
        session_name: row.try_get("session_name")?,
        description: row.try_get("description")?,
        max_participants: row.try_get("max_participants")?,
        current_participants: row.try_get("current_participants")?,
        gym_id: row.try_get("gym_id")?,
        session_date: row.try_get::<NaiveDate, _>("session_date")?,
        start_time: row.try_get::<NaiveTime, _>("start_time")?,
        end_time: row.try_get::<NaiveTime, _>("end_time")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        enrolled_clients: row.try_get::<Vec<Uuid>, _>("enrolled_clients")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl DatabaseProvider for PostgresDatabase {
    async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS availability (
                id UUID PRIMARY KEY,
                trainer_id UUID NOT NULL,
                gym_id UUID,
                day_of_week INTEGER NOT NULL CHECK (day_of_week >= 0 AND day_of_week <= 6),
                start_time TIME NOT NULL,
                end_time TIME NOT NULL,
                is_recurring BOOLEAN NOT NULL DEFAULT true,
                specific_date DATE,
                max_slots INTEGER NOT NULL DEFAULT 1,
                is_active BOOLEAN NOT NULL DEFAULT true,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_availability_trainer ON availability(trainer_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bookings (
                id UUID PRIMARY KEY,
                booking_type VARCHAR(20) NOT NULL CHECK (booking_type IN ('one_on_one', 'group_class')),
                trainer_id UUID NOT NULL,
                client_id UUID NOT NULL,
                gym_id UUID,
                booking_date DATE NOT NULL,
                start_time TIME NOT NULL,
                end_time TIME NOT NULL,
                status VARCHAR(20) NOT NULL CHECK (status IN ('scheduled', 'completed', 'cancelled', 'no_show')) DEFAULT 'scheduled',
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                cancelled_at TIMESTAMPTZ,
                cancellation_reason TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_client ON bookings(client_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_bookings_trainer_date ON bookings(trainer_id, booking_date)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS group_sessions (
                id UUID PRIMARY KEY,
                trainer_id UUID NOT NULL,
                session_name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                max_participants INTEGER NOT NULL CHECK (max_participants > 0),
                current_participants INTEGER NOT NULL DEFAULT 0,
                gym_id UUID NOT NULL,
                session_date DATE NOT NULL,
                start_time TIME NOT NULL,
                end_time TIME NOT NULL,
                status VARCHAR(20) NOT NULL CHECK (status IN ('scheduled', 'completed', 'cancelled')) DEFAULT 'scheduled',
                enrolled_clients UUID[] NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_group_sessions_trainer ON group_sessions(trainer_id)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_group_sessions_date ON group_sessions(session_date)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_availability(&self, slot: &AvailabilitySlot) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO availability (id, trainer_id, gym_id, day_of_week, start_time, end_time,
                                      is_recurring, specific_date, max_slots, is_active,
                                      created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(slot.id)
        .bind(slot.trainer_id)
        .bind(slot.gym_id)
        .bind(i32::from(slot.day_of_week))
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.is_recurring)
        .bind(slot.specific_date)
        .bind(slot.max_slots)
        .bind(slot.is_active)
        .bind(slot.created_at)
        .bind(slot.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_trainer_availability(&self, trainer_id: Uuid) -> Result<Vec<AvailabilitySlot>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM availability
            WHERE trainer_id = $1 AND is_active = true
            ORDER BY day_of_week, start_time
            ",
        )
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_availability).collect()
    }

    async fn deactivate_availability(
        &self,
        availability_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE availability SET is_active = false, updated_at = $2 WHERE id = $1",
        )
        .bind(availability_id)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_booking_unless_conflict(&self, booking: &Booking) -> Result<BookingInsert> {
        // Serialize creators for the same trainer and date with a
        // transaction-scoped advisory lock, then check and insert under it.
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
            .bind(booking.trainer_id.to_string())
            .bind(booking.booking_date.to_string())
            .execute(&mut *tx)
            .await?;

        let conflict: bool = sqlx::query_scalar(
            r"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE trainer_id = $1
                  AND booking_date = $2
                  AND status <> 'cancelled'
                  AND start_time < $4
                  AND $3 < end_time
            )
            ",
        )
        .bind(booking.trainer_id)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .fetch_one(&mut *tx)
        .await?;

        if conflict {
            tx.rollback().await?;
            return Ok(BookingInsert::Conflict);
        }

        sqlx::query(
            r"
            INSERT INTO bookings (id, booking_type, trainer_id, client_id, gym_id, booking_date,
                                  start_time, end_time, status, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(booking.id)
        .bind(booking.booking_type.to_string())
        .bind(booking.trainer_id)
        .bind(booking.client_id)
        .bind(booking.gym_id)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.to_string())
        .bind(booking.notes.as_deref())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(BookingInsert::Created)
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    async fn list_bookings(
        &self,
        filter: &BookingFilter,
        status: Option<BookingStatus>,
        params: &PageParams,
    ) -> Result<(Vec<Booking>, i64)> {
        let (client_id, trainer_id) = Self::filter_binds(filter);
        let status = status.map(|s| s.to_string());

        let rows = sqlx::query(
            r"
            SELECT * FROM bookings
            WHERE ($1::uuid IS NULL OR client_id = $1::uuid)
              AND ($2::uuid IS NULL OR trainer_id = $2::uuid)
              AND ($3::text IS NULL OR status = $3::text)
            ORDER BY booking_date DESC, start_time
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(client_id)
        .bind(trainer_id)
        .bind(status.as_deref())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM bookings
            WHERE ($1::uuid IS NULL OR client_id = $1::uuid)
              AND ($2::uuid IS NULL OR trainer_id = $2::uuid)
              AND ($3::text IS NULL OR status = $3::text)
            ",
        )
        .bind(client_id)
        .bind(trainer_id)
        .bind(status.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let bookings = rows
            .iter()
            .map(row_to_booking)
            .collect::<Result<Vec<Booking>>>()?;
        Ok((bookings, total))
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        reason: Option<&str>,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r"
            UPDATE bookings
            SET status = 'cancelled', cancelled_at = $2, cancellation_reason = $3, updated_at = $2
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(booking_id)
        .bind(cancelled_at)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    async fn complete_booking(
        &self,
        booking_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r"
            UPDATE bookings
            SET status = 'completed', updated_at = $2
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(booking_id)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    async fn create_group_session(&self, session: &GroupSession) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO group_sessions (id, trainer_id, session_name, description,
                                        max_participants, current_participants, gym_id,
                                        session_date, start_time, end_time, status,
                                        enrolled_clients, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ",
        )
        .bind(session.id)
        .bind(session.trainer_id)
        .bind(&session.session_name)
        .bind(&session.description)
        .bind(session.max_participants)
        .bind(session.current_participants)
        .bind(session.gym_id)
        .bind(session.session_date)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.status.to_string())
        .bind(&session.enrolled_clients)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_group_session(&self, session_id: Uuid) -> Result<Option<GroupSession>> {
        let row = sqlx::query("SELECT * FROM group_sessions WHERE id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_session).transpose()
    }

    async fn list_group_sessions(
        &self,
        status: SessionStatus,
        params: &PageParams,
    ) -> Result<(Vec<GroupSession>, i64)> {
        let rows = sqlx::query(
            r"
            SELECT * FROM group_sessions
            WHERE status = $1
            ORDER BY session_date, start_time
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(status.to_string())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM group_sessions WHERE status = $1")
                .bind(status.to_string())
                .fetch_one(&self.pool)
                .await?;

        let sessions = rows
            .iter()
            .map(row_to_session)
            .collect::<Result<Vec<GroupSession>>>()?;
        Ok((sessions, total))
    }

    async fn enroll_client(
        &self,
        session_id: Uuid,
        client_id: Uuid,
        enrolled_at: DateTime<Utc>,
    ) -> Result<EnrollOutcome> {
        // Single conditional UPDATE: membership and capacity guards plus the
        // append and increment land in one row-atomic statement.
        let row = sqlx::query(
            r"
            UPDATE group_sessions
            SET enrolled_clients = array_append(enrolled_clients, $1),
                current_participants = current_participants + 1,
                updated_at = $3
            WHERE id = $2
              AND current_participants < max_participants
              AND NOT ($1 = ANY(enrolled_clients))
            RETURNING *
            ",
        )
        .bind(client_id)
        .bind(session_id)
        .bind(enrolled_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(EnrollOutcome::Enrolled(row_to_session(&row)?));
        }

        // Zero rows: classify the rejection. Missing session outranks
        // membership, membership outranks capacity.
        match self.get_group_session(session_id).await? {
            None => Ok(EnrollOutcome::NotFound),
            Some(session) if session.enrolled_clients.contains(&client_id) => {
                Ok(EnrollOutcome::AlreadyEnrolled)
            }
            Some(session) if session.current_participants >= session.max_participants => {
                Ok(EnrollOutcome::SessionFull)
            }
            Some(session) => Err(anyhow!(
                "Enrollment for session {} rejected with {}/{} seats taken",
                session.id,
                session.current_participants,
                session.max_participants
            )),
        }
    }
}
