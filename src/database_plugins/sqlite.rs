//! SQLite database implementation
//!
//! Embedded backend for local development and tests. SQLite serializes
//! writers, so both admission-control mutations are expressed as single
//! guarded statements: the guard and the write land in the same statement and
//! no interleaving can separate them.

use std::str::FromStr as _;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use super::{BookingInsert, DatabaseProvider, EnrollOutcome};
use crate::constants::database::SQLITE_BUSY_TIMEOUT_SECS;
use crate::models::{
    AvailabilitySlot, Booking, BookingFilter, BookingStatus, GroupSession, SessionStatus,
};
use crate::pagination::PageParams;

/// SQLite database implementation
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    fn filter_binds(filter: &BookingFilter) -> (Option<String>, Option<String>) {
        match filter {
            BookingFilter::ByClient(id) => (Some(id.to_string()), None),
            BookingFilter::ByTrainer(id) => (None, Some(id.to_string())),
            BookingFilter::All => (None, None),
        }
    }
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("Invalid UUID in database: {value}"))
}

fn row_to_availability(row: &SqliteRow) -> Result<AvailabilitySlot> {
    Ok(AvailabilitySlot {
        id: parse_uuid(row.try_get("id")?)?,
        trainer_id: parse_uuid(row.try_get("trainer_id")?)?,
        gym_id: row
            .try_get::<Option<String>, _>("gym_id")?
            .map(|s| parse_uuid(&s))
            .transpose()?,
        day_of_week: row.try_get("day_of_week")?,
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

fn row_to_booking(row: &SqliteRow) -> Result<Booking> {
    Ok(Booking {
        id: parse_uuid(row.try_get("id")?)?,
        booking_type: row.try_get::<String, _>("booking_type")?.parse()?,
        trainer_id: parse_uuid(row.try_get("trainer_id")?)?,
        client_id: parse_uuid(row.try_get("client_id")?)?,
        gym_id: row
            .try_get::<Option<String>, _>("gym_id")?
            .map(|s| parse_uuid(&s))
            .transpose()?,
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

fn row_to_session(row: &SqliteRow) -> Result<GroupSession> {
    let enrolled_json: String = row.try_get("enrolled_clients")?;
    let enrolled: Vec<String> = serde_json::from_str(&enrolled_json)
        .with_context(|| format!("Invalid enrolled_clients JSON: {enrolled_json}"))?;
    let enrolled_clients = enrolled
        .iter()
        .map(|s| parse_uuid(s))
        .collect::<Result<Vec<Uuid>>>()?;

    Ok(GroupSession {
        id: parse_uuid(row.try_get("id")?)?,
        trainer_id: parse_uuid(row.try_get("trainer_id")?)?,
        session_name: row.try_get("session_name")?,
        description: row.try_get("description")?,
        max_participants: row.try_get("max_participants")?,
        current_participants: row.try_get("current_participants")?,
        gym_id: parse_uuid(row.try_get("gym_id")?)?,
        session_date: row.try_get::<NaiveDate, _>("session_date")?,
        start_time: row.try_get::<NaiveTime, _>("start_time")?,
        end_time: row.try_get::<NaiveTime, _>("end_time")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        enrolled_clients,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        // An in-memory database exists per connection; pin the pool to a
        // single connection so every caller sees the same schema.
        let is_memory = database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS));
        if !is_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(if is_memory { 1 } else { max_connections })
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS availability (
                id TEXT PRIMARY KEY,
                trainer_id TEXT NOT NULL,
                gym_id TEXT,
                day_of_week INTEGER NOT NULL CHECK (day_of_week >= 0 AND day_of_week <= 6),
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                is_recurring BOOLEAN NOT NULL DEFAULT 1,
                specific_date TEXT,
                max_slots INTEGER NOT NULL DEFAULT 1,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
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
                id TEXT PRIMARY KEY,
                booking_type TEXT NOT NULL CHECK (booking_type IN ('one_on_one', 'group_class')),
                trainer_id TEXT NOT NULL,
                client_id TEXT NOT NULL,
                gym_id TEXT,
                booking_date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('scheduled', 'completed', 'cancelled', 'no_show')) DEFAULT 'scheduled',
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                cancelled_at TEXT,
                cancellation_reason TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_client ON bookings(client_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_trainer ON bookings(trainer_id)")
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
                id TEXT PRIMARY KEY,
                trainer_id TEXT NOT NULL,
                session_name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                max_participants INTEGER NOT NULL CHECK (max_participants > 0),
                current_participants INTEGER NOT NULL DEFAULT 0,
                gym_id TEXT NOT NULL,
                session_date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('scheduled', 'completed', 'cancelled')) DEFAULT 'scheduled',
                enrolled_clients TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
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
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ",
        )
        .bind(slot.id.to_string())
        .bind(slot.trainer_id.to_string())
        .bind(slot.gym_id.map(|id| id.to_string()))
        .bind(slot.day_of_week)
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
            WHERE trainer_id = ?1 AND is_active = 1
            ORDER BY day_of_week, start_time
            ",
        )
        .bind(trainer_id.to_string())
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
            "UPDATE availability SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(availability_id.to_string())
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_booking_unless_conflict(&self, booking: &Booking) -> Result<BookingInsert> {
        // Guard and insert in one statement; SQLite's single-writer model
        // makes the pair atomic against concurrent creators.
        let result = sqlx::query(
            r"
            INSERT INTO bookings (id, booking_type, trainer_id, client_id, gym_id, booking_date,
                                  start_time, end_time, status, notes, created_at, updated_at)
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12
            WHERE NOT EXISTS (
                SELECT 1 FROM bookings
                WHERE trainer_id = ?3
                  AND booking_date = ?6
                  AND status != 'cancelled'
                  AND start_time < ?8
                  AND ?7 < end_time
            )
            ",
        )
        .bind(booking.id.to_string())
        .bind(booking.booking_type.to_string())
        .bind(booking.trainer_id.to_string())
        .bind(booking.client_id.to_string())
        .bind(booking.gym_id.map(|id| id.to_string()))
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.to_string())
        .bind(booking.notes.as_deref())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(BookingInsert::Conflict)
        } else {
            Ok(BookingInsert::Created)
        }
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = ?1")
            .bind(booking_id.to_string())
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
            WHERE (?1 IS NULL OR client_id = ?1)
              AND (?2 IS NULL OR trainer_id = ?2)
              AND (?3 IS NULL OR status = ?3)
            ORDER BY booking_date DESC, start_time
            LIMIT ?4 OFFSET ?5
            ",
        )
        .bind(client_id.as_deref())
        .bind(trainer_id.as_deref())
        .bind(status.as_deref())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM bookings
            WHERE (?1 IS NULL OR client_id = ?1)
              AND (?2 IS NULL OR trainer_id = ?2)
              AND (?3 IS NULL OR status = ?3)
            ",
        )
        .bind(client_id.as_deref())
        .bind(trainer_id.as_deref())
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
        let result = sqlx::query(
            r"
            UPDATE bookings
            SET status = 'cancelled', cancelled_at = ?2, cancellation_reason = ?3, updated_at = ?2
            WHERE id = ?1
            ",
        )
        .bind(booking_id.to_string())
        .bind(cancelled_at)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_booking(booking_id).await
    }

    async fn complete_booking(
        &self,
        booking_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        let result =
            sqlx::query("UPDATE bookings SET status = 'completed', updated_at = ?2 WHERE id = ?1")
                .bind(booking_id.to_string())
                .bind(completed_at)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_booking(booking_id).await
    }

    async fn create_group_session(&self, session: &GroupSession) -> Result<()> {
        let enrolled = serde_json::to_string(
            &session
                .enrolled_clients
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>(),
        )?;

        sqlx::query(
            r"
            INSERT INTO group_sessions (id, trainer_id, session_name, description,
                                        max_participants, current_participants, gym_id,
                                        session_date, start_time, end_time, status,
                                        enrolled_clients, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ",
        )
        .bind(session.id.to_string())
        .bind(session.trainer_id.to_string())
        .bind(&session.session_name)
        .bind(&session.description)
        .bind(session.max_participants)
        .bind(session.current_participants)
        .bind(session.gym_id.to_string())
        .bind(session.session_date)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.status.to_string())
        .bind(enrolled)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_group_session(&self, session_id: Uuid) -> Result<Option<GroupSession>> {
        let row = sqlx::query("SELECT * FROM group_sessions WHERE id = ?1")
            .bind(session_id.to_string())
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
            WHERE status = ?1
            ORDER BY session_date, start_time
            LIMIT ?2 OFFSET ?3
            ",
        )
        .bind(status.to_string())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM group_sessions WHERE status = ?1")
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
        // Membership check, capacity check, append, and counter increment in
        // one statement. Two racers for the last seat cannot both match the
        // guard.
        let result = sqlx::query(
            r"
            UPDATE group_sessions
            SET enrolled_clients = json_insert(enrolled_clients, '$[#]', ?1),
                current_participants = current_participants + 1,
                updated_at = ?3
            WHERE id = ?2
              AND current_participants < max_participants
              AND NOT EXISTS (
                  SELECT 1 FROM json_each(group_sessions.enrolled_clients)
                  WHERE json_each.value = ?1
              )
            ",
        )
        .bind(client_id.to_string())
        .bind(session_id.to_string())
        .bind(enrolled_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            let session = self
                .get_group_session(session_id)
                .await?
                .ok_or_else(|| anyhow!("Session {session_id} vanished after enrollment"))?;
            return Ok(EnrollOutcome::Enrolled(session));
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
