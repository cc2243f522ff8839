use anyhow::Context;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{StoredProgress, StudentTelemetry};
use crate::telemetry::{self, ProgressRow};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn upsert_student(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    level: &str,
    dyslexia_type: &str,
    has_kinesthetic: bool,
) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO progress_forecast.students
        (id, full_name, email, dyslexia_level, dyslexia_type, has_kinesthetic)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE
        SET full_name = EXCLUDED.full_name,
            dyslexia_level = EXCLUDED.dyslexia_level,
            dyslexia_type = EXCLUDED.dyslexia_type,
            has_kinesthetic = EXCLUDED.has_kinesthetic
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(level)
    .bind(dyslexia_type)
    .bind(has_kinesthetic)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

async fn insert_record(
    pool: &PgPool,
    student_id: Uuid,
    module_id: i32,
    attempts: i32,
    successes: i32,
    recorded_at: DateTime<Utc>,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO progress_forecast.progress_records
        (id, student_id, module_id, attempts, successes, recorded_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(student_id)
    .bind(module_id)
    .bind(attempts)
    .bind(successes)
    .bind(recorded_at)
    .bind(source_key)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let anchor = Utc
        .with_ymd_and_hms(2026, 3, 2, 16, 0, 0)
        .single()
        .context("invalid seed anchor")?;

    // (name, email, level, type, kinesthetic, records, success rate in tenths)
    let students = [
        ("Lucia Romero", "lucia.romero@example.edu", "moderado", "mixta", false, 12, 8),
        ("Mateo Silva", "mateo.silva@example.edu", "severo", "fonologica", true, 9, 4),
        ("Ines Vidal", "ines.vidal@example.edu", "leve", "superficial", false, 3, 9),
    ];

    for (name, email, level, dyslexia_type, kinesthetic, records, rate) in students {
        let student_id =
            upsert_student(pool, name, email, level, dyslexia_type, kinesthetic).await?;

        for i in 0..records {
            let attempts = 8 + (i % 3);
            let successes = attempts * rate / 10;
            let recorded_at = anchor - Duration::days(i64::from(i) * 2);
            insert_record(
                pool,
                student_id,
                i % 3 + 1,
                attempts,
                successes,
                recorded_at,
                &format!("seed-{email}-{i}"),
            )
            .await?;
        }
    }

    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let rows: Vec<ProgressRow> = telemetry::read_csv(csv_path)?;
    let mut inserted = 0usize;

    for row in rows {
        let student_id = upsert_student(
            pool,
            &row.full_name,
            &row.email,
            &row.level,
            &row.dyslexia_type,
            row.has_kinesthetic,
        )
        .await?;

        let source_key = row
            .source_key
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let module_id = i32::try_from(row.module_id).context("module id out of range")?;
        let attempts = i32::try_from(row.attempts).context("attempts out of range")?;
        let successes = i32::try_from(row.successes).context("successes out of range")?;

        if insert_record(
            pool,
            student_id,
            module_id,
            attempts,
            successes,
            row.recorded_at,
            &source_key,
        )
        .await?
        {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn fetch_telemetry(
    pool: &PgPool,
    email: Option<&str>,
) -> anyhow::Result<Vec<StudentTelemetry>> {
    let mut query = String::from(
        "SELECT s.id, s.full_name, s.dyslexia_level, s.dyslexia_type, s.has_kinesthetic, \
         r.module_id, r.attempts, r.successes, r.recorded_at \
         FROM progress_forecast.students s \
         LEFT JOIN progress_forecast.progress_records r ON r.student_id = s.id",
    );
    if email.is_some() {
        query.push_str(" WHERE s.email = $1");
    }
    query.push_str(" ORDER BY s.full_name, s.id, r.recorded_at");

    let mut rows = sqlx::query(&query);
    if let Some(value) = email {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut students: Vec<StudentTelemetry> = Vec::new();

    for row in records {
        let id: Uuid = row.get("id");
        let student_id = id.to_string();
        if students.last().map(|s| s.student_id.as_str()) != Some(student_id.as_str()) {
            students.push(StudentTelemetry {
                student_id,
                display_name: row.get("full_name"),
                level: row.get("dyslexia_level"),
                dyslexia_type: row.get("dyslexia_type"),
                has_kinesthetic: row.get("has_kinesthetic"),
                records: Vec::new(),
            });
        }

        let module_id: Option<i32> = row.get("module_id");
        let attempts: Option<i32> = row.get("attempts");
        let successes: Option<i32> = row.get("successes");
        let recorded_at: Option<DateTime<Utc>> = row.get("recorded_at");

        if let (Some(module_id), Some(attempts), Some(successes), Some(recorded_at), Some(student)) =
            (module_id, attempts, successes, recorded_at, students.last_mut())
        {
            student.records.push(StoredProgress {
                module_id: i64::from(module_id),
                attempts: i64::from(attempts),
                successes: i64::from(successes),
                recorded_at,
            });
        }
    }

    Ok(students)
}
