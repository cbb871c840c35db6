use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::Pagination;
use crate::errors::AppError;
use crate::jobs::models::{JobRow, JobType, ValidJob};

#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub category: Option<String>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE is_active = TRUE");
    if let Some(q) = &filter.q {
        let pattern = like_pattern(q);
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = &filter.location {
        builder
            .push(" AND location ILIKE ")
            .push_bind(like_pattern(location));
    }
    if let Some(job_type) = filter.job_type {
        builder.push(" AND job_type = ").push_bind(job_type.as_str());
    }
    if let Some(category) = &filter.category {
        builder
            .push(" AND category = ")
            .push_bind(category.to_lowercase());
    }
}

/// `%term%` with LIKE metacharacters escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

pub async fn list_jobs(
    pool: &PgPool,
    filter: &JobFilter,
    pagination: Pagination,
) -> Result<(Vec<JobRow>, i64), AppError> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
    push_filters(&mut count, filter);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
    push_filters(&mut select, filter);
    select
        .push(" ORDER BY posted_at DESC LIMIT ")
        .push_bind(pagination.per_page)
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let rows = select.build_query_as::<JobRow>().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn insert_job(pool: &PgPool, job: &ValidJob) -> Result<JobRow, AppError> {
    Ok(sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (id, title, company, location, job_type, category, salary_min, salary_max,
             description, requirements, apply_url, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.location)
    .bind(job.job_type.as_str())
    .bind(&job.category)
    .bind(job.salary_min)
    .bind(job.salary_max)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.apply_url)
    .bind(job.is_active)
    .fetch_one(pool)
    .await?)
}

pub async fn update_job(pool: &PgPool, id: Uuid, job: &ValidJob) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = $2, company = $3, location = $4, job_type = $5, category = $6,
            salary_min = $7, salary_max = $8, description = $9, requirements = $10,
            apply_url = $11, is_active = $12, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.location)
    .bind(job.job_type.as_str())
    .bind(&job.category)
    .bind(job.salary_min)
    .bind(job.salary_max)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.apply_url)
    .bind(job.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern(" rust "), "%rust%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }

    #[test]
    fn test_filters_build_expected_sql() {
        let filter = JobFilter {
            q: Some("rust".into()),
            location: Some("Berlin".into()),
            job_type: Some(JobType::Contract),
            category: None,
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        push_filters(&mut builder, &filter);
        let sql = builder.sql();
        assert!(sql.contains("is_active = TRUE"));
        assert!(sql.contains("title ILIKE $1"));
        assert!(sql.contains("location ILIKE $4"));
        assert!(sql.contains("job_type = $5"));
        assert!(!sql.contains("category"));
    }
}
