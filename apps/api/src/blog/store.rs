use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::blog::models::{slugify, unique_slug, BlogPostRow, ValidPost};
use crate::db::Pagination;
use crate::errors::{conflict_on_unique, AppError};

fn push_published_filter(builder: &mut QueryBuilder<'_, Postgres>, tag: Option<&str>) {
    builder.push(" WHERE published = TRUE");
    if let Some(tag) = tag {
        builder
            .push(" AND ")
            .push_bind(tag.trim().to_lowercase())
            .push(" = ANY(tags)");
    }
}

pub async fn list_published(
    pool: &PgPool,
    tag: Option<&str>,
    pagination: Pagination,
) -> Result<(Vec<BlogPostRow>, i64), AppError> {
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM blog_posts");
    push_published_filter(&mut count, tag);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM blog_posts");
    push_published_filter(&mut select, tag);
    select
        .push(" ORDER BY published_at DESC NULLS LAST, created_at DESC LIMIT ")
        .push_bind(pagination.per_page)
        .push(" OFFSET ")
        .push_bind(pagination.offset());
    let rows = select.build_query_as::<BlogPostRow>().fetch_all(pool).await?;

    Ok((rows, total))
}

/// Fetches a post by slug. Drafts are only visible when `include_drafts` is set.
pub async fn get_by_slug(
    pool: &PgPool,
    slug: &str,
    include_drafts: bool,
) -> Result<BlogPostRow, AppError> {
    sqlx::query_as::<_, BlogPostRow>(
        "SELECT * FROM blog_posts WHERE slug = $1 AND (published = TRUE OR $2)",
    )
    .bind(slug)
    .bind(include_drafts)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))
}

pub async fn insert_post(pool: &PgPool, post: &ValidPost) -> Result<BlogPostRow, AppError> {
    let base = slugify(&post.title);
    let taken: Vec<String> =
        sqlx::query_scalar("SELECT slug FROM blog_posts WHERE slug = $1 OR slug LIKE $2")
            .bind(&base)
            .bind(format!("{base}-%"))
            .fetch_all(pool)
            .await?;
    let slug = unique_slug(&base, &taken);

    sqlx::query_as::<_, BlogPostRow>(
        r#"
        INSERT INTO blog_posts
            (id, title, slug, excerpt, content, author, tags, cover_image,
             published, reading_minutes, published_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, CASE WHEN $9 THEN NOW() END)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&post.title)
    .bind(&slug)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(&post.author)
    .bind(&post.tags)
    .bind(&post.cover_image)
    .bind(post.published)
    .bind(post.reading_minutes)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "A post with this slug was created concurrently; retry"))
}

/// Replaces a post's content. The slug is kept so published URLs stay stable.
pub async fn update_post(
    pool: &PgPool,
    slug: &str,
    post: &ValidPost,
) -> Result<BlogPostRow, AppError> {
    sqlx::query_as::<_, BlogPostRow>(
        r#"
        UPDATE blog_posts
        SET title = $2, excerpt = $3, content = $4, author = $5, tags = $6,
            cover_image = $7, published = $8, reading_minutes = $9,
            published_at = CASE WHEN $8 THEN COALESCE(published_at, NOW()) ELSE published_at END,
            updated_at = NOW()
        WHERE slug = $1
        RETURNING *
        "#,
    )
    .bind(slug)
    .bind(&post.title)
    .bind(&post.excerpt)
    .bind(&post.content)
    .bind(&post.author)
    .bind(&post.tags)
    .bind(&post.cover_image)
    .bind(post.published)
    .bind(post.reading_minutes)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Post '{slug}' not found")))
}

pub async fn delete_post(pool: &PgPool, slug: &str) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM blog_posts WHERE slug = $1")
        .bind(slug)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Post '{slug}' not found")));
    }
    Ok(())
}
