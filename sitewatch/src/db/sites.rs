//! サイトレジストリのデータベース操作

use super::{
    convert_row, convert_rows, format_timestamp, parse_timestamp, parse_uuid, RowConversionError,
};
use crate::types::site::{LifecycleStatus, Site};
use sqlx::SqlitePool;
use uuid::Uuid;

/// サイトを登録
pub async fn create_site(pool: &SqlitePool, site: &Site) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sites (id, name, domain, status, registered_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(site.id.to_string())
    .bind(&site.name)
    .bind(&site.domain)
    .bind(site.status.as_str())
    .bind(format_timestamp(site.registered_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// 全サイトを取得（監視対象外を含む）
pub async fn list_sites(pool: &SqlitePool) -> Result<Vec<Site>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SiteRow>(
        r#"
        SELECT id, name, domain, status, registered_at
        FROM sites
        ORDER BY registered_at ASC, name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(convert_rows(rows, "sites"))
}

/// 監視対象サイト（production / development / staging）を取得
pub async fn list_active_sites(pool: &SqlitePool) -> Result<Vec<Site>, sqlx::Error> {
    let [production, development, staging] = LifecycleStatus::MONITORED;
    let rows = sqlx::query_as::<_, SiteRow>(
        r#"
        SELECT id, name, domain, status, registered_at
        FROM sites
        WHERE status IN (?, ?, ?)
        ORDER BY registered_at ASC, name ASC
        "#,
    )
    .bind(production.as_str())
    .bind(development.as_str())
    .bind(staging.as_str())
    .fetch_all(pool)
    .await?;

    Ok(convert_rows(rows, "sites"))
}

/// ドメインでサイトを検索
pub async fn find_by_domain(pool: &SqlitePool, domain: &str) -> Result<Option<Site>, sqlx::Error> {
    let row = sqlx::query_as::<_, SiteRow>(
        r#"
        SELECT id, name, domain, status, registered_at
        FROM sites
        WHERE domain = ?
        "#,
    )
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    Ok(convert_row(row, "sites"))
}

/// サイトのライフサイクル状態を更新
pub async fn update_site_status(
    pool: &SqlitePool,
    id: Uuid,
    status: LifecycleStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE sites SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct SiteRow {
    id: String,
    name: String,
    domain: String,
    status: String,
    registered_at: String,
}

impl TryFrom<SiteRow> for Site {
    type Error = RowConversionError;

    fn try_from(row: SiteRow) -> Result<Self, Self::Error> {
        Ok(Site {
            id: parse_uuid(&row.id)?,
            domain: row.domain,
            name: row.name,
            status: row.status.parse()?,
            registered_at: parse_timestamp(&row.registered_at)?,
        })
    }
}
