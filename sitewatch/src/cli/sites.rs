//! sites subcommand
//!
//! Adds, lists and updates entries in the site registry.

use crate::config::get_database_url;
use crate::db;
use crate::types::site::{LifecycleStatus, Site};
use clap::{Args, Subcommand};
use sqlx::SqlitePool;

/// Arguments for the sites subcommand
#[derive(Args, Debug, Clone)]
pub struct SitesArgs {
    /// Registry operation
    #[command(subcommand)]
    pub command: SitesCommand,
}

/// Registry operations
#[derive(Subcommand, Debug, Clone)]
pub enum SitesCommand {
    /// Register a new site
    Add {
        /// Display name
        #[arg(long)]
        name: String,
        /// Domain name without scheme (e.g. example.com)
        #[arg(long)]
        domain: String,
        /// Lifecycle status (production, development, staging, inactive)
        #[arg(long, default_value = "development")]
        status: LifecycleStatus,
    },
    /// List registered sites
    List,
    /// Change a site's lifecycle status
    SetStatus {
        /// Domain of the site to update
        #[arg(long)]
        domain: String,
        /// New lifecycle status
        #[arg(long)]
        status: LifecycleStatus,
    },
}

/// Execute the sites command
pub async fn execute(args: &SitesArgs) -> Result<(), anyhow::Error> {
    let pool = db::init_db_pool(&get_database_url()).await?;
    db::run_migrations(&pool).await?;

    match &args.command {
        SitesCommand::Add {
            name,
            domain,
            status,
        } => {
            let site = add_site(&pool, name, domain, *status).await?;
            println!("Registered {} ({}) as {}", site.name, site.domain, site.id);
        }
        SitesCommand::List => {
            let sites = db::sites::list_sites(&pool).await?;
            if sites.is_empty() {
                println!("No sites registered");
            } else {
                println!("ID\t\t\t\t\tSTATUS\t\tDOMAIN\tNAME");
                for site in sites {
                    println!(
                        "{}\t{:<12}\t{}\t{}",
                        site.id,
                        site.status.as_str(),
                        site.domain,
                        site.name
                    );
                }
            }
        }
        SitesCommand::SetStatus { domain, status } => {
            let site = db::sites::find_by_domain(&pool, domain)
                .await?
                .ok_or_else(|| anyhow::anyhow!("No site registered for domain {}", domain))?;
            db::sites::update_site_status(&pool, site.id, *status).await?;
            println!("{} is now {}", site.domain, status);
        }
    }

    Ok(())
}

/// Register a site, rejecting duplicate domains
pub async fn add_site(
    pool: &SqlitePool,
    name: &str,
    domain: &str,
    status: LifecycleStatus,
) -> Result<Site, anyhow::Error> {
    let domain = domain.trim();
    if name.trim().is_empty() || domain.is_empty() {
        anyhow::bail!("Site name and domain must not be empty");
    }
    if db::sites::find_by_domain(pool, domain).await?.is_some() {
        anyhow::bail!("Domain {} is already registered", domain);
    }

    let site = Site::new(name.trim(), domain, status);
    db::sites::create_site(pool, &site).await?;
    tracing::info!(site_id = %site.id, domain = %site.domain, status = %site.status, "Site registered");
    Ok(site)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db_pool;

    #[tokio::test]
    async fn test_add_site_rejects_duplicates() {
        let pool = test_db_pool().await;

        let site = add_site(&pool, "Shop", " shop.example ", LifecycleStatus::Production)
            .await
            .unwrap();
        assert_eq!(site.domain, "shop.example");

        let err = add_site(&pool, "Shop again", "shop.example", LifecycleStatus::Staging)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[tokio::test]
    async fn test_add_site_rejects_blank_fields() {
        let pool = test_db_pool().await;
        assert!(add_site(&pool, "  ", "a.example", LifecycleStatus::Production)
            .await
            .is_err());
        assert!(add_site(&pool, "A", "", LifecycleStatus::Production)
            .await
            .is_err());
    }
}
