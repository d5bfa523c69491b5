//! MySQL-backed listings catalog: bounded parameterized search plus point
//! lookups against the read-only properties view.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, info};
use vera_core::config::DatabaseConfig;
use vera_core::Listing;
use vera_filter::SearchRequest;
use vera_router::traits::{ListingLookup, ListingSearch};

const VIEW: &str = "vw_get_all_properties";

const SELECT_COLS: &str = "`id`, `nombre`, `provincia`, `canton`, `distrito`, \
`tipo_propiedad`, `tipo_oferta`, `precio_usd`, `precio_local`, `bedrooms`, \
`bathrooms`, `area_construccion`, `tamanio_lote`, `imagen`, `property_url`, \
`agent_name`, `agent_phone_number`, `nombre_banco`";

/// Columns free-text terms are matched against.
const TEXT_SEARCH_COLS: [&str; 8] = [
    "nombre",
    "provincia",
    "canton",
    "distrito",
    "tipo_propiedad",
    "tipo_oferta",
    "agent_name",
    "nombre_banco",
];

const PRICE_EXPR: &str = "CAST(COALESCE(`precio_usd`, `precio_local`) AS DECIMAL(18,2))";

/// Bind values collected while the WHERE clause is assembled.
enum Param {
    Text(String),
    Number(f64),
    Int(i64),
}

pub struct MySqlListingStore {
    pool: MySqlPool,
}

impl MySqlListingStore {
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&config.url())
            .await?;
        info!(host = %config.host, database = %config.database, "listings database connected");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn listing_from_row(row: &MySqlRow) -> Result<Listing, sqlx::Error> {
        let mut listing = Listing::new(row.try_get("id")?, row.try_get::<String, _>("nombre")?);
        listing.province = row.try_get("provincia")?;
        listing.canton = row.try_get("canton")?;
        listing.district = row.try_get("distrito")?;
        listing.property_type = row.try_get("tipo_propiedad")?;
        listing.offer_type = row.try_get("tipo_oferta")?;
        listing.price_usd = row.try_get("precio_usd")?;
        listing.price_local = row.try_get("precio_local")?;
        listing.bedrooms = row.try_get::<Option<i64>, _>("bedrooms")?.map(|v| v as u32);
        listing.bathrooms = row.try_get::<Option<i64>, _>("bathrooms")?.map(|v| v as u32);
        listing.built_area_m2 = row.try_get("area_construccion")?;
        listing.lot_area_m2 = row.try_get("tamanio_lote")?;
        listing.image_url = row.try_get("imagen")?;
        listing.source_url = row.try_get("property_url")?;
        listing.agent_name = row.try_get("agent_name")?;
        listing.agent_phone = row.try_get("agent_phone_number")?;
        listing.bank_name = row.try_get("nombre_banco")?;
        Ok(listing)
    }

    async fn fetch(&self, sql: &str, params: Vec<Param>) -> anyhow::Result<Vec<Listing>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                Param::Text(value) => query.bind(value),
                Param::Number(value) => query.bind(value),
                Param::Int(value) => query.bind(value),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;
        let mut listings = Vec::with_capacity(rows.len());
        for row in &rows {
            listings.push(Self::listing_from_row(row)?);
        }
        Ok(listings)
    }
}

/// WHERE clause + bind values for a search request. Only whitelisted column
/// names ever reach the SQL text; every user value is a bind parameter.
fn build_where(request: &SearchRequest) -> (String, Vec<Param>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(region) = &request.filters.region {
        clauses.push("LOWER(`provincia`) LIKE ?".to_string());
        params.push(Param::Text(format!("%{}%", region.to_lowercase())));
    }

    if !request.terms.is_empty() {
        let mut term_blocks = Vec::new();
        for term in &request.terms {
            let ors: Vec<String> = TEXT_SEARCH_COLS
                .iter()
                .map(|col| format!("LOWER(`{col}`) LIKE ?"))
                .collect();
            for _ in &TEXT_SEARCH_COLS {
                params.push(Param::Text(format!("%{term}%")));
            }
            term_blocks.push(format!("({})", ors.join(" OR ")));
        }
        clauses.push(format!("({})", term_blocks.join(" OR ")));
    }

    if let Some(ceiling) = request.filters.price_ceiling {
        clauses.push(format!("{PRICE_EXPR} <= ?"));
        params.push(Param::Number(ceiling as f64));
    }

    let where_sql = if clauses.is_empty() {
        "1=0".to_string() // unbounded requests never reach the database
    } else {
        clauses.join(" AND ")
    };
    (where_sql, params)
}

#[async_trait]
impl ListingSearch for MySqlListingStore {
    async fn execute(&self, request: &SearchRequest) -> anyhow::Result<Vec<Listing>> {
        let (where_sql, mut params) = build_where(request);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM `{VIEW}` WHERE {where_sql} \
             ORDER BY ({PRICE_EXPR} IS NULL), {PRICE_EXPR} ASC LIMIT ?"
        );
        params.push(Param::Int(i64::from(request.limit)));
        debug!(%sql, "executing listings search");
        self.fetch(&sql, params).await
    }
}

/// Last path segment of a listing URL, without query or fragment.
fn extract_slug(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let slug = path.trim_end_matches('/').rsplit('/').next()?;
    if slug.is_empty() || slug.starts_with("http") {
        None
    } else {
        Some(slug.to_string())
    }
}

#[async_trait]
impl ListingLookup for MySqlListingStore {
    async fn by_url(&self, url: &str) -> anyhow::Result<Option<Listing>> {
        let Some(slug) = extract_slug(url) else {
            debug!(url, "no slug in listing url");
            return Ok(None);
        };
        let sql = format!(
            "SELECT {SELECT_COLS} FROM `{VIEW}` WHERE `property_url` LIKE ? LIMIT 1"
        );
        let listings = self
            .fetch(&sql, vec![Param::Text(format!("%{slug}%"))])
            .await?;
        Ok(listings.into_iter().next())
    }

    async fn by_name(&self, name: &str) -> anyhow::Result<Option<Listing>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM `{VIEW}` WHERE LOWER(`nombre`) LIKE ? LIMIT 1"
        );
        let listings = self
            .fetch(&sql, vec![Param::Text(format!("%{}%", name.to_lowercase()))])
            .await?;
        Ok(listings.into_iter().next())
    }
}
