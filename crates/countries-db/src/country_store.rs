//! Persistence for the merged country set.
//!
//! The `countries` table only ever holds the output of the latest refresh.
//! [`CountryStore::replace_all`] swaps the complete contents inside one
//! transaction; every other operation reads or trims that set.
//!
//! Empty currency codes and zero exchange rates are stored as `NULL` and
//! mapped back to `""` / `0.0` on read.

use countries_types::Country;
use sqlx::SqlitePool;

use crate::error::DbError;

const SELECT_COLUMNS: &str = r"SELECT id, name, capital, region, population, currency_code,
                                      exchange_rate, estimated_gdp, flag_url, last_refreshed_at
                               FROM countries";

/// Operations on the `countries` table.
pub struct CountryStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CountryStore<'a> {
    /// Create a new country store bound to a connection pool.
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Atomically replace every stored country with `countries`.
    ///
    /// Deletes all rows and inserts the new set, preserving each
    /// country's ordinal `id`, in a single transaction. On any failure the
    /// transaction is rolled back and the previous set stays intact.
    ///
    /// Returns the number of rows that were discarded.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if any statement or the commit fails.
    pub async fn replace_all(&self, countries: &[Country]) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM countries")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for country in countries {
            sqlx::query(
                r"INSERT INTO countries (id, name, capital, region, population, currency_code,
                                         exchange_rate, estimated_gdp, flag_url, last_refreshed_at)
                  VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(country.id)
            .bind(&country.name)
            .bind(&country.capital)
            .bind(&country.region)
            .bind(i64::try_from(country.population).unwrap_or(i64::MAX))
            .bind(non_empty(&country.currency_code))
            .bind(positive(country.exchange_rate))
            .bind(country.estimated_gdp)
            .bind(&country.flag_url)
            .bind(&country.last_refreshed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            removed,
            inserted = countries.len(),
            "Replaced stored countries"
        );

        Ok(removed)
    }

    /// Return every stored country in storage (`id`) order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Country>, DbError> {
        let rows = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Country::from).collect())
    }

    /// Return the number of stored countries.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn count_all(&self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Find the first country whose name matches `name`, ignoring case and
    /// surrounding whitespace on both sides.
    ///
    /// Matching happens in Rust rather than SQL because `SQLite`'s
    /// `lower()` only folds ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Country>, DbError> {
        let countries = self.find_all().await?;
        Ok(countries.into_iter().find(|c| c.name_matches(name)))
    }

    /// Delete the first country (lowest `id`) whose name matches `name`,
    /// ignoring case and surrounding whitespace.
    ///
    /// Lookup and delete run in one `IMMEDIATE` transaction, so the write
    /// lock is held from the first read and a concurrent
    /// [`replace_all`](Self::replace_all) waits on the busy timeout
    /// instead of failing the upgrade. Returns the removed country.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no country matches, or
    /// [`DbError::Sqlite`] if a statement fails.
    pub async fn delete_by_name(&self, name: &str) -> Result<Country, DbError> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let rows = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&mut *tx)
            .await?;

        let target = rows
            .into_iter()
            .map(Country::from)
            .find(|c| c.name_matches(name))
            .ok_or_else(|| DbError::NotFound(name.trim().to_owned()))?;

        sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(target.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(id = target.id, name = %target.name, "Deleted country");

        Ok(target)
    }

    /// Return the newest `last_refreshed_at` among stored countries.
    ///
    /// Used to restore the refresh marker after a restart.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the query fails.
    pub async fn latest_refresh(&self) -> Result<Option<String>, DbError> {
        let latest: Option<String> =
            sqlx::query_scalar("SELECT MAX(last_refreshed_at) FROM countries")
                .fetch_one(self.pool)
                .await?;

        Ok(latest)
    }
}

/// A row from the `countries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CountryRow {
    /// Ordinal id assigned at merge time.
    pub id: i64,
    /// Country name.
    pub name: String,
    /// Capital city.
    pub capital: Option<String>,
    /// Geographic region.
    pub region: Option<String>,
    /// Population count.
    pub population: i64,
    /// First currency code, `NULL` when the country has none.
    pub currency_code: Option<String>,
    /// Exchange rate, `NULL` when no usable rate was found.
    pub exchange_rate: Option<f64>,
    /// Estimated GDP in USD.
    pub estimated_gdp: f64,
    /// Flag image URL.
    pub flag_url: Option<String>,
    /// Refresh timestamp.
    pub last_refreshed_at: Option<String>,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            capital: row.capital.unwrap_or_default(),
            region: row.region.unwrap_or_default(),
            population: u64::try_from(row.population).unwrap_or(0),
            currency_code: row.currency_code.unwrap_or_default(),
            exchange_rate: row.exchange_rate.unwrap_or(0.0),
            estimated_gdp: row.estimated_gdp,
            flag_url: row.flag_url.unwrap_or_default(),
            last_refreshed_at: row.last_refreshed_at.unwrap_or_default(),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}
