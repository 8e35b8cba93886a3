use anyhow::Context;
use mysql::prelude::Queryable;
use mysql::{OptsBuilder, Pool};

/// Login details for a seeded user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: u32,
    pub email: String,
    pub password: String,
}

/// Direct access to the target's seeded data.
///
/// Scenarios need real credentials to log in and the validation checks compare rendered totals
/// against the database, so both read it without going through the target.
pub trait Dataset: std::fmt::Debug + Send + Sync {
    fn credentials(&self, user_id: u32) -> anyhow::Result<Credentials>;

    /// Sum of the prices of everything the user has bought.
    fn total_pay(&self, user_id: u32) -> anyhow::Result<u64>;

    /// Remove rows written by earlier runs.
    fn reset_scratch_tables(&self) -> anyhow::Result<()>;
}

/// Connection settings for the target's MySQL database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl DatasetConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any variable lookup, falling back to the defaults of the seeded
    /// database for anything that is not set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());

        let port = get("ISHOCON1_DB_PORT", "3306");
        Ok(Self {
            user: get("ISHOCON1_DB_USER", "ishocon"),
            password: get("ISHOCON1_DB_PASSWORD", "ishocon"),
            host: get("ISHOCON1_DB_HOST", "localhost"),
            port: port
                .parse()
                .with_context(|| format!("Invalid ISHOCON1_DB_PORT: {port}"))?,
            name: get("ISHOCON1_DB_NAME", "ishocon1"),
        })
    }
}

/// Tables the target only appends to during a run. Clearing them is best effort because older
/// deployments of the target do not have all of them.
const SCRATCH_TABLES: [&str; 9] = [
    "product_views",
    "product_ratings",
    "favorites",
    "stocks",
    "user_follows",
    "notifications",
    "price_history",
    "product_tags",
    "user_coupons",
];

pub struct MysqlDataset {
    config: DatasetConfig,
    pool: Pool,
}

impl std::fmt::Debug for MysqlDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlDataset")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("name", &self.config.name)
            .finish_non_exhaustive()
    }
}

impl MysqlDataset {
    pub fn connect(config: DatasetConfig) -> anyhow::Result<Self> {
        let opts = OptsBuilder::new()
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .ip_or_hostname(Some(config.host.clone()))
            .tcp_port(config.port)
            .db_name(Some(config.name.clone()));
        let pool = Pool::new(opts).with_context(|| {
            format!(
                "Failed to connect to database {} at {}:{}",
                config.name, config.host, config.port
            )
        })?;

        Ok(Self { config, pool })
    }
}

impl Dataset for MysqlDataset {
    fn credentials(&self, user_id: u32) -> anyhow::Result<Credentials> {
        let mut conn = self.pool.get_conn()?;
        let row: Option<(String, String)> = conn.exec_first(
            "SELECT email, password FROM users WHERE id = ? LIMIT 1",
            (user_id,),
        )?;

        let (email, password) = row.with_context(|| format!("No user with id {user_id}"))?;
        Ok(Credentials {
            user_id,
            email,
            password,
        })
    }

    fn total_pay(&self, user_id: u32) -> anyhow::Result<u64> {
        let mut conn = self.pool.get_conn()?;
        let total: Option<Option<String>> = conn.exec_first(
            "SELECT SUM(p.price) AS total_pay \
             FROM histories AS h \
             INNER JOIN products AS p ON p.id = h.product_id \
             WHERE h.user_id = ?",
            (user_id,),
        )?;

        match total.flatten() {
            Some(total) => total
                .parse()
                .with_context(|| format!("Unexpected total for user {user_id}: {total}")),
            None => Ok(0),
        }
    }

    fn reset_scratch_tables(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.get_conn()?;
        conn.query_drop("DELETE FROM histories WHERE id > 500000")
            .context("Failed to reset purchase histories")?;

        for table in SCRATCH_TABLES {
            if let Err(e) = conn.query_drop(format!("DELETE FROM {table} WHERE id > 0")) {
                log::debug!("Skipping reset of {table}: {e}");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn config_defaults() {
        let config = DatasetConfig::from_lookup(|_| None).unwrap();
        assert_eq!(
            DatasetConfig {
                user: "ishocon".to_string(),
                password: "ishocon".to_string(),
                host: "localhost".to_string(),
                port: 3306,
                name: "ishocon1".to_string(),
            },
            config
        );
    }

    #[test]
    fn config_overrides() {
        let vars = HashMap::from([
            ("ISHOCON1_DB_HOST", "db.internal"),
            ("ISHOCON1_DB_PORT", "13306"),
        ]);
        let config =
            DatasetConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!("db.internal", config.host);
        assert_eq!(13306, config.port);
        assert_eq!("ishocon", config.user);
    }

    #[test]
    fn config_rejects_bad_port() {
        assert!(DatasetConfig::from_lookup(|key| {
            (key == "ISHOCON1_DB_PORT").then(|| "not-a-port".to_string())
        })
        .is_err());
    }
}
