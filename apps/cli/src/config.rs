use stockindex_storage_sqlite::DEFAULT_POOL_SIZE;

pub struct Config {
    pub data_dir: String,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let data_dir = std::env::var("STOCKINDEX_DATA_DIR").unwrap_or_else(|_| "./db".into());
        let pool_size: u32 = std::env::var("STOCKINDEX_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);
        Self {
            data_dir,
            pool_size,
        }
    }
}
