/// Configuration for the MongoDB deployment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection string, credentials included.
    pub uri: String,
    pub database_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
}

impl DatabaseConfig {
    /// Atlas-style SRV connection string for a cluster host.
    pub fn atlas_uri(user: &str, password: &str, cluster: &str) -> String {
        format!("mongodb+srv://{user}:{password}@{cluster}/?retryWrites=true&w=majority")
    }
}
