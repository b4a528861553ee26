use clap::Parser;

#[derive(Clone, Debug, Parser)]
pub struct GraderArgs {
    /// SQLite connection URL
    #[clap(long, env = "GRADER_DATABASE", default_value = "sqlite:grader.db")]
    pub database: String,

    /// Address to bind
    #[clap(long, env = "GRADER_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Port
    #[clap(long, env = "GRADER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Secret the `x-admin-key` header must match to unlock questions
    #[clap(long, env = "GRADER_ADMIN_KEY", hide_env_values = true)]
    pub admin_key: String,

    /// Maximum pooled database connections
    #[clap(long, env = "GRADER_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}
