/// Connection pool management and migrations
pub mod connection;
/// Entity models mapped onto the relational schema
pub mod models;
