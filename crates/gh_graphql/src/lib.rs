pub mod client;
pub mod connection;
pub mod pagination;
pub mod queries;
pub mod types;

pub use client::{GraphqlClient, NotFoundError};
pub use connection::{desc, Connection, ConnectionDesc, PageInfo};
pub use pagination::{collect_nodes, paginate};
