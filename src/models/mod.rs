//! Request, response and domain models
//!
//! DTOs for the proxy's HTTP surface and the passive game-data types the
//! companion client deserializes.

pub mod game;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use game::{ApiResponse, ArcEnemy, GameMap, Item, MapLocation};
pub use requests::MapQuery;
pub use responses::{
    AttributionResponse, ClearResponse, HealthResponse, IndexResponse, NotFoundResponse,
    UpstreamHealth, API_ENDPOINTS,
};

pub const DATA_SOURCE: &str = "MetaForge";
pub const DATA_SOURCE_WEBSITE: &str = "https://metaforge.app/arc-raiders";
pub const DATA_SOURCE_DISCORD: &str = "https://discord.gg/8UEK9TrQDs";
pub const ATTRIBUTION_NOTICE: &str =
    "Data provided by MetaForge (https://metaforge.app/arc-raiders)";
