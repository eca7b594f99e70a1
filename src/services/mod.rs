//! Service layer for business logic
//!
//! 解析、生命周期管理、过期维护和导入，HTTP 接口与 CLI 共用。

pub mod expiry;
pub mod importer;
pub mod maintenance;
pub mod mapping_service;
pub mod reserved;
pub mod resolver;

pub use expiry::{ExpiryClock, parse_expiry};
pub use importer::{
    ImportFailure, ImportMode, ImportReport, Importer, JsonFileSource, KeyPage, LegacySource,
    RedisSource,
};
pub use maintenance::{ExpiryClassifier, ExpiryReport, ExpirySweeper, MaintenanceTask, PurgeReport};
pub use mapping_service::{CreateMappingRequest, MappingService, UpdateMappingRequest};
pub use reserved::{RESERVED_PATHS, is_reserved};
pub use resolver::{Resolution, Resolver, resolve};
