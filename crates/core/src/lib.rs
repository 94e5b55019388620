//! mf-core: Core library for modelfs storage location resolution
//!
//! This crate resolves catalog entity identifiers into physical storage
//! locations and performs directory lifecycle operations across backends:
//! - URI normalization and traversal validation
//! - Storage-root resolution with configuration-driven cache invalidation
//! - Location building for models and model versions
//! - Directory create/delete on the local filesystem and object storage
//!
//! This crate is designed to be independent of any specific S3 SDK; the
//! object-storage client is supplied through the ObjectStore trait.

pub mod config;
pub mod error;
pub mod fs;
pub mod location;
pub mod ops;
pub mod path;
pub mod traits;
pub mod uri;

pub use config::{ConfigProvider, Property, S3Settings, Settings};
pub use error::{Error, Result};
pub use location::LocationResolver;
pub use ops::DirectoryOps;
pub use path::S3Location;
pub use traits::{ListPage, ObjectStore};
pub use uri::{
    assert_valid_location, convert_relative_path_to_uri, create_uri,
    is_supported_cloud_storage_uri, StorageScheme, SUPPORTED_CLOUD_SCHEMES,
};
