//! Upload and result storage.
//!
//! - `store`: the `ContentStore` trait and its directory implementation.
//! - `persister`: result naming (`NameSeed`) and the empty-write check.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod persister;
pub mod store;

pub use persister::{extension_for_mime, NameSeed, Persister, StoredResult};
pub use store::{validate_name, ContentStore, DirectoryStore};

use crate::error::Result;
use crate::imaging::{ImageAsset, ImageFormat};

/// Load a stored input as an asset, using its extension as the format hint.
pub async fn load_asset(store: &dyn ContentStore, name: &str) -> Result<ImageAsset> {
    let bytes = store.get(name).await?;
    Ok(ImageAsset::new(bytes, ImageFormat::from_extension(name)))
}
