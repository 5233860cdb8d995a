pub mod image_reader;
pub mod kv_store;

pub use image_reader::{FsImageReader, ImageReader};
pub use kv_store::{FileStore, KeyValueStore, MemoryStore};
