/**
 * Loading of assets from disk, before anything is uploaded to the GPU.
 */
pub mod texture;
