//! Batch runner components: logging setup, source storage, and the batch
//! pipeline driven by the `vcard-batch` binary.

pub mod logging;
pub mod pipeline;
pub mod storage;
