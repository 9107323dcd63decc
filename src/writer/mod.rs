mod writer;

pub use writer::{Writer, WriterOptions, BLOCK_SIZE_MIN};
