pub mod logging;
pub mod tensor;

pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};
pub use tensor::{Tensor, TensorError};

// Re-export log crate so downstream crates can use deepcheck_base::log::*
pub use log;
