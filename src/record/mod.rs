mod read_op;
pub mod record;
mod write_op;

pub use read_op::locate_name;
pub use record::RawRecord;
pub use write_op::{rename, replace_name};

#[cfg(test)]
mod tests;
