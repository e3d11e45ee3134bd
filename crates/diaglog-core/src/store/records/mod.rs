//! Record operations on `ErrorStore`, split into reads and writes.

mod read;
mod write;
