pub mod consts;
pub mod device;
pub mod error;
pub mod frame;
pub mod io;
pub mod metadata;
pub mod pipeline;
pub mod refine;
pub mod segment;
pub mod session;
pub mod source;
