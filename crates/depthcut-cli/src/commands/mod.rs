pub mod config;
pub mod histogram;
pub mod info;
pub mod mask;
pub mod metadata;
pub mod pack;
pub mod run;
