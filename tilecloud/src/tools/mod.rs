pub mod cloud;
pub mod fetch;
pub mod snapshot;
