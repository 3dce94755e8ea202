pub mod business;
pub mod direct;
pub mod invoker;
pub mod registry;
pub mod weather;
