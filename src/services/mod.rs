pub mod catalog_service;
pub mod routine_generator;
