pub mod container;
pub mod external_services;
pub mod index;
pub mod persistence;
