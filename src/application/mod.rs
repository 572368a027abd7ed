pub mod auth_service;
pub mod todo_service;

#[cfg(test)]
mod memory_store;
