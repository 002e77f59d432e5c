pub mod chat_service;
pub mod conversation;
