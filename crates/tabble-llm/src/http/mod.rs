mod client;

pub use client::HttpChatClient;
