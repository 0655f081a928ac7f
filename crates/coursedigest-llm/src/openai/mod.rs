mod client;

pub use client::CompletionsClient;
