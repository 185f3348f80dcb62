pub mod news_rss;
pub mod reddit;
pub mod twitter;
