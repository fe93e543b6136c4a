// Adapters layer: concrete implementations for external systems (http, html, files, sqlite).

pub mod html;
pub mod http;
pub mod progress;
pub mod sqlite;
pub mod storage;

pub use html::HtmlTableParser;
pub use http::HttpDocumentSource;
pub use progress::{FileProgressLog, MemoryProgressLog};
pub use sqlite::BankStore;
pub use storage::LocalStorage;
