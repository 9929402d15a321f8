//! State Management Module
//!
//! Key-value storage, the persistence gateway over it, export/import files,
//! autosave policy, user notifications and the session tying them to a sheet.

pub mod autosave;
pub mod exchange;
pub mod notify;
pub mod persistence;
pub mod session;
pub mod store;

pub use autosave::{AutosaveManager, SaveTrigger};
pub use exchange::{export_filename, ExportFile};
pub use notify::{ConsoleNotifier, Notification, NotificationCenter, NotificationKind, Notifier};
pub use persistence::{LoadOutcome, PersistenceGateway, STORAGE_KEY};
pub use session::{LoadStatus, SheetChange, SheetSession};
pub use store::{FileStore, KeyValueStore, MemoryStore};
