pub mod element;
pub mod settings;
pub mod song;

pub use element::{Element, MessageId};
pub use settings::DialogSettings;
pub use song::{NativeId, SongList, SongRecord, Vendor};
