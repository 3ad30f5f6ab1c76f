pub mod codec;
pub mod format;
pub mod reader;
pub mod sniff;

pub use codec::Codec;
pub use format::{method_label, BlockHeader};
pub use reader::{Archive, ReadBinExt};
pub use sniff::sniff_extension;
