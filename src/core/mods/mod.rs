pub mod descriptor;
pub mod entries;
pub mod model;
pub mod reader;

pub use descriptor::{DescriptorKind, ModInfoFields};
pub use entries::{DirEntries, EntrySource, ZipEntries};
pub use model::{MetadataStatus, Mod, ModType};
pub use reader::{read_metadata, LocatedDescriptor, ParsedMetadata};
