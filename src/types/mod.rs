mod analysis;
mod chunk;
mod validation;

pub use analysis::{
    Alignment, ContentAnalysis, ContentTypeClass, Elements, FenceType, FencedBlock, Header,
    ListBlock, ListType, PreambleInfo, PreambleType, TableBlock, UrlRun,
};
pub use chunk::{Chunk, ChunkMetadata, ContentType, Link, LinkType, StrategyKind};
pub use validation::{MissingContentBlock, ValidationResult};
