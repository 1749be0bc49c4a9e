pub mod convert;
pub mod error;
pub mod model;

pub use convert::{Converter, Rename};
pub use error::NotebookError;
pub use model::{CellKind, CellMetadata, NobookMeta, Notebook, NotebookCell, NotebookMetadata};
