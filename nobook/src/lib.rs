pub mod block;
pub mod document;
pub mod encoder;
pub mod naming;
pub mod parser;

pub use block::Block;
pub use document::{Cell, Document};
pub use encoder::{Encoder, EncoderConfig};
pub use naming::{NamePolicy, NameRegistry, UnnamedStyle, unique_name};
pub use parser::{DecodeError, ParseError, Parser};

/// Decode marker-annotated source text with the strict parser.
pub fn decode(text: &str) -> Result<Document, DecodeError> {
    Parser::new(text.to_string(), 0).parse()
}

/// Encode cells back to source text with the default naming settings.
pub fn encode(cells: &[Cell]) -> String {
    Encoder::default().encode(cells)
}
