//! Discriminator-driven decoding of JSON payloads into registered record shapes.

/// Descriptor tables, resolver strategies, and decoding entry points.
pub mod decode;
