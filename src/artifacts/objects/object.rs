use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Serialization into the loose-object byte format.
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Deserialization from the loose-object byte format.
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}
