//! Stored member and team records.

use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::error::Error;

/// A stored member.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct MemberRecord {
    /// Primary key.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i32,
    /// Owning team, if any.
    pub team_id: Option<u64>,
}

/// A stored team.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct TeamRecord {
    /// Primary key.
    pub id: u64,
    /// Team name.
    pub name: String,
}

macro_rules! impl_record_codec {
    ($ty:ty) => {
        impl $ty {
            /// Serialize the record to bytes using rkyv.
            pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
                rkyv::to_bytes::<rkyv::rancor::Error>(self)
                    .map(|v| v.to_vec())
                    .map_err(|e| Error::Serialization(e.to_string()))
            }

            /// Deserialize a record from bytes using rkyv.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                // sled hands out buffers with no alignment guarantee
                let mut aligned: AlignedVec = AlignedVec::new();
                aligned.extend_from_slice(bytes);
                rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
                    .map_err(|e| Error::Deserialization(e.to_string()))
            }
        }
    };
}

impl_record_codec!(MemberRecord);
impl_record_codec!(TeamRecord);
