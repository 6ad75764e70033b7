//! Chain operations.
//!
//! Only the generic custom-data operation is carried here: gameplay traffic
//! rides entirely on `custom_json`, interpreted off-chain by the game
//! backend. The condenser JSON form is a `[name, body]` pair; the wire form
//! prefixes the operation's numeric code.

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};

use crate::serializer::{write_string, write_varint, WireEncode};

// Operation codes index the chain's operation enum.
const CUSTOM_JSON_CODE: u64 = 18;

/// The chain's generic custom-data operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomJson {
    pub required_auths: Vec<String>,
    pub required_posting_auths: Vec<String>,
    pub id: String,
    pub json: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operation {
    CustomJson(CustomJson),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CustomJson(_) => "custom_json",
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(self.name())?;
        match self {
            Self::CustomJson(op) => pair.serialize_element(op)?,
        }
        pair.end()
    }
}

impl WireEncode for CustomJson {
    fn encode(&self, buf: &mut Vec<u8>) {
        write_varint(buf, self.required_auths.len() as u64);
        for account in &self.required_auths {
            write_string(buf, account);
        }
        write_varint(buf, self.required_posting_auths.len() as u64);
        for account in &self.required_posting_auths {
            write_string(buf, account);
        }
        write_string(buf, &self.id);
        write_string(buf, &self.json);
    }
}

impl WireEncode for Operation {
    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Self::CustomJson(op) => {
                write_varint(buf, CUSTOM_JSON_CODE);
                op.encode(buf);
            }
        }
    }
}
