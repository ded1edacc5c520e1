// Copyright 2019-2020 koushiro. Licensed under MIT.

use crate::amf0::{self, Amf0Value};
use crate::reader::ByteReader;

/// Decoded detail fields for a script (`onMetaData`-carrying) tag's payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptDetails {
    /// The script object/method name, e.g. `"onMetaData"`.
    pub name: String,
    /// The script value, typically an ECMA-array map of stream parameters.
    pub value: Amf0Value,
}

impl ScriptDetails {
    /// Decodes the name/value pair from a script tag's payload.
    ///
    /// Invokes the AMF0 decoder twice: first value coerced to string (name),
    /// second value retained as-is. Any decode failure collapses to the
    /// `"Parse Error"` sentinel per the recovered-not-reported error policy.
    pub fn decode(payload: &[u8]) -> Self {
        let mut reader = ByteReader::new(payload);
        match (amf0::decode(&mut reader), amf0::decode(&mut reader)) {
            (Some(name), Some(value)) => Self {
                name: name.as_str().to_string(),
                value,
            },
            _ => {
                tracing::warn!("failed to decode script tag payload");
                Self {
                    name: "Parse Error".to_string(),
                    value: Amf0Value::String("Parse Error".to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ByteWriter;
    use std::collections::BTreeMap;

    #[test]
    fn decodes_on_metadata() {
        let mut map = BTreeMap::new();
        map.insert("framerate".to_string(), Amf0Value::Number(30.0));

        let mut w = ByteWriter::new();
        amf0::encode_on_metadata(&mut w, &map);
        let bytes = w.into_bytes();

        let details = ScriptDetails::decode(&bytes);
        assert_eq!(details.name, "onMetaData");
        assert_eq!(details.value.as_map(), Some(&map));
    }

    #[test]
    fn truncated_payload_yields_parse_error_sentinel() {
        let details = ScriptDetails::decode(&[0x02, 0x00]); // string marker, truncated length
        assert_eq!(details.name, "Parse Error");
    }
}
