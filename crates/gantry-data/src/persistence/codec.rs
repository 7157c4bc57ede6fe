// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::CodecError;
use super::{PersistenceError, PersistenceFormat};

/// Serializes a value in the given format.
pub fn encode<T: Serialize>(value: &T, format: PersistenceFormat) -> Result<Vec<u8>, PersistenceError> {
    let encoded = match format {
        PersistenceFormat::Binary => {
            bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(CodecError::from)
        }
        PersistenceFormat::Readable => {
            let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
            ron::ser::to_string_pretty(value, pretty_config)
                .map(String::into_bytes)
                .map_err(CodecError::from)
        }
        PersistenceFormat::Json => serde_json::to_vec_pretty(value).map_err(CodecError::from),
    };
    encoded.map_err(|source| PersistenceError::Encode { format, source })
}

/// Deserializes a value written by [`encode`] in the same format.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], format: PersistenceFormat) -> Result<T, PersistenceError> {
    let decoded = match format {
        PersistenceFormat::Binary => {
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map(|(value, _read)| value)
                .map_err(CodecError::from)
        }
        PersistenceFormat::Readable => ron::de::from_bytes(bytes).map_err(CodecError::from),
        PersistenceFormat::Json => serde_json::from_slice(bytes).map_err(CodecError::from),
    };
    decoded.map_err(|source| PersistenceError::Decode { format, source })
}
