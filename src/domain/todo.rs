use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store-assigned identifier: 12 bytes, rendered as 24 lowercase hex chars.
///
/// Layout is seconds since the epoch (4 bytes), a per-process random value
/// (5 bytes) and a wrapping counter (3 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId([u8; 12]);

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| {
    let mut out = [0u8; 5];
    out.copy_from_slice(&Uuid::new_v4().as_bytes()[..5]);
    out
});

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| {
    let seed = Uuid::new_v4().as_bytes()[..4].try_into().map(u32::from_be_bytes).unwrap_or(0);
    AtomicU32::new(seed & 0x00ff_ffff)
});

impl TodoId {
    pub fn generate() -> Self {
        let secs = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    #[cfg(test)]
    pub fn bytes(&self) -> [u8; 12] { self.0 }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Creation second embedded in the identifier.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoIdError {
    #[error("identifier must be 24 hex characters, got {0}")]
    Length(usize),
    #[error("identifier contains a non-hex character")]
    NotHex,
}

impl FromStr for TodoId {
    type Err = TodoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 24 { return Err(TodoIdError::Length(s.len())); }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) { return Err(TodoIdError::NotHex); }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).map_err(|_| TodoIdError::NotHex)?;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for TodoId {
    type Error = TodoIdError;
    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<TodoId> for String {
    fn from(id: TodoId) -> Self { id.to_hex() }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_hex()) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub completed: bool,
    pub body: String,
}

/// Document handed to the store on insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub body: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodo {
    /// Missing and `null` both decode to `None` and are treated as empty.
    #[serde(default, alias = "Body")]
    pub body: Option<String>,
    /// Accepted for compatibility; new todos always start incomplete.
    #[serde(default, alias = "Completed")]
    pub completed: Option<bool>,
}
